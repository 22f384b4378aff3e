//! Test execution results and pluggable fitness policies.

use std::time::Duration;

/// Outcome of compiling a patched program and running its test set.
#[derive(Debug, Clone, PartialEq)]
pub struct TestExecutionResult {
    /// The patched program compiled cleanly.
    pub compiled: bool,
    /// Every test in the set passed.
    pub all_passed: bool,
    /// Total wall time spent executing the tests.
    pub execution_time: Duration,
    /// Number of tests that passed.
    pub tests_passed: usize,
    /// Number of tests run.
    pub tests_run: usize,
}

impl TestExecutionResult {
    /// A patch that did not compile; no tests ran.
    pub fn compile_failure(tests: usize) -> Self {
        Self {
            compiled: false,
            all_passed: false,
            execution_time: Duration::ZERO,
            tests_passed: 0,
            tests_run: tests,
        }
    }

    /// A compiled patch whose tests all passed.
    pub fn passed(tests: usize, execution_time: Duration) -> Self {
        Self {
            compiled: true,
            all_passed: true,
            execution_time,
            tests_passed: tests,
            tests_run: tests,
        }
    }

    /// Execution time in milliseconds.
    pub fn execution_time_ms(&self) -> f64 {
        self.execution_time.as_nanos() as f64 / 1_000_000.0
    }
}

/// Maps test results onto a scalar fitness and decides survival.
///
/// Concrete search flavors implement this; the generational loop is
/// agnostic of whether lower or higher fitness is better and only uses
/// [`compare`](FitnessPolicy::compare).
pub trait FitnessPolicy: Send + Sync {
    /// Scalar fitness of a result.
    fn fitness(&self, result: &TestExecutionResult) -> f64;

    /// Whether a candidate may enter the next population.
    fn threshold(&self, result: &TestExecutionResult, baseline_fitness: f64) -> bool;

    /// Positive when `new` is strictly better than `old`.
    fn compare(&self, new: f64, old: f64) -> f64;
}

/// Runtime improvement: lower total execution time is better.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeFitness {
    /// Reject survivors slower than the baseline by more than this ratio.
    pub max_slowdown: Option<f64>,
}

impl RuntimeFitness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_slowdown(ratio: f64) -> Self {
        Self {
            max_slowdown: Some(ratio),
        }
    }
}

impl FitnessPolicy for RuntimeFitness {
    fn fitness(&self, result: &TestExecutionResult) -> f64 {
        if result.compiled && result.all_passed {
            result.execution_time_ms()
        } else {
            f64::MAX
        }
    }

    fn threshold(&self, result: &TestExecutionResult, baseline_fitness: f64) -> bool {
        if !result.all_passed {
            return false;
        }
        match self.max_slowdown {
            Some(ratio) => self.fitness(result) <= baseline_fitness * (1.0 + ratio),
            None => true,
        }
    }

    fn compare(&self, new: f64, old: f64) -> f64 {
        old - new
    }
}

/// Program repair: more passing tests is better.
#[derive(Debug, Clone, Copy, Default)]
pub struct RepairFitness;

impl FitnessPolicy for RepairFitness {
    fn fitness(&self, result: &TestExecutionResult) -> f64 {
        if result.compiled {
            result.tests_passed as f64
        } else {
            0.0
        }
    }

    fn threshold(&self, result: &TestExecutionResult, _baseline_fitness: f64) -> bool {
        result.compiled
    }

    fn compare(&self, new: f64, old: f64) -> f64 {
        new - old
    }
}
