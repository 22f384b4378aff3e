//! Synthetic program landscape.
//!
//! A stand-in for a real compile-and-test harness: every edit has a fixed,
//! seeded effect on compilation, test outcome and runtime. Effects depend
//! only on the landscape seed, the method and the edit itself, so any patch
//! evaluates identically no matter when, where or how often it is run.

use std::fmt;
use std::time::Duration;

use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::{EditKind, TargetMethod};

use super::error::SearchError;
use super::fitness::TestExecutionResult;
use super::orchestrator::ProgramLoader;
use super::patch::{Patch, Program};
use super::runner::TestRunner;

/// Shape of the synthetic landscape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandscapeConfig {
    /// Seed mixed into every edit effect.
    pub seed: u64,
    /// Distinct edit sites per method.
    pub sites: usize,
    /// Distinct operators per site.
    pub operators: u32,
    /// Runtime of the unmodified method in milliseconds.
    pub base_time_ms: f64,
    /// Largest runtime reduction a single edit can give.
    pub max_speedup_ms: f64,
    /// Largest runtime increase a single edit can cause.
    pub max_slowdown_ms: f64,
    /// Probability that an edit breaks compilation.
    pub compile_failure_rate: f64,
    /// Probability that an edit breaks a test.
    pub test_failure_rate: f64,
}

impl Default for LandscapeConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            sites: 40,
            operators: 4,
            base_time_ms: 100.0,
            max_speedup_ms: 4.0,
            max_slowdown_ms: 6.0,
            compile_failure_rate: 0.1,
            test_failure_rate: 0.3,
        }
    }
}

/// An edit on the landscape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LandscapeEdit {
    pub kind: EditKind,
    pub site: usize,
    pub operator: u32,
}

impl fmt::Display for LandscapeEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}#{}", self.kind, self.site, self.operator)
    }
}

#[derive(Debug, Clone, Copy)]
struct Effect {
    compiles: bool,
    passes: bool,
    delta_ms: f64,
}

/// One method's landscape.
#[derive(Debug, Clone)]
pub struct Landscape {
    config: LandscapeConfig,
    key: u64,
}

impl Landscape {
    pub fn new(config: LandscapeConfig, method: &TargetMethod) -> Self {
        let key = splitmix(config.seed ^ fnv1a(method.to_string().as_bytes()));
        Self { config, key }
    }

    /// Evaluate `edits` against a test set of `tests` tests.
    ///
    /// Any edit that breaks compilation fails the whole patch. Each edit
    /// that breaks a test fails one more test.
    pub fn measure(&self, edits: &[LandscapeEdit], tests: usize) -> TestExecutionResult {
        let tests = tests.max(1);
        let base = self.config.base_time_ms.max(0.0);
        let mut time = base;
        let mut failing = 0;

        for edit in edits {
            let effect = self.effect(edit);
            if !effect.compiles {
                return TestExecutionResult::compile_failure(tests);
            }
            if !effect.passes {
                failing += 1;
            }
            time += effect.delta_ms;
        }

        let time = time.max(base * 0.01);
        TestExecutionResult {
            compiled: true,
            all_passed: failing == 0,
            execution_time: Duration::from_secs_f64(time / 1000.0),
            tests_passed: tests - failing.min(tests),
            tests_run: tests,
        }
    }

    fn effect(&self, edit: &LandscapeEdit) -> Effect {
        let key = [
            fnv1a(edit.kind.to_string().as_bytes()),
            edit.site as u64,
            u64::from(edit.operator),
        ]
        .iter()
        .fold(self.key, |h, &v| splitmix(h ^ v));
        let mut rng = StdRng::seed_from_u64(key);

        let compiles = !rng.gen_bool(self.config.compile_failure_rate.clamp(0.0, 1.0));
        let passes = !rng.gen_bool(self.config.test_failure_rate.clamp(0.0, 1.0));
        let low = -self.config.max_speedup_ms.abs();
        let high = self.config.max_slowdown_ms.abs();
        let delta_ms = rng.gen_range(low..=high);

        Effect {
            compiles,
            passes,
            delta_ms,
        }
    }
}

impl Program for Landscape {
    type Edit = LandscapeEdit;

    fn random_edit(&self, kind: &EditKind, rng: &mut StdRng) -> LandscapeEdit {
        LandscapeEdit {
            kind: kind.clone(),
            site: rng.gen_range(0..self.config.sites.max(1)),
            operator: rng.gen_range(0..self.config.operators.max(1)),
        }
    }
}

/// Runs patches against their landscape.
#[derive(Debug, Clone, Copy, Default)]
pub struct LandscapeRunner;

impl TestRunner<Landscape> for LandscapeRunner {
    fn run(&self, method: &TargetMethod, patch: &Patch<Landscape>) -> TestExecutionResult {
        patch.program().measure(patch.edits(), method.tests.len())
    }
}

/// Builds a landscape per method from a shared configuration.
#[derive(Debug, Clone, Default)]
pub struct LandscapeLoader {
    config: LandscapeConfig,
}

impl LandscapeLoader {
    pub fn new(config: LandscapeConfig) -> Self {
        Self { config }
    }
}

impl ProgramLoader for LandscapeLoader {
    type Program = Landscape;

    fn load(&self, method: &TargetMethod, _kinds: &[EditKind]) -> Result<Landscape, SearchError> {
        if method.class_name.is_empty() || method.method_name.is_empty() {
            return Err(SearchError::Program {
                method: method.to_string(),
                reason: "empty class or method name".into(),
            });
        }
        Ok(Landscape::new(self.config.clone(), method))
    }
}

fn splitmix(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0xCBF2_9CE4_8422_2325, |h, &b| {
        (h ^ u64::from(b)).wrapping_mul(0x0100_0000_01B3)
    })
}
