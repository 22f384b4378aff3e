//! Evaluation port: compiling a patch and running the method's tests.

use crate::schema::TargetMethod;

use super::fitness::TestExecutionResult;
use super::patch::{Patch, Program};

/// Compiles and tests patched programs.
///
/// Implementations must be deterministic for identical patches and tests,
/// and should enforce their own timeouts: the engine waits on every call.
/// A timed-out run should be reported as a failed result, not hang.
pub trait TestRunner<P: Program>: Sync {
    /// Evaluate `patch` against the method's fixed test set.
    fn run(&self, method: &TargetMethod, patch: &Patch<P>) -> TestExecutionResult;

    /// Evaluate the unmodified baseline. Runners that need warm-up or
    /// reference measurements hook in here.
    fn run_baseline(&self, method: &TargetMethod, baseline: &Patch<P>) -> TestExecutionResult {
        self.run(method, baseline)
    }
}

/// A patch paired with the result of evaluating it.
pub struct Evaluated<P: Program> {
    pub patch: Patch<P>,
    pub result: TestExecutionResult,
}

impl<P: Program> Clone for Evaluated<P> {
    fn clone(&self) -> Self {
        Self {
            patch: self.patch.clone(),
            result: self.result.clone(),
        }
    }
}

impl<P: Program> std::fmt::Debug for Evaluated<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evaluated")
            .field("patch", &self.patch)
            .field("result", &self.result)
            .finish()
    }
}
