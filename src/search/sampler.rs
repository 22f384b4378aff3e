//! First-order patch sampling for HOM seeding.

use log::info;
use rand::prelude::*;

use crate::schema::{EditKind, TargetMethod};

use super::error::SearchError;
use super::operators::mutate;
use super::patch::{Patch, Program};
use super::runner::{Evaluated, TestRunner};

/// Supplies previously evaluated single-edit patches for a method.
pub trait FomSampler<P: Program> {
    /// Draw up to `count` single-edit patches of `kinds` over `baseline`
    /// and evaluate each of them.
    ///
    /// An error aborts the run.
    fn sample(
        &mut self,
        method: &TargetMethod,
        baseline: &Patch<P>,
        kinds: &[EditKind],
        count: usize,
        runner: &dyn TestRunner<P>,
    ) -> Result<Vec<Evaluated<P>>, SearchError>;
}

/// Samples single random edits from its own seeded stream.
pub struct RandomFomSampler {
    rng: StdRng,
}

impl RandomFomSampler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<P: Program> FomSampler<P> for RandomFomSampler {
    fn sample(
        &mut self,
        method: &TargetMethod,
        baseline: &Patch<P>,
        kinds: &[EditKind],
        count: usize,
        runner: &dyn TestRunner<P>,
    ) -> Result<Vec<Evaluated<P>>, SearchError> {
        let mut sampled = Vec::with_capacity(count);
        for _ in 0..count {
            let patch = mutate(baseline, kinds, &mut self.rng)?;
            let result = runner.run(method, &patch);
            sampled.push(Evaluated { patch, result });
        }

        let passing = sampled.iter().filter(|e| e.result.all_passed).count();
        info!(
            "Sampled {} first-order patches for {} ({} passing)",
            sampled.len(),
            method,
            passing
        );
        Ok(sampled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::fitness::TestExecutionResult;
    use crate::search::patch::tests::{Sites, baseline};
    use std::time::Duration;

    struct EvenSitesPass;

    impl TestRunner<Sites> for EvenSitesPass {
        fn run(&self, _method: &TargetMethod, patch: &Patch<Sites>) -> TestExecutionResult {
            if patch.edits().iter().all(|e| e.1 % 2 == 0) {
                TestExecutionResult::passed(1, Duration::from_millis(1))
            } else {
                TestExecutionResult::compile_failure(1)
            }
        }
    }

    #[test]
    fn test_samples_single_edit_patches() {
        let method = TargetMethod::new("A", "f()");
        let mut sampler = RandomFomSampler::new(17);
        let sampled = sampler.sample(
            &method,
            &baseline(),
            &[EditKind::Statement],
            30,
            &EvenSitesPass,
        )
        .unwrap();

        assert_eq!(sampled.len(), 30);
        for e in &sampled {
            assert_eq!(e.patch.len(), 1);
            assert_eq!(e.result.all_passed, e.patch.edits()[0].1 % 2 == 0);
        }
    }

    #[test]
    fn test_sampling_is_seeded() {
        let method = TargetMethod::new("A", "f()");
        let draw = |seed| {
            RandomFomSampler::new(seed)
                .sample(&method, &baseline(), &[EditKind::Line], 10, &EvenSitesPass)
                .unwrap()
                .iter()
                .map(|e| e.patch.to_string())
                .collect::<Vec<_>>()
        };
        assert_eq!(draw(5), draw(5));
    }

    #[test]
    fn test_sampling_without_kinds_fails() {
        let method = TargetMethod::new("A", "f()");
        let result =
            RandomFomSampler::new(1).sample(&method, &baseline(), &[], 3, &EvenSitesPass);
        assert!(matches!(result, Err(SearchError::Config(_))));
    }
}
