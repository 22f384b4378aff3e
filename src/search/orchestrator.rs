//! Run driver: validates configuration, opens the result log, and searches
//! every target method in turn.

use std::sync::Arc;

use log::{info, warn};

use crate::schema::{EditKind, SearchConfig, TargetMethod};

use super::engine::{GenerationalSearch, MethodOutcome};
use super::error::SearchError;
use super::fitness::FitnessPolicy;
use super::patch::{Patch, Program};
use super::result_log::ResultLog;
use super::rng::RngStreams;
use super::runner::TestRunner;
use super::sampler::{FomSampler, RandomFomSampler};

/// Builds the program representation for a target method.
pub trait ProgramLoader {
    type Program: Program;

    /// Load `method`'s program, restricted to edits of `kinds`.
    ///
    /// A [`SearchError::Program`] skips the method; any other error aborts the run.
    fn load(&self, method: &TargetMethod, kinds: &[EditKind]) -> Result<Self::Program, SearchError>;
}

/// Owns configuration, random streams and collaborators for a whole run.
pub struct Orchestrator<L, R, F>
where
    L: ProgramLoader,
    R: TestRunner<L::Program>,
    F: FitnessPolicy,
{
    config: SearchConfig,
    kinds: Vec<EditKind>,
    loader: L,
    runner: R,
    policy: F,
    sampler: Box<dyn FomSampler<L::Program>>,
    rng: RngStreams,
}

impl<L, R, F> Orchestrator<L, R, F>
where
    L: ProgramLoader,
    R: TestRunner<L::Program>,
    F: FitnessPolicy,
{
    /// Validate `config` and set up both random streams from its seeds.
    pub fn new(config: SearchConfig, loader: L, runner: R, policy: F) -> Result<Self, SearchError> {
        config.validate()?;
        let kinds = config.edit_kinds()?;
        let rng = RngStreams::new(config.mutation_seed, config.individual_seed);
        let sampler = Box::new(RandomFomSampler::new(config.sampler_seed));

        Ok(Self {
            config,
            kinds,
            loader,
            runner,
            policy,
            sampler,
            rng,
        })
    }

    /// Replace the first-order sampler used in HOM mode.
    pub fn with_sampler(mut self, sampler: Box<dyn FomSampler<L::Program>>) -> Self {
        self.sampler = sampler;
        self
    }

    /// Search every method, logging to the configured output file.
    ///
    /// Failing to create the log aborts before any evaluation.
    pub fn run(&mut self, methods: &[TargetMethod]) -> Result<Vec<MethodOutcome>, SearchError> {
        let mut log = ResultLog::create(&self.config.output_file)?;
        self.run_with_log(methods, &mut log)
    }

    /// Search every method, logging to `log`.
    pub fn run_with_log(
        &mut self,
        methods: &[TargetMethod],
        log: &mut ResultLog,
    ) -> Result<Vec<MethodOutcome>, SearchError> {
        self.log_parameters();

        let search =
            GenerationalSearch::new(&self.config, &self.kinds, &self.runner, &self.policy)?;
        let mut outcomes = Vec::with_capacity(methods.len());

        for method in methods {
            let program = match self.loader.load(method, &self.kinds) {
                Ok(program) => program,
                Err(SearchError::Program { method, reason }) => {
                    warn!("Skipping {}: {}", method, reason);
                    continue;
                }
                Err(e) => return Err(e),
            };
            let baseline = Patch::new(Arc::new(program));

            let outcome = if self.config.hom_enabled {
                info!("Running HOM-GP on method {}", method);
                let sampled = self.sampler.sample(
                    method,
                    &baseline,
                    &self.kinds,
                    self.config.patch_number,
                    &self.runner,
                )?;
                search.search_hom(method, &baseline, &sampled, &mut self.rng, log)?
            } else {
                info!("Running GP on method {}", method);
                search.search(method, &baseline, &mut self.rng, log)?
            };

            info!(
                "Finished {}: baseline {:?}, best {:?} after {} evaluations",
                outcome.method, outcome.baseline_fitness, outcome.best_fitness, outcome.evaluations
            );
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }

    fn log_parameters(&self) {
        let kinds: Vec<String> = self.kinds.iter().map(ToString::to_string).collect();
        info!("Edit types: {}", kinds.join(","));
        info!("Number of generations: {}", self.config.generations);
        info!("Number of individuals: {}", self.config.individuals);
        info!("Random seed for mutation operator selection: {}", self.config.mutation_seed);
        info!("Random seed for individual selection: {}", self.config.individual_seed);
        if self.config.hom_enabled {
            info!(
                "HOM seeding enabled: {} first-order samples, HOM size {}",
                self.config.patch_number, self.config.hom_size
            );
        }
    }
}
