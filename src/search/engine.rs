//! Generational loop: baseline evaluation, generation-0 seeding, and the
//! select / crossover / pad / mutate / evaluate / survive cycle.

use std::marker::PhantomData;

use log::{debug, info, warn};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;

use crate::schema::{ConfigError, EditKind, SearchConfig, TargetMethod};

use super::error::SearchError;
use super::fitness::{FitnessPolicy, TestExecutionResult};
use super::hom::{combination_size, qualifying_foms, sample_hom};
use super::result_log::{ResultLog, ResultRow};
use super::operators::{crossover, mutate, pad, select};
use super::patch::{Patch, Program};
use super::population::Population;
use super::rng::RngStreams;
use super::runner::{Evaluated, TestRunner};

/// Summary of one method's search. The result log holds the full record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodOutcome {
    /// Method identifier as written to the log.
    pub method: String,
    /// Fitness of the unmodified program.
    pub baseline_fitness: f64,
    /// Best fitness among surviving candidates (baseline if none improved).
    pub best_fitness: f64,
    /// Description of the patch that achieved `best_fitness`.
    pub best_patch: String,
    /// Number of evaluations, baseline included.
    pub evaluations: usize,
    /// Size of the final population.
    pub population_size: usize,
}

/// Per-method search state.
struct MethodRun<'m, P: Program> {
    method: &'m TargetMethod,
    name: String,
    baseline: Patch<P>,
    baseline_fitness: f64,
    evaluations: usize,
    best_patch: String,
    best_fitness: f64,
}

impl<P: Program> MethodRun<'_, P> {
    fn finish(self, population_size: usize) -> MethodOutcome {
        MethodOutcome {
            method: self.name,
            baseline_fitness: self.baseline_fitness,
            best_fitness: self.best_fitness,
            best_patch: self.best_patch,
            evaluations: self.evaluations,
            population_size,
        }
    }
}

/// An evaluated candidate with its fitness and survival verdict.
struct Scored<P: Program> {
    patch: Patch<P>,
    fitness: f64,
    survives: bool,
}

/// Generational search over patches of one program representation.
pub struct GenerationalSearch<'a, P, R, F>
where
    P: Program,
    R: TestRunner<P>,
    F: FitnessPolicy,
{
    config: &'a SearchConfig,
    kinds: &'a [EditKind],
    runner: &'a R,
    policy: &'a F,
    _program: PhantomData<fn() -> P>,
}

impl<'a, P, R, F> GenerationalSearch<'a, P, R, F>
where
    P: Program,
    R: TestRunner<P>,
    F: FitnessPolicy,
{
    /// Bind a validated configuration and a non-empty set of edit kinds.
    pub fn new(
        config: &'a SearchConfig,
        kinds: &'a [EditKind],
        runner: &'a R,
        policy: &'a F,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if kinds.is_empty() {
            return Err(ConfigError::EmptyEditKinds);
        }
        Ok(Self {
            config,
            kinds,
            runner,
            policy,
            _program: PhantomData,
        })
    }

    /// Standard search: generation 0 is the baseline plus N-1 single mutations.
    pub fn search(
        &self,
        method: &TargetMethod,
        baseline: &Patch<P>,
        rng: &mut RngStreams,
        log: &mut ResultLog,
    ) -> Result<MethodOutcome, SearchError> {
        let mut run = self.evaluate_baseline(method, baseline, log)?;
        let population = self.seed_standard(&mut run, rng, log)?;
        let population = self.evolve(&mut run, population, rng, log)?;
        Ok(run.finish(population.len()))
    }

    /// HOM-seeded search over previously sampled first-order patches.
    pub fn search_hom(
        &self,
        method: &TargetMethod,
        baseline: &Patch<P>,
        sampled: &[Evaluated<P>],
        rng: &mut RngStreams,
        log: &mut ResultLog,
    ) -> Result<MethodOutcome, SearchError> {
        info!("Found {} sampled first-order patches", sampled.len());

        let mut run = self.evaluate_baseline(method, baseline, log)?;
        let population = self.seed_from_foms(&mut run, sampled, rng, log)?;
        let population = self.evolve(&mut run, population, rng, log)?;
        Ok(run.finish(population.len()))
    }

    fn evaluate_baseline<'m>(
        &self,
        method: &'m TargetMethod,
        baseline: &Patch<P>,
        log: &mut ResultLog,
    ) -> Result<MethodRun<'m, P>, SearchError> {
        let name = method.to_string();
        let result = self.runner.run_baseline(method, baseline);
        let fitness = self.policy.fitness(&result);
        log.write_row(&ResultRow::new(&name, baseline.to_string(), &result, fitness, 0.0))?;

        Ok(MethodRun {
            method,
            name,
            baseline: baseline.clone(),
            baseline_fitness: fitness,
            evaluations: 1,
            best_patch: baseline.to_string(),
            best_fitness: fitness,
        })
    }

    /// Dispatch generation-0 seeding on the number of qualifying first-order patches.
    fn seed_from_foms(
        &self,
        run: &mut MethodRun<'_, P>,
        sampled: &[Evaluated<P>],
        rng: &mut RngStreams,
        log: &mut ResultLog,
    ) -> Result<Population<P>, SearchError> {
        let foms = qualifying_foms(sampled);
        info!("Found {} FOM patches", foms.len());

        match foms.len() {
            0 => self.seed_standard(run, rng, log),
            1 => self.seed_single_fom(run, &foms[0], rng, log),
            _ => self.seed_hom(run, &foms, rng, log),
        }
    }

    fn seed_standard(
        &self,
        run: &mut MethodRun<'_, P>,
        rng: &mut RngStreams,
        log: &mut ResultLog,
    ) -> Result<Population<P>, SearchError> {
        let mut population = Population::baseline(&run.baseline, run.baseline_fitness);
        let mutants = self.config.individuals.saturating_sub(1);
        self.add_baseline_mutants(run, &mut population, mutants, rng, log)?;
        Ok(population)
    }

    fn seed_single_fom(
        &self,
        run: &mut MethodRun<'_, P>,
        fom: &Patch<P>,
        rng: &mut RngStreams,
        log: &mut ResultLog,
    ) -> Result<Population<P>, SearchError> {
        let mut population = Population::new();

        // Already validated by the sampler, so it joins regardless of threshold.
        for scored in self.evaluate_batch(run, vec![fom.clone()], log)? {
            population.insert(scored.patch, scored.fitness);
        }

        let mutants = self.config.individuals.saturating_sub(1);
        self.add_baseline_mutants(run, &mut population, mutants, rng, log)?;
        Ok(population)
    }

    fn seed_hom(
        &self,
        run: &mut MethodRun<'_, P>,
        foms: &[Patch<P>],
        rng: &mut RngStreams,
        log: &mut ResultLog,
    ) -> Result<Population<P>, SearchError> {
        let individuals = self.config.individuals;
        let budget = self.config.hom_attempt_budget();
        let mut population = Population::new();
        let mut attempts = 0;

        // Batches never exceed the number of missing members, so stopping at
        // N survivors matches drawing and testing one HOM at a time.
        while population.len() < individuals && attempts < budget {
            let batch = (individuals - population.len()).min(budget - attempts);
            let mut homs = Vec::with_capacity(batch);
            for _ in 0..batch {
                let size = combination_size(foms.len(), self.config.hom_size, &mut rng.individual);
                info!("Combining patches. Length {}", size);
                if let Some(hom) = sample_hom(foms, size, &mut rng.individual) {
                    homs.push(hom);
                }
            }
            attempts += batch;

            for scored in self.evaluate_batch(run, homs, log)? {
                if scored.survives {
                    population.insert(scored.patch, scored.fitness);
                }
            }
        }

        info!("Found {} HOM patches overall", population.len());

        if population.len() < individuals {
            warn!(
                "HOM seeding for {} exhausted {} attempts with {} of {} patches; filling from baseline",
                run.name,
                budget,
                population.len(),
                individuals
            );
            population.insert(run.baseline.clone(), run.baseline_fitness);
            let missing = individuals.saturating_sub(population.len());
            self.add_baseline_mutants(run, &mut population, missing, rng, log)?;
        }

        Ok(population)
    }

    /// Evaluate `count` single mutations of the baseline, keeping survivors.
    fn add_baseline_mutants(
        &self,
        run: &mut MethodRun<'_, P>,
        population: &mut Population<P>,
        count: usize,
        rng: &mut RngStreams,
        log: &mut ResultLog,
    ) -> Result<(), SearchError> {
        let mutants = (0..count)
            .map(|_| mutate(&run.baseline, self.kinds, &mut rng.mutation))
            .collect::<Result<Vec<_>, _>>()?;

        for scored in self.evaluate_batch(run, mutants, log)? {
            if scored.survives {
                population.insert(scored.patch, scored.fitness);
            }
        }
        Ok(())
    }

    /// Run G generations starting from `population`.
    fn evolve(
        &self,
        run: &mut MethodRun<'_, P>,
        mut population: Population<P>,
        rng: &mut RngStreams,
        log: &mut ResultLog,
    ) -> Result<Population<P>, SearchError> {
        for generation in 0..self.config.generations {
            info!("Creating generation: {}", generation + 1);
            population = self.step_generation(run, &population, rng, log)?;
        }
        Ok(population)
    }

    /// Produce generation g+1 from the survivors of generation g.
    fn step_generation(
        &self,
        run: &mut MethodRun<'_, P>,
        population: &Population<P>,
        rng: &mut RngStreams,
        log: &mut ResultLog,
    ) -> Result<Population<P>, SearchError> {
        let individuals = self.config.individuals;
        let previous: Vec<Patch<P>> = population.patches().cloned().collect();

        let selected = select(
            population,
            &run.baseline,
            run.baseline_fitness,
            individuals,
            self.config.tournament_fraction,
            self.policy,
            &mut rng.individual,
        );

        let mut candidates = crossover(
            selected,
            &run.baseline,
            self.config.crossover_probability,
            rng,
        )?;
        pad(&mut candidates, &previous, individuals, &mut rng.individual);

        // All draws happen here, before any evaluation.
        let mutants = candidates
            .iter()
            .map(|patch| mutate(patch, self.kinds, &mut rng.mutation))
            .collect::<Result<Vec<_>, _>>()?;

        let mut next = Population::new();
        for scored in self.evaluate_batch(run, mutants, log)? {
            if scored.survives {
                next.insert(scored.patch, scored.fitness);
            }
        }

        if next.is_empty() {
            next = Population::baseline(&run.baseline, run.baseline_fitness);
        }
        Ok(next)
    }

    /// Evaluate, score and log a batch of candidates in order.
    fn evaluate_batch(
        &self,
        run: &mut MethodRun<'_, P>,
        patches: Vec<Patch<P>>,
        log: &mut ResultLog,
    ) -> Result<Vec<Scored<P>>, SearchError> {
        for patch in &patches {
            debug!("Testing patch: {}", patch);
        }
        let results = self.run_all(run.method, &patches);

        let mut scored = Vec::with_capacity(patches.len());
        for (patch, result) in patches.into_iter().zip(results) {
            let fitness = self.policy.fitness(&result);
            let improvement = self.policy.compare(fitness, run.baseline_fitness);
            let survives = self.policy.threshold(&result, run.baseline_fitness);

            log.write_row(&ResultRow::new(
                &run.name,
                patch.to_string(),
                &result,
                fitness,
                improvement,
            ))?;
            run.evaluations += 1;

            if survives && self.policy.compare(fitness, run.best_fitness) > 0.0 {
                run.best_fitness = fitness;
                run.best_patch = patch.to_string();
            }

            scored.push(Scored {
                patch,
                fitness,
                survives,
            });
        }
        Ok(scored)
    }

    #[cfg(feature = "parallel")]
    fn run_all(&self, method: &TargetMethod, patches: &[Patch<P>]) -> Vec<TestExecutionResult> {
        // Parallel evaluation; collect preserves candidate order
        patches
            .par_iter()
            .map(|patch| self.runner.run(method, patch))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn run_all(&self, method: &TargetMethod, patches: &[Patch<P>]) -> Vec<TestExecutionResult> {
        patches
            .iter()
            .map(|patch| self.runner.run(method, patch))
            .collect()
    }
}
