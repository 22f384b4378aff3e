//! Search module - Genetic improvement over patches.
//!
//! The generational loop ([`GenerationalSearch`]) evolves patches of a
//! [`Program`] and scores them through a [`TestRunner`] and a
//! [`FitnessPolicy`]. Generation 0 is either the baseline plus single
//! mutations, or, with HOM seeding, combinations of first-order patches
//! drawn by a [`FomSampler`]. The [`Orchestrator`] drives a whole run over
//! a list of target methods and writes every evaluation to a [`ResultLog`].
//!
//! [`Landscape`] is a deterministic synthetic program used by the CLI,
//! benchmarks and tests.

mod engine;
mod error;
mod fitness;
mod hom;
mod landscape;
mod operators;
mod orchestrator;
mod patch;
mod population;
mod result_log;
mod rng;
mod runner;
mod sampler;

pub use engine::{GenerationalSearch, MethodOutcome};
pub use error::SearchError;
pub use fitness::{FitnessPolicy, RepairFitness, RuntimeFitness, TestExecutionResult};
pub use hom::{combination_size, combine_foms, qualifying_foms, sample_hom};
pub use landscape::{Landscape, LandscapeConfig, LandscapeEdit, LandscapeLoader, LandscapeRunner};
pub use operators::{crossover, mutate, pad, select, tournament_size};
pub use orchestrator::{Orchestrator, ProgramLoader};
pub use patch::{Patch, Program};
pub use population::Population;
pub use result_log::{LOG_HEADER, ResultLog, ResultRow};
pub use rng::RngStreams;
pub use runner::{Evaluated, TestRunner};
pub use sampler::{FomSampler, RandomFomSampler};
