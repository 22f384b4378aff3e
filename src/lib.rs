//! HOM-GP - Generational genetic improvement over program patches.
//!
//! A patch is an ordered list of edits over a base program. The search
//! evolves a population of patches with tournament selection, uniform
//! crossover and single-edit mutation, scoring each candidate by compiling
//! it and running the target method's tests. Generation 0 can optionally be
//! seeded with higher-order mutants (HOMs) built from validated first-order
//! patches. Every evaluation is appended to a CSV result log.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Run configuration, edit kinds and target methods
//! - `search`: Patches, operators, fitness, the generational engine and the
//!   run orchestrator
//!
//! Compilation and test execution sit behind the [`search::TestRunner`]
//! trait. The bundled [`search::Landscape`] is a deterministic synthetic
//! program that stands in for a real harness.
//!
//! # Example
//!
//! ```rust,no_run
//! use hom_gp::{
//!     schema::{SearchConfig, TargetMethod},
//!     search::{LandscapeLoader, LandscapeRunner, Orchestrator, RuntimeFitness},
//! };
//!
//! let config = SearchConfig {
//!     generations: 5,
//!     individuals: 20,
//!     ..Default::default()
//! };
//! let methods = vec![TargetMethod::new("org.example.Sorter", "sort(int[])")];
//!
//! let mut orchestrator = Orchestrator::new(
//!     config,
//!     LandscapeLoader::default(),
//!     LandscapeRunner,
//!     RuntimeFitness::new(),
//! )?;
//! for outcome in orchestrator.run(&methods)? {
//!     println!("{}: {} -> {}", outcome.method, outcome.baseline_fitness, outcome.best_fitness);
//! }
//! # Ok::<(), hom_gp::search::SearchError>(())
//! ```

pub mod schema;
pub mod search;

// Re-export commonly used types
pub use schema::{EditKind, SearchConfig, TargetMethod, UnitTest};
pub use search::{
    GenerationalSearch, MethodOutcome, Orchestrator, Patch, Program, SearchError, TestRunner,
};
