//! Configuration types for generational search runs.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{EditKind, parse_edit_kinds};

/// Top-level search configuration.
///
/// Field defaults match the GP command-line defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Edit-kind specification, e.g. `"LINE,STATEMENT"`.
    #[serde(default = "default_edit_type")]
    pub edit_type: String,
    /// Number of generations (G).
    #[serde(default = "default_generations")]
    pub generations: usize,
    /// Number of individuals per generation (N).
    #[serde(default = "default_individuals")]
    pub individuals: usize,
    /// Seed of the mutation stream (edit choice, crossover retention).
    #[serde(default = "default_seed")]
    pub mutation_seed: u64,
    /// Seed of the individual stream (shuffling, selection, padding).
    #[serde(default = "default_seed")]
    pub individual_seed: u64,
    /// Seed generation 0 with higher-order mutants.
    #[serde(default)]
    pub hom_enabled: bool,
    /// First-order candidates drawn by the sampler in HOM mode.
    #[serde(default = "default_patch_number")]
    pub patch_number: usize,
    /// Upper bound on first-order patches combined into one HOM.
    #[serde(default = "default_hom_size")]
    pub hom_size: usize,
    /// Number of elites. Reserved; the generational loop does not use it.
    #[serde(default = "default_elite_size")]
    pub elite_size: usize,
    /// Fraction of N inspected per tournament.
    #[serde(default = "default_tournament_fraction")]
    pub tournament_fraction: f64,
    /// Probability that crossover offers an edit to a child.
    #[serde(default = "default_crossover_probability")]
    pub crossover_probability: f64,
    /// Attempts allowed to assemble generation 0 from HOMs. `None` means 10 * N.
    #[serde(default)]
    pub max_hom_attempts: Option<usize>,
    /// Seed of the built-in first-order sampler.
    #[serde(default = "default_seed")]
    pub sampler_seed: u64,
    /// Path of the CSV result log.
    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            edit_type: default_edit_type(),
            generations: default_generations(),
            individuals: default_individuals(),
            mutation_seed: default_seed(),
            individual_seed: default_seed(),
            hom_enabled: false,
            patch_number: default_patch_number(),
            hom_size: default_hom_size(),
            elite_size: default_elite_size(),
            tournament_fraction: default_tournament_fraction(),
            crossover_probability: default_crossover_probability(),
            max_hom_attempts: None,
            sampler_seed: default_seed(),
            output_file: default_output_file(),
        }
    }
}

fn default_edit_type() -> String {
    "STATEMENT".to_string()
}
fn default_generations() -> usize {
    1
}
fn default_individuals() -> usize {
    10
}
fn default_seed() -> u64 {
    123
}
fn default_patch_number() -> usize {
    100
}
fn default_hom_size() -> usize {
    2
}
fn default_elite_size() -> usize {
    10
}
fn default_tournament_fraction() -> f64 {
    0.2
}
fn default_crossover_probability() -> f64 {
    0.5
}
fn default_output_file() -> PathBuf {
    PathBuf::from("gp_results.csv")
}

impl SearchConfig {
    /// Load configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SearchConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Parsed edit kinds, in specification order.
    pub fn edit_kinds(&self) -> Result<Vec<EditKind>, ConfigError> {
        parse_edit_kinds(&self.edit_type)
    }

    /// Retry budget for HOM seeding.
    pub fn hom_attempt_budget(&self) -> usize {
        self.max_hom_attempts
            .unwrap_or(10 * self.individuals)
            .max(self.individuals)
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.individuals == 0 {
            return Err(ConfigError::InvalidIndividuals);
        }
        if self.generations == 0 {
            return Err(ConfigError::InvalidGenerations);
        }
        if self.hom_size < 2 {
            return Err(ConfigError::InvalidHomSize(self.hom_size));
        }
        if !(self.tournament_fraction > 0.0 && self.tournament_fraction <= 1.0) {
            return Err(ConfigError::InvalidTournamentFraction(
                self.tournament_fraction,
            ));
        }
        if !(0.0..=1.0).contains(&self.crossover_probability) {
            return Err(ConfigError::InvalidCrossoverProbability(
                self.crossover_probability,
            ));
        }
        self.edit_kinds()?;
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Number of individuals must be positive")]
    InvalidIndividuals,
    #[error("Number of generations must be positive")]
    InvalidGenerations,
    #[error("HOM size must be at least 2, got {0}")]
    InvalidHomSize(usize),
    #[error("Tournament fraction must be in (0, 1], got {0}")]
    InvalidTournamentFraction(f64),
    #[error("Crossover probability must be in [0, 1], got {0}")]
    InvalidCrossoverProbability(f64),
    #[error("Edit type specification names no edit kinds")]
    EmptyEditKinds,
    #[error("Unknown edit kind '{0}'")]
    UnknownEditKind(String),
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config: SearchConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.edit_type, "STATEMENT");
        assert_eq!(config.generations, 1);
        assert_eq!(config.individuals, 10);
        assert_eq!(config.mutation_seed, 123);
        assert_eq!(config.individual_seed, 123);
        assert!(!config.hom_enabled);
        assert_eq!(config.patch_number, 100);
        assert_eq!(config.hom_size, 2);
        assert_eq!(config.elite_size, 10);
        assert_eq!(config.hom_attempt_budget(), 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad = SearchConfig {
            individuals: 0,
            ..Default::default()
        };
        assert!(matches!(bad.validate(), Err(ConfigError::InvalidIndividuals)));

        let bad = SearchConfig {
            generations: 0,
            ..Default::default()
        };
        assert!(matches!(bad.validate(), Err(ConfigError::InvalidGenerations)));

        let bad = SearchConfig {
            hom_size: 1,
            ..Default::default()
        };
        assert!(matches!(bad.validate(), Err(ConfigError::InvalidHomSize(1))));

        let bad = SearchConfig {
            tournament_fraction: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            bad.validate(),
            Err(ConfigError::InvalidTournamentFraction(_))
        ));

        let bad = SearchConfig {
            edit_type: "NOPE".into(),
            ..Default::default()
        };
        assert!(matches!(bad.validate(), Err(ConfigError::UnknownEditKind(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("search.json");
        fs::write(
            &path,
            r#"{"edit_type":"LINE,STATEMENT","individuals":4,"hom_enabled":true}"#,
        )
        .unwrap();

        let config = SearchConfig::load(&path).unwrap();
        assert_eq!(config.individuals, 4);
        assert!(config.hom_enabled);
        assert_eq!(
            config.edit_kinds().unwrap(),
            vec![EditKind::Line, EditKind::Statement]
        );
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result = SearchConfig::load(dir.path().join("absent.json"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
