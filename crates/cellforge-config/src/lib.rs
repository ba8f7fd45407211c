//! Configuration system for cellforge.
//!
//! Load optimizer configuration from TOML or YAML to pick a strategy and tune
//! it without code changes. Every field has a default, so an empty document
//! is a valid configuration.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use cellforge_config::{OptimizerConfig, StrategyKind};
//!
//! let config = OptimizerConfig::from_toml_str(r#"
//!     random_seed = 7
//!
//!     [strategy]
//!     type = "simulated_annealing"
//!     initial_temperature = 50.0
//!     cooling_rate = 0.9
//! "#).unwrap();
//!
//! assert_eq!(config.random_seed, Some(7));
//! assert_eq!(config.strategy.kind(), StrategyKind::SimulatedAnnealing);
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use cellforge_config::OptimizerConfig;
//!
//! let config = OptimizerConfig::load("cellforge.toml").unwrap_or_default();
//! ```

mod strategy;

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use strategy::{
    GeneticConfig, GreedyConfig, GreedyScoring, HillClimbingConfig, SimulatedAnnealingConfig,
    StrategyConfig, StrategyKind, TabuSearchConfig, VnsConfig,
};

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main optimizer configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct OptimizerConfig {
    /// Random seed for reproducible results. `None` draws from OS entropy.
    #[serde(default)]
    pub random_seed: Option<u64>,

    /// Search strategy and its parameters.
    #[serde(default)]
    pub strategy: StrategyConfig,

    /// Objective weights shared by every strategy.
    #[serde(default)]
    pub objective: ObjectiveConfig,

    /// Neighbor sampling for the local-search family.
    #[serde(default)]
    pub neighborhood: NeighborhoodConfig,
}

impl OptimizerConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Replaces the strategy.
    pub fn with_strategy(mut self, strategy: impl Into<StrategyConfig>) -> Self {
        self.strategy = strategy.into();
        self
    }

    pub fn with_objective(mut self, objective: ObjectiveConfig) -> Self {
        self.objective = objective;
        self
    }

    pub fn with_neighborhood(mut self, neighborhood: NeighborhoodConfig) -> Self {
        self.neighborhood = neighborhood;
        self
    }

    /// Checks every parameter range.
    ///
    /// Parsing calls this automatically; call it directly for configs built in code.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.strategy.validate()?;
        self.objective.validate()?;
        self.neighborhood.validate()
    }
}

/// Objective weights.
///
/// The energy terms are used by the local-search family, the fitness terms
/// by the genetic strategy.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ObjectiveConfig {
    /// Energy charged per uncovered user.
    pub uncovered_user_penalty: f64,

    /// Energy charged per unit of relative budget overrun.
    pub budget_overrun_penalty: f64,

    /// Fitness weight of the covered-house ratio.
    pub coverage_weight: f64,

    /// Fitness weight of the normalized cost.
    pub cost_weight: f64,

    /// Fitness bonus when every house is covered.
    pub full_coverage_bonus: f64,
}

impl Default for ObjectiveConfig {
    fn default() -> Self {
        Self {
            uncovered_user_penalty: 10.0,
            budget_overrun_penalty: 100.0,
            coverage_weight: 100.0,
            cost_weight: 50.0,
            full_coverage_bonus: 50.0,
        }
    }
}

impl ObjectiveConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let weights = [
            ("uncovered_user_penalty", self.uncovered_user_penalty),
            ("budget_overrun_penalty", self.budget_overrun_penalty),
            ("coverage_weight", self.coverage_weight),
            ("cost_weight", self.cost_weight),
            ("full_coverage_bonus", self.full_coverage_bonus),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Neighbor sampling sizes and operation weights.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct NeighborhoodConfig {
    /// Random positions tried for add neighbors per step.
    pub add_samples: usize,

    /// Random relocation targets tried per antenna per step.
    pub move_samples_per_antenna: usize,

    /// Attempts to find a valid position for a single random operation.
    pub random_attempts: usize,

    /// Relative weight of the add operation in random neighbor draws.
    pub add_weight: u32,

    /// Relative weight of the remove operation.
    pub remove_weight: u32,

    /// Relative weight of the relocate operation.
    pub move_weight: u32,

    /// Relative weight of the retype operation.
    pub retype_weight: u32,
}

impl Default for NeighborhoodConfig {
    fn default() -> Self {
        Self {
            add_samples: 20,
            move_samples_per_antenna: 5,
            random_attempts: 50,
            add_weight: 30,
            remove_weight: 30,
            move_weight: 25,
            retype_weight: 15,
        }
    }
}

impl NeighborhoodConfig {
    /// Operation weights in add, remove, move, retype order.
    pub fn weights(&self) -> [u32; 4] {
        [
            self.add_weight,
            self.remove_weight,
            self.move_weight,
            self.retype_weight,
        ]
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.weights().iter().all(|&w| w == 0) {
            return Err(ConfigError::Invalid(
                "at least one neighborhood operation weight must be positive".to_string(),
            ));
        }
        if self.random_attempts == 0 {
            return Err(ConfigError::Invalid(
                "random_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
