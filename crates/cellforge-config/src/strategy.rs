//! Strategy selection and per-strategy parameters.

use std::fmt;
use std::str::FromStr;

use cellforge_core::CellforgeError;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// The six search strategies, by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    Greedy,
    Genetic,
    HillClimbing,
    SimulatedAnnealing,
    TabuSearch,
    Vns,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 6] = [
        StrategyKind::Greedy,
        StrategyKind::Genetic,
        StrategyKind::HillClimbing,
        StrategyKind::SimulatedAnnealing,
        StrategyKind::TabuSearch,
        StrategyKind::Vns,
    ];

    /// Canonical kebab-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            StrategyKind::Greedy => "greedy",
            StrategyKind::Genetic => "genetic",
            StrategyKind::HillClimbing => "hill-climbing",
            StrategyKind::SimulatedAnnealing => "simulated-annealing",
            StrategyKind::TabuSearch => "tabu-search",
            StrategyKind::Vns => "vns",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = CellforgeError;

    /// Accepts kebab-case or snake_case, case-insensitively, plus short aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "greedy" => Ok(StrategyKind::Greedy),
            "genetic" | "ga" => Ok(StrategyKind::Genetic),
            "hill-climbing" | "hc" => Ok(StrategyKind::HillClimbing),
            "simulated-annealing" | "sa" => Ok(StrategyKind::SimulatedAnnealing),
            "tabu-search" | "tabu" => Ok(StrategyKind::TabuSearch),
            "vns" | "variable-neighborhood-search" => Ok(StrategyKind::Vns),
            _ => Err(CellforgeError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Strategy configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrategyConfig {
    Greedy(GreedyConfig),
    Genetic(GeneticConfig),
    HillClimbing(HillClimbingConfig),
    SimulatedAnnealing(SimulatedAnnealingConfig),
    TabuSearch(TabuSearchConfig),
    Vns(VnsConfig),
}

impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyConfig::Greedy(GreedyConfig::default())
    }
}

impl StrategyConfig {
    /// Default parameters for a strategy.
    pub fn defaults_for(kind: StrategyKind) -> Self {
        match kind {
            StrategyKind::Greedy => GreedyConfig::default().into(),
            StrategyKind::Genetic => GeneticConfig::default().into(),
            StrategyKind::HillClimbing => HillClimbingConfig::default().into(),
            StrategyKind::SimulatedAnnealing => SimulatedAnnealingConfig::default().into(),
            StrategyKind::TabuSearch => TabuSearchConfig::default().into(),
            StrategyKind::Vns => VnsConfig::default().into(),
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            StrategyConfig::Greedy(_) => StrategyKind::Greedy,
            StrategyConfig::Genetic(_) => StrategyKind::Genetic,
            StrategyConfig::HillClimbing(_) => StrategyKind::HillClimbing,
            StrategyConfig::SimulatedAnnealing(_) => StrategyKind::SimulatedAnnealing,
            StrategyConfig::TabuSearch(_) => StrategyKind::TabuSearch,
            StrategyConfig::Vns(_) => StrategyKind::Vns,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        match self {
            StrategyConfig::Greedy(c) => c.validate(),
            StrategyConfig::Genetic(c) => c.validate(),
            StrategyConfig::HillClimbing(c) => c.validate(),
            StrategyConfig::SimulatedAnnealing(c) => c.validate(),
            StrategyConfig::TabuSearch(c) => c.validate(),
            StrategyConfig::Vns(c) => c.validate(),
        }
    }
}

impl FromStr for StrategyConfig {
    type Err = CellforgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<StrategyKind>().map(Self::defaults_for)
    }
}

macro_rules! impl_into_strategy {
    ($($config:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$config> for StrategyConfig {
                fn from(config: $config) -> Self {
                    StrategyConfig::$variant(config)
                }
            }
        )*
    };
}

impl_into_strategy! {
    GreedyConfig => Greedy,
    GeneticConfig => Genetic,
    HillClimbingConfig => HillClimbing,
    SimulatedAnnealingConfig => SimulatedAnnealing,
    TabuSearchConfig => TabuSearch,
    VnsConfig => Vns,
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(msg.into())
}

fn check_probability(name: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be in [0, 1], got {value}")))
    }
}

fn check_divisor(value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("cost_divisor must be positive, got {value}")))
    }
}

/// How the greedy strategy ranks candidate placements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GreedyScoring {
    /// Newly covered users per unit cost.
    #[default]
    CostPerUser,

    /// Newly covered users first, newly covered cells as tie-break.
    MaxCoverage,

    /// Users actually servable under capacity, minus idle capacity, per unit cost.
    CapacityWaste,
}

/// Greedy strategy configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct GreedyConfig {
    pub scoring: GreedyScoring,

    /// Weight of idle capacity in [`GreedyScoring::CapacityWaste`].
    pub waste_weight: f64,

    /// Stop once this percentage of users is covered.
    pub target_coverage: f64,

    /// Use the lazy candidate heap. When false, every step rescans the grid.
    pub use_candidate_index: bool,
}

impl Default for GreedyConfig {
    fn default() -> Self {
        Self {
            scoring: GreedyScoring::CostPerUser,
            waste_weight: 0.5,
            target_coverage: 100.0,
            use_candidate_index: true,
        }
    }
}

impl GreedyConfig {
    pub fn with_scoring(mut self, scoring: GreedyScoring) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn with_target_coverage(mut self, percent: f64) -> Self {
        self.target_coverage = percent;
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=100.0).contains(&self.target_coverage) {
            return Err(invalid(format!(
                "target_coverage must be in [0, 100], got {}",
                self.target_coverage
            )));
        }
        if !self.waste_weight.is_finite() || self.waste_weight < 0.0 {
            return Err(invalid("waste_weight must be non-negative"));
        }
        Ok(())
    }
}

/// Genetic strategy configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct GeneticConfig {
    pub population_size: usize,
    pub generations: usize,
    pub mutation_rate: f64,
    pub crossover_rate: f64,
    pub tournament_size: usize,

    /// Antenna cap for random chromosomes when the instance sets none.
    pub default_max_antennas: usize,
}

impl Default for GeneticConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 100,
            mutation_rate: 0.15,
            crossover_rate: 0.7,
            tournament_size: 3,
            default_max_antennas: 15,
        }
    }
}

impl GeneticConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        check_probability("mutation_rate", self.mutation_rate)?;
        check_probability("crossover_rate", self.crossover_rate)?;
        if self.population_size < 2 {
            return Err(invalid("population_size must be at least 2"));
        }
        if self.tournament_size == 0 || self.tournament_size > self.population_size {
            return Err(invalid(format!(
                "tournament_size must be in [1, {}], got {}",
                self.population_size, self.tournament_size
            )));
        }
        if self.default_max_antennas == 0 {
            return Err(invalid("default_max_antennas must be at least 1"));
        }
        Ok(())
    }
}

/// Hill-climbing configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct HillClimbingConfig {
    pub max_iterations: u64,
    pub max_initial_antennas: usize,
    /// Probability of seeding with the widest antenna type.
    pub initial_large_bias: f64,
    pub cost_divisor: f64,
}

impl Default for HillClimbingConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            max_initial_antennas: 5,
            initial_large_bias: 0.5,
            cost_divisor: 1000.0,
        }
    }
}

impl HillClimbingConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        check_probability("initial_large_bias", self.initial_large_bias)?;
        check_divisor(self.cost_divisor)
    }
}

/// Simulated annealing configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SimulatedAnnealingConfig {
    pub initial_temperature: f64,
    /// Geometric factor applied after each temperature step.
    pub cooling_rate: f64,
    pub min_temperature: f64,
    pub iterations_per_temperature: u64,
    /// Stop after this many iterations without a new best.
    pub early_stopping_iterations: Option<u64>,
    pub max_initial_antennas: usize,
    pub initial_large_bias: f64,
    pub cost_divisor: f64,
}

impl Default for SimulatedAnnealingConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 100.0,
            cooling_rate: 0.95,
            min_temperature: 0.1,
            iterations_per_temperature: 100,
            early_stopping_iterations: Some(5000),
            max_initial_antennas: 10,
            initial_large_bias: 0.4,
            cost_divisor: 5000.0,
        }
    }
}

impl SimulatedAnnealingConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    pub fn with_iterations_per_temperature(mut self, n: u64) -> Self {
        self.iterations_per_temperature = n;
        self
    }

    /// Number of temperature steps before `min_temperature` is reached.
    pub fn temperature_steps(&self) -> u64 {
        if self.initial_temperature <= self.min_temperature {
            return 0;
        }
        let ratio = (self.min_temperature / self.initial_temperature).ln() / self.cooling_rate.ln();
        ratio.ceil().max(0.0) as u64
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err(invalid(format!(
                "cooling_rate must be in (0, 1), got {}",
                self.cooling_rate
            )));
        }
        if self.min_temperature.is_nan()
            || self.min_temperature <= 0.0
            || !self.initial_temperature.is_finite()
        {
            return Err(invalid(
                "temperatures must be finite and min_temperature positive",
            ));
        }
        if self.iterations_per_temperature == 0 {
            return Err(invalid("iterations_per_temperature must be at least 1"));
        }
        check_probability("initial_large_bias", self.initial_large_bias)?;
        check_divisor(self.cost_divisor)
    }
}

/// Tabu search configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct TabuSearchConfig {
    pub max_iterations: u64,
    /// Number of recent solutions kept in tabu memory.
    pub tabu_tenure: usize,
    pub max_initial_antennas: usize,
    pub initial_large_bias: f64,
    pub cost_divisor: f64,
}

impl Default for TabuSearchConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tabu_tenure: 20,
            max_initial_antennas: 5,
            initial_large_bias: 0.5,
            cost_divisor: 1000.0,
        }
    }
}

impl TabuSearchConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.tabu_tenure == 0 {
            return Err(invalid("tabu_tenure must be at least 1"));
        }
        check_probability("initial_large_bias", self.initial_large_bias)?;
        check_divisor(self.cost_divisor)
    }
}

/// Variable neighborhood search configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct VnsConfig {
    pub max_iterations: u64,
    /// Largest shake intensity.
    pub k_max: usize,
    /// Improvement passes of the polish step.
    pub local_search_iterations: usize,
    pub max_initial_antennas: usize,
    pub initial_large_bias: f64,
    pub cost_divisor: f64,
}

impl Default for VnsConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            k_max: 3,
            local_search_iterations: 50,
            max_initial_antennas: 5,
            initial_large_bias: 0.0,
            cost_divisor: 1000.0,
        }
    }
}

impl VnsConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.k_max == 0 {
            return Err(invalid("k_max must be at least 1"));
        }
        check_probability("initial_large_bias", self.initial_large_bias)?;
        check_divisor(self.cost_divisor)
    }
}
