//! cellforge - antenna placement optimization in Rust
//!
//! Places antennas of several types on a grid so that as many users as
//! possible are covered, within an optional budget and antenna cap.
//!
//! # Example
//!
//! ```rust
//! use cellforge::prelude::*;
//!
//! let problem = ProblemSpec::new(10, 10).with_houses([(5, 5)]).build().unwrap();
//! let config = OptimizerConfig::new().with_strategy(GreedyConfig::default());
//! let result = optimize(&problem, &config).unwrap();
//! assert_eq!(result.antenna_count(), 1);
//! assert_eq!(result.stats.user_coverage_percentage, 100.0);
//! ```

// Instance model
pub use cellforge_core::{
    AntennaSpec, Catalog, CellforgeError, Grid, KindId, PlacedAntenna, Placement, Position,
    Problem, ProblemSpec, Result,
};

// Configuration
pub use cellforge_config::{
    ConfigError, GeneticConfig, GreedyConfig, GreedyScoring, HillClimbingConfig,
    NeighborhoodConfig, ObjectiveConfig, OptimizerConfig, SimulatedAnnealingConfig,
    StrategyConfig, StrategyKind, TabuSearchConfig, VnsConfig,
};

// Statistics
pub use cellforge_scoring::{AntennaPlacement, ConstraintReport, Energy, Fitness, PlacementStats};

// Running
pub use cellforge_solver::{
    optimize, optimize_by_name, optimize_streaming, CompleteEvent, OptimizeHandle, Optimizer,
    PlacementResult, ProgressEvent, SolveEvent,
};

mod runner;
pub use runner::{run, spawn_streaming, StreamingRun, CONFIG_FILE};

pub mod prelude {
    pub use super::{
        optimize, optimize_by_name, run, spawn_streaming, GreedyConfig, OptimizerConfig,
        PlacementResult, ProblemSpec, SimulatedAnnealingConfig, SolveEvent, StrategyKind,
    };
}
