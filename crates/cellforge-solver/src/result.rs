//! Result of an optimization run.

use std::time::Duration;

use cellforge_config::StrategyKind;
use cellforge_core::{Placement, Problem};
use cellforge_scoring::PlacementStats;
use serde::{Deserialize, Serialize};

/// Final placement with its statistics.
///
/// Serializes as the flat statistics object plus `strategy` and `elapsed_ms`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementResult {
    pub strategy: StrategyKind,
    #[serde(flatten)]
    pub stats: PlacementStats,
    pub elapsed_ms: u64,
    #[serde(skip)]
    pub placement: Placement,
}

impl PlacementResult {
    pub fn new(
        problem: &Problem,
        strategy: StrategyKind,
        placement: Placement,
        elapsed: Duration,
    ) -> Self {
        Self {
            strategy,
            stats: PlacementStats::compute(problem, &placement),
            elapsed_ms: elapsed.as_millis() as u64,
            placement,
        }
    }

    pub fn antenna_count(&self) -> usize {
        self.placement.len()
    }

    pub fn users_covered(&self) -> u64 {
        self.stats.users_covered
    }

    pub fn total_cost(&self) -> u64 {
        self.stats.total_cost
    }

    /// Returns true if the placement satisfies every set constraint.
    pub fn is_feasible(&self) -> bool {
        self.stats.constraints.is_satisfied()
    }
}
