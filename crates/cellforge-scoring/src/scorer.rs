//! Greedy candidate scoring.
//!
//! A scorer maps the marginal gain of one candidate antenna to a priority.
//! Every scorer must be monotone: as the covered set grows, a candidate's
//! gain can only shrink, and so can its score. The lazy candidate heap relies
//! on this to treat stale keys as upper bounds.

use cellforge_config::{GreedyConfig, GreedyScoring};

/// Marginal gain of adding one antenna to the current placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CandidateGain {
    /// Users in houses not yet covered.
    pub new_users: u64,
    /// Plain cells not yet covered.
    pub new_cells: u64,
    /// Antenna cost.
    pub cost: u64,
    /// Antenna capacity, `None` if unbounded.
    pub capacity: Option<u32>,
}

/// Ranks candidates for the greedy strategy. Higher is better; a score of
/// zero or below is never placed.
pub trait CandidateScorer {
    fn score(&self, gain: &CandidateGain) -> f64;

    fn name(&self) -> &'static str;

    /// Whether the score reads `new_cells`. Callers may skip counting
    /// plain cells when it does not.
    fn uses_cells(&self) -> bool {
        false
    }
}

/// Newly covered users per unit cost.
#[derive(Debug, Clone, Copy, Default)]
pub struct CostPerUser;

impl CandidateScorer for CostPerUser {
    fn score(&self, gain: &CandidateGain) -> f64 {
        if gain.new_users == 0 {
            return 0.0;
        }
        gain.new_users as f64 / gain.cost.max(1) as f64
    }

    fn name(&self) -> &'static str {
        "cost_per_user"
    }
}

/// Users weigh ten times a plain cell.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxCoverage;

impl CandidateScorer for MaxCoverage {
    fn score(&self, gain: &CandidateGain) -> f64 {
        if gain.new_users == 0 {
            return 0.0;
        }
        (gain.new_users * 10 + gain.new_cells) as f64
    }

    fn name(&self) -> &'static str {
        "max_coverage"
    }

    fn uses_cells(&self) -> bool {
        true
    }
}

/// Servable users minus weighted idle capacity, per unit cost.
#[derive(Debug, Clone, Copy)]
pub struct CapacityWaste {
    pub waste_weight: f64,
}

impl CandidateScorer for CapacityWaste {
    fn score(&self, gain: &CandidateGain) -> f64 {
        if gain.new_users == 0 {
            return 0.0;
        }
        let (served, waste) = match gain.capacity {
            Some(cap) => {
                let cap = cap as u64;
                let served = gain.new_users.min(cap);
                (served, cap - served)
            }
            None => (gain.new_users, 0),
        };
        // Clamped so that a shrinking gain never raises the score.
        ((served as f64 - self.waste_weight * waste as f64) / gain.cost.max(1) as f64).max(0.0)
    }

    fn name(&self) -> &'static str {
        "capacity_waste"
    }
}

/// The scorer selected by a [`GreedyConfig`], dispatched without boxing.
#[derive(Debug, Clone, Copy)]
pub enum GreedyScorer {
    CostPerUser(CostPerUser),
    MaxCoverage(MaxCoverage),
    CapacityWaste(CapacityWaste),
}

impl From<&GreedyConfig> for GreedyScorer {
    fn from(config: &GreedyConfig) -> Self {
        match config.scoring {
            GreedyScoring::CostPerUser => GreedyScorer::CostPerUser(CostPerUser),
            GreedyScoring::MaxCoverage => GreedyScorer::MaxCoverage(MaxCoverage),
            GreedyScoring::CapacityWaste => GreedyScorer::CapacityWaste(CapacityWaste {
                waste_weight: config.waste_weight,
            }),
        }
    }
}

impl CandidateScorer for GreedyScorer {
    fn score(&self, gain: &CandidateGain) -> f64 {
        match self {
            GreedyScorer::CostPerUser(s) => s.score(gain),
            GreedyScorer::MaxCoverage(s) => s.score(gain),
            GreedyScorer::CapacityWaste(s) => s.score(gain),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            GreedyScorer::CostPerUser(s) => s.name(),
            GreedyScorer::MaxCoverage(s) => s.name(),
            GreedyScorer::CapacityWaste(s) => s.name(),
        }
    }

    fn uses_cells(&self) -> bool {
        match self {
            GreedyScorer::CostPerUser(s) => s.uses_cells(),
            GreedyScorer::MaxCoverage(s) => s.uses_cells(),
            GreedyScorer::CapacityWaste(s) => s.uses_cells(),
        }
    }
}
