//! Scoring for cellforge placements.
//!
//! This crate provides:
//! - [`Energy`] and [`Fitness`]: the two objective formulations
//! - [`CandidateScorer`] implementations ranking greedy candidates
//! - [`assign_users`]: capacity-aware house-to-antenna assignment
//! - [`PlacementStats`]: the statistics reported with a result

pub mod capacity;
pub mod evaluation;
pub mod objective;
pub mod scorer;
pub mod stats;

pub use capacity::{assign_users, Assignment};
pub use evaluation::{covered_area, covered_houses, is_useful, summarize, CoverageSummary};
pub use objective::{Energy, Fitness};
pub use scorer::{
    CandidateGain, CandidateScorer, CapacityWaste, CostPerUser, GreedyScorer, MaxCoverage,
};
pub use stats::{AntennaPlacement, ConstraintReport, PlacementStats};
