//! Heuristic components shared by the search strategies.
//!
//! This module contains:
//! - Moves: single edits of a placement
//! - Neighborhood: random and sampled move generation, seeding and shaking
//! - Candidate index: the lazy priority queue behind the greedy strategy

pub mod candidate_index;
pub mod r#move;
pub mod neighborhood;

pub use candidate_index::{CandidateIndex, GreedyStep};
pub use neighborhood::{Neighborhood, Operation};
pub use r#move::PlacementMove;
