//! cellforge search engine
//!
//! This crate provides the search side of antenna placement:
//! - Six strategies behind one [`SearchStrategy`] trait
//! - Neighbor generation and the greedy candidate index
//! - Acceptors and termination conditions for the local-search family
//! - Progress events and cancellation
//! - [`optimize`] and friends, which run a strategy and clean up its result

pub mod acceptor;
pub mod cleanup;
pub mod event;
pub mod heuristic;
pub mod optimize;
pub mod result;
pub mod scope;
pub mod strategy;
pub mod termination;

pub use acceptor::{Acceptor, HillClimbingAcceptor, SimulatedAnnealingAcceptor, TabuMemory};
pub use cleanup::remove_useless;
pub use event::{CompleteEvent, ProgressEvent, SolveEvent};
pub use heuristic::{CandidateIndex, GreedyStep, Neighborhood, Operation, PlacementMove};
pub use optimize::{optimize, optimize_by_name, optimize_streaming, OptimizeHandle, Optimizer};
pub use result::PlacementResult;
pub use scope::RunScope;
pub use strategy::{
    Genetic, Greedy, HillClimbing, SearchStrategy, SimulatedAnnealing, Strategy, TabuSearch, Vns,
};
pub use termination::{
    ExternalTermination, OrTermination, StepCountTermination, Termination,
    UnimprovedStepCountTermination,
};

#[cfg(test)]
mod tests;
