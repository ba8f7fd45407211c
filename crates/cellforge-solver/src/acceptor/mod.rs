//! Acceptors for local search.
//!
//! An acceptor decides whether the search moves from the current placement
//! to a candidate, given both energies. Lower energy is better.

mod hill_climbing;
mod simulated_annealing;
mod tabu;

use std::fmt::Debug;

use rand::RngCore;

pub use hill_climbing::HillClimbingAcceptor;
pub use simulated_annealing::SimulatedAnnealingAcceptor;
pub use tabu::TabuMemory;

/// Trait for accepting or rejecting candidate placements.
pub trait Acceptor: Debug {
    /// Returns true if the search should move to a candidate with
    /// `candidate_energy`, given the current placement's energy.
    fn is_accepted(
        &mut self,
        rng: &mut dyn RngCore,
        current_energy: f64,
        candidate_energy: f64,
    ) -> bool;

    /// Called when a run starts.
    fn phase_started(&mut self, _initial_energy: f64) {}

    /// Called at the end of each outer step.
    fn step_ended(&mut self) {}
}
