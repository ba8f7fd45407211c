//! Best placement seen by a penalty-driven search.

use cellforge_core::{Placement, Problem};

/// Best placement recorded so far, ranked feasibility first.
///
/// A placement is feasible when its energy is finite and its cost fits the
/// budget. Any feasible placement outranks any infeasible one; within the
/// same class the lower energy wins.
#[derive(Debug, Clone)]
pub(crate) struct BestPlacement {
    placement: Placement,
    energy: f64,
    feasible: bool,
}

impl BestPlacement {
    pub(crate) fn new(problem: &Problem, placement: Placement, energy: f64) -> Self {
        let feasible = is_feasible(problem, &placement, energy);
        Self {
            placement,
            energy,
            feasible,
        }
    }

    pub(crate) fn placement(&self) -> &Placement {
        &self.placement
    }

    pub(crate) fn energy(&self) -> f64 {
        self.energy
    }

    pub(crate) fn is_feasible(&self) -> bool {
        self.feasible
    }

    /// Whether `candidate` would replace the recorded placement.
    pub(crate) fn is_improved_by(&self, problem: &Problem, candidate: &Placement, energy: f64) -> bool {
        let feasible = is_feasible(problem, candidate, energy);
        match (feasible, self.feasible) {
            (true, false) => true,
            (false, true) => false,
            _ => energy < self.energy,
        }
    }

    /// Records `candidate` if it ranks above the current best.
    pub(crate) fn update(&mut self, problem: &Problem, candidate: &Placement, energy: f64) -> bool {
        if !self.is_improved_by(problem, candidate, energy) {
            return false;
        }
        self.feasible = is_feasible(problem, candidate, energy);
        self.placement = candidate.clone();
        self.energy = energy;
        true
    }

    pub(crate) fn into_placement(self) -> Placement {
        self.placement
    }
}

fn is_feasible(problem: &Problem, placement: &Placement, energy: f64) -> bool {
    energy.is_finite() && problem.within_budget(placement.total_cost(problem.catalog()))
}
