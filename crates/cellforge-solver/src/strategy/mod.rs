//! The six search strategies.
//!
//! Each strategy runs synchronously to completion inside a [`RunScope`] and
//! returns its best placement before cleanup. [`Strategy`] dispatches to the
//! concrete strategy selected by an [`OptimizerConfig`] without boxing.

mod best;
mod genetic;
mod greedy;
mod hill_climbing;
mod simulated_annealing;
mod tabu_search;
mod vns;

use std::fmt::Debug;

use cellforge_config::{OptimizerConfig, StrategyConfig, StrategyKind};
use cellforge_core::{Placement, Problem};
use cellforge_scoring::Energy;
use tracing::warn;

use crate::heuristic::PlacementMove;
use crate::scope::RunScope;

pub use genetic::Genetic;
pub use greedy::Greedy;
pub use hill_climbing::HillClimbing;
pub use simulated_annealing::SimulatedAnnealing;
pub use tabu_search::TabuSearch;
pub use vns::Vns;

/// A search strategy.
pub trait SearchStrategy: Debug {
    fn kind(&self) -> StrategyKind;

    /// Runs the search and returns the best placement found, before cleanup.
    fn search(&self, scope: &mut RunScope<'_>) -> Placement;
}

/// Any of the six strategies.
#[derive(Debug, Clone)]
pub enum Strategy {
    Greedy(Greedy),
    Genetic(Genetic),
    HillClimbing(HillClimbing),
    SimulatedAnnealing(SimulatedAnnealing),
    TabuSearch(TabuSearch),
    Vns(Vns),
}

impl Strategy {
    pub fn from_config(config: &OptimizerConfig) -> Self {
        let objective = &config.objective;
        let neighborhood = &config.neighborhood;
        match &config.strategy {
            StrategyConfig::Greedy(c) => Strategy::Greedy(Greedy::new(c.clone())),
            StrategyConfig::Genetic(c) => Strategy::Genetic(Genetic::new(c.clone(), objective)),
            StrategyConfig::HillClimbing(c) => Strategy::HillClimbing(HillClimbing::new(
                c.clone(),
                objective,
                neighborhood.clone(),
            )),
            StrategyConfig::SimulatedAnnealing(c) => Strategy::SimulatedAnnealing(
                SimulatedAnnealing::new(c.clone(), objective, neighborhood.clone()),
            ),
            StrategyConfig::TabuSearch(c) => Strategy::TabuSearch(TabuSearch::new(
                c.clone(),
                objective,
                neighborhood.clone(),
            )),
            StrategyConfig::Vns(c) => {
                Strategy::Vns(Vns::new(c.clone(), objective, neighborhood.clone()))
            }
        }
    }
}

impl SearchStrategy for Strategy {
    fn kind(&self) -> StrategyKind {
        match self {
            Strategy::Greedy(s) => s.kind(),
            Strategy::Genetic(s) => s.kind(),
            Strategy::HillClimbing(s) => s.kind(),
            Strategy::SimulatedAnnealing(s) => s.kind(),
            Strategy::TabuSearch(s) => s.kind(),
            Strategy::Vns(s) => s.kind(),
        }
    }

    fn search(&self, scope: &mut RunScope<'_>) -> Placement {
        if scope.problem().house_count() == 0 {
            warn!(event = "no_demand", strategy = %self.kind());
            return Placement::new();
        }
        match self {
            Strategy::Greedy(s) => s.search(scope),
            Strategy::Genetic(s) => s.search(scope),
            Strategy::HillClimbing(s) => s.search(scope),
            Strategy::SimulatedAnnealing(s) => s.search(scope),
            Strategy::TabuSearch(s) => s.search(scope),
            Strategy::Vns(s) => s.search(scope),
        }
    }
}

/// Lowest-energy candidate among `moves` that passes `admit`.
///
/// Ties keep the earlier move.
pub(crate) fn best_candidate(
    problem: &Problem,
    energy: &Energy,
    current: &Placement,
    moves: &[PlacementMove],
    mut admit: impl FnMut(&Placement, f64) -> bool,
) -> Option<(Placement, f64)> {
    let mut best: Option<(Placement, f64)> = None;
    for mv in moves {
        let candidate = mv.apply(current);
        let e = energy.evaluate(problem, &candidate);
        if best.as_ref().map_or(true, |(_, b)| e < *b) && admit(&candidate, e) {
            best = Some((candidate, e));
        }
    }
    best
}

#[cfg(test)]
mod tests;
