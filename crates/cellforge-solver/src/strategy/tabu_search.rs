//! Tabu search.

use cellforge_config::{NeighborhoodConfig, ObjectiveConfig, StrategyKind, TabuSearchConfig};
use cellforge_core::{Placement, Problem};
use cellforge_scoring::Energy;
use tracing::{debug, info};

use super::best::BestPlacement;
use super::{best_candidate, SearchStrategy};
use crate::acceptor::TabuMemory;
use crate::heuristic::{Neighborhood, PlacementMove};
use crate::scope::RunScope;
use crate::termination::{ExternalTermination, OrTermination, StepCountTermination, Termination};

/// Moves to the best sampled neighbor that is not in tabu memory.
///
/// Unlike hill climbing the move is taken even when it is worse. A tabu
/// neighbor is still admissible if it beats the best energy seen so far.
#[derive(Debug, Clone)]
pub struct TabuSearch {
    config: TabuSearchConfig,
    energy: Energy,
    neighborhood: NeighborhoodConfig,
}

impl TabuSearch {
    pub fn new(
        config: TabuSearchConfig,
        objective: &ObjectiveConfig,
        neighborhood: NeighborhoodConfig,
    ) -> Self {
        let energy = Energy::new(objective, config.cost_divisor);
        Self {
            config,
            energy,
            neighborhood,
        }
    }

    /// Best neighbor that is not tabu, or that beats `best_energy`.
    pub(super) fn choose_move(
        &self,
        problem: &Problem,
        memory: &TabuMemory,
        current: &Placement,
        moves: &[PlacementMove],
        best_energy: f64,
    ) -> Option<(Placement, f64)> {
        best_candidate(problem, &self.energy, current, moves, |cand, e| {
            memory.is_admissible(&cand.key(), e, best_energy)
        })
    }
}

impl SearchStrategy for TabuSearch {
    fn kind(&self) -> StrategyKind {
        StrategyKind::TabuSearch
    }

    fn search(&self, scope: &mut RunScope<'_>) -> Placement {
        let problem = scope.problem();
        let hood = Neighborhood::new(problem, &self.neighborhood);
        let termination = OrTermination((
            StepCountTermination::new(self.config.max_iterations),
            ExternalTermination,
        ));
        let mut memory = TabuMemory::new(self.config.tabu_tenure);

        let mut current = hood.initial_placement(
            scope.rng(),
            self.config.max_initial_antennas,
            self.config.initial_large_bias,
        );
        let mut current_energy = self.energy.evaluate(problem, &current);
        let mut best = BestPlacement::new(problem, current.clone(), current_energy);

        info!(
            event = "phase_start",
            strategy = "tabu-search",
            antennas = current.len(),
            energy = current_energy,
            tenure = memory.tenure(),
        );

        while !termination.is_terminated(scope) {
            let step = scope.increment_step_count();
            memory.push(current.key());

            let cost = current.total_cost(problem.catalog());
            let moves = hood.sampled_moves(scope.rng(), &current, cost);
            let chosen = self.choose_move(problem, &memory, &current, &moves, best.energy());
            let Some((candidate, e)) = chosen else {
                info!(event = "no_admissible_move", step);
                break;
            };

            current = candidate;
            current_energy = e;
            if best.update(problem, &current, current_energy) {
                scope.mark_improved();
                debug!(
                    event = "new_best",
                    step,
                    antennas = current.len(),
                    energy = current_energy,
                    feasible = best.is_feasible(),
                );
            }

            if step % 20 == 0 {
                info!(
                    event = "progress",
                    step,
                    current_energy,
                    best_energy = best.energy(),
                    tabu_size = memory.len(),
                );
            }
        }

        info!(
            event = "phase_end",
            strategy = "tabu-search",
            steps = scope.step_count(),
            antennas = best.placement().len(),
            energy = best.energy(),
        );
        best.into_placement()
    }
}
