//! Steepest-descent hill climbing.

use cellforge_config::{HillClimbingConfig, NeighborhoodConfig, ObjectiveConfig, StrategyKind};
use cellforge_core::Placement;
use cellforge_scoring::{summarize, Energy};
use tracing::{debug, info};

use super::best::BestPlacement;
use super::{best_candidate, SearchStrategy};
use crate::acceptor::{Acceptor, HillClimbingAcceptor};
use crate::heuristic::Neighborhood;
use crate::scope::RunScope;
use crate::termination::{ExternalTermination, OrTermination, StepCountTermination, Termination};

/// Moves to the best sampled neighbor while it strictly lowers the energy.
#[derive(Debug, Clone)]
pub struct HillClimbing {
    config: HillClimbingConfig,
    energy: Energy,
    neighborhood: NeighborhoodConfig,
}

impl HillClimbing {
    pub fn new(
        config: HillClimbingConfig,
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
}

impl SearchStrategy for HillClimbing {
    fn kind(&self) -> StrategyKind {
        StrategyKind::HillClimbing
    }

    fn search(&self, scope: &mut RunScope<'_>) -> Placement {
        let problem = scope.problem();
        let hood = Neighborhood::new(problem, &self.neighborhood);
        let termination = OrTermination((
            StepCountTermination::new(self.config.max_iterations),
            ExternalTermination,
        ));
        let mut acceptor = HillClimbingAcceptor::new();

        let mut current = hood.initial_placement(
            scope.rng(),
            self.config.max_initial_antennas,
            self.config.initial_large_bias,
        );
        let mut current_energy = self.energy.evaluate(problem, &current);
        let mut best = BestPlacement::new(problem, current.clone(), current_energy);
        acceptor.phase_started(current_energy);

        info!(
            event = "phase_start",
            strategy = "hill-climbing",
            antennas = current.len(),
            energy = current_energy,
        );

        while !termination.is_terminated(scope) {
            let step = scope.increment_step_count();
            let cost = current.total_cost(problem.catalog());
            let moves = hood.sampled_moves(scope.rng(), &current, cost);
            let chosen = best_candidate(problem, &self.energy, &current, &moves, |_, _| true);

            match chosen {
                Some((candidate, e)) if acceptor.is_accepted(scope.rng(), current_energy, e) => {
                    current = candidate;
                    current_energy = e;
                    if best.update(problem, &current, current_energy) {
                        scope.mark_improved();
                        debug!(event = "new_best", step, antennas = current.len(), energy = e);
                    }
                }
                _ => {
                    info!(event = "local_optimum", step);
                    break;
                }
            }

            if step % 50 == 0 {
                let summary = summarize(problem, &current);
                info!(
                    event = "progress",
                    step,
                    energy = current_energy,
                    users_covered = summary.users_covered,
                );
            }
            acceptor.step_ended();
        }

        info!(
            event = "phase_end",
            strategy = "hill-climbing",
            steps = scope.step_count(),
            antennas = best.placement().len(),
            energy = best.energy(),
            feasible = best.is_feasible(),
        );
        best.into_placement()
    }
}
