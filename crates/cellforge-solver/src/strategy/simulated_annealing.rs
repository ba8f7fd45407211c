//! Simulated annealing.

use cellforge_config::{
    NeighborhoodConfig, ObjectiveConfig, SimulatedAnnealingConfig, StrategyKind,
};
use cellforge_core::Placement;
use cellforge_scoring::Energy;
use tracing::{debug, info};

use super::best::BestPlacement;
use super::SearchStrategy;
use crate::acceptor::{Acceptor, SimulatedAnnealingAcceptor};
use crate::event::{ProgressEvent, SolveEvent};
use crate::heuristic::Neighborhood;
use crate::scope::RunScope;
use crate::termination::{ExternalTermination, Termination, UnimprovedStepCountTermination};

/// Annealing over weighted random moves with geometric cooling.
///
/// Runs `iterations_per_temperature` moves per temperature step until the
/// temperature reaches its floor, or until `early_stopping_iterations`
/// moves pass without a new best. When the scope has an event listener, a
/// [`ProgressEvent`] describing the best placement is emitted after every
/// temperature step.
#[derive(Debug, Clone)]
pub struct SimulatedAnnealing {
    config: SimulatedAnnealingConfig,
    energy: Energy,
    neighborhood: NeighborhoodConfig,
}

impl SimulatedAnnealing {
    pub fn new(
        config: SimulatedAnnealingConfig,
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

impl SearchStrategy for SimulatedAnnealing {
    fn kind(&self) -> StrategyKind {
        StrategyKind::SimulatedAnnealing
    }

    fn search(&self, scope: &mut RunScope<'_>) -> Placement {
        let problem = scope.problem();
        let catalog = problem.catalog();
        let config = &self.config;
        let hood = Neighborhood::new(problem, &self.neighborhood);
        let early_stop = config
            .early_stopping_iterations
            .map(UnimprovedStepCountTermination::new);
        let mut acceptor = SimulatedAnnealingAcceptor::new(
            config.initial_temperature,
            config.cooling_rate,
            config.min_temperature,
        );
        let total_steps = config.temperature_steps().max(1);

        let mut current = hood.initial_placement(
            scope.rng(),
            config.max_initial_antennas,
            config.initial_large_bias,
        );
        let mut current_energy = self.energy.evaluate(problem, &current);
        let mut best = BestPlacement::new(problem, current.clone(), current_energy);
        acceptor.phase_started(current_energy);

        info!(
            event = "phase_start",
            strategy = "simulated-annealing",
            antennas = current.len(),
            energy = current_energy,
            temperature = acceptor.temperature(),
        );

        let mut temperature_step: u64 = 0;
        while !acceptor.is_frozen() && temperature_step < total_steps {
            if ExternalTermination.is_terminated(scope) {
                break;
            }

            for _ in 0..config.iterations_per_temperature {
                let iteration = scope.increment_step_count();
                let candidate = if current.is_empty() {
                    Some(hood.initial_placement(scope.rng(), 1, config.initial_large_bias))
                } else {
                    let cost = current.total_cost(catalog);
                    hood.random_move(scope.rng(), &current, cost)
                        .map(|mv| mv.apply(&current))
                };

                let Some(candidate) = candidate else {
                    acceptor.is_accepted(scope.rng(), current_energy, current_energy);
                    continue;
                };
                let e = self.energy.evaluate(problem, &candidate);
                if !acceptor.is_accepted(scope.rng(), current_energy, e) {
                    continue;
                }
                current = candidate;
                current_energy = e;
                if best.update(problem, &current, current_energy) {
                    scope.mark_improved();
                    debug!(
                        event = "new_best",
                        iteration,
                        antennas = current.len(),
                        energy = current_energy,
                        feasible = best.is_feasible(),
                    );
                }
            }
            temperature_step += 1;

            if scope.has_event_listener() {
                scope.emit(SolveEvent::Progress(ProgressEvent {
                    iteration: scope.step_count(),
                    temperature: acceptor.temperature(),
                    current_energy,
                    best_energy: best.energy(),
                    progress_percent: (temperature_step as f64 / total_steps as f64 * 100.0)
                        .min(100.0),
                    acceptance_rate: acceptor.acceptance_rate(),
                    ..ProgressEvent::for_best(problem, best.placement())
                }));
            }

            if early_stop.is_terminated(scope) {
                info!(
                    event = "early_stop",
                    iterations_since_improvement = scope.unimproved_step_count(),
                );
                break;
            }

            acceptor.step_ended();

            if scope.step_count() % 500 == 0 {
                info!(
                    event = "progress",
                    iteration = scope.step_count(),
                    temperature = acceptor.temperature(),
                    acceptance_rate = acceptor.acceptance_rate(),
                    best_energy = best.energy(),
                );
            }
        }

        info!(
            event = "phase_end",
            strategy = "simulated-annealing",
            iterations = scope.step_count(),
            temperature_steps = temperature_step,
            acceptance_rate = acceptor.acceptance_rate(),
            antennas = best.placement().len(),
            energy = best.energy(),
        );
        best.into_placement()
    }
}
