//! Variable neighborhood search.

use cellforge_config::{NeighborhoodConfig, ObjectiveConfig, StrategyKind, VnsConfig};
use cellforge_core::{Placement, Problem};
use cellforge_scoring::Energy;
use tracing::{debug, info, trace};

use super::best::BestPlacement;
use super::SearchStrategy;
use crate::heuristic::{Neighborhood, PlacementMove};
use crate::scope::RunScope;
use crate::termination::{ExternalTermination, OrTermination, StepCountTermination, Termination};

/// Shakes the incumbent with `k` random perturbations, polishes the result
/// and keeps it if it improved.
///
/// `k` returns to 1 after an improvement and otherwise grows by one,
/// wrapping back to 1 past `k_max`.
#[derive(Debug, Clone)]
pub struct Vns {
    config: VnsConfig,
    energy: Energy,
    neighborhood: NeighborhoodConfig,
}

impl Vns {
    pub fn new(
        config: VnsConfig,
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

    /// First-improvement descent over retypes, then removals.
    pub(super) fn polish(
        &self,
        problem: &Problem,
        mut placement: Placement,
        mut energy: f64,
    ) -> (Placement, f64) {
        let catalog = problem.catalog();
        for _ in 0..self.config.local_search_iterations {
            let retypes = placement.iter().enumerate().flat_map(|(index, antenna)| {
                catalog
                    .kinds()
                    .filter(move |&k| k != antenna.kind)
                    .map(move |kind| PlacementMove::Retype { index, kind })
            });
            let removes = (0..placement.len())
                .filter(|_| placement.len() > 1)
                .map(PlacementMove::Remove);

            let improved = retypes.chain(removes).find_map(|mv| {
                let candidate = mv.apply(&placement);
                let e = self.energy.evaluate(problem, &candidate);
                (e < energy).then_some((candidate, e))
            });
            match improved {
                Some((candidate, e)) => {
                    placement = candidate;
                    energy = e;
                }
                None => break,
            }
        }
        (placement, energy)
    }
}

impl SearchStrategy for Vns {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Vns
    }

    fn search(&self, scope: &mut RunScope<'_>) -> Placement {
        let problem = scope.problem();
        let hood = Neighborhood::new(problem, &self.neighborhood);
        let termination = OrTermination((
            StepCountTermination::new(self.config.max_iterations),
            ExternalTermination,
        ));
        let k_max = self.config.k_max.max(1);

        let initial = hood.initial_placement(
            scope.rng(),
            self.config.max_initial_antennas,
            self.config.initial_large_bias,
        );
        let initial_energy = self.energy.evaluate(problem, &initial);
        let mut best = BestPlacement::new(problem, initial.clone(), initial_energy);
        let (polished, polished_energy) = self.polish(problem, initial, initial_energy);
        best.update(problem, &polished, polished_energy);

        info!(
            event = "phase_start",
            strategy = "vns",
            antennas = best.placement().len(),
            energy = best.energy(),
            k_max,
        );

        let mut k = 1;
        while !termination.is_terminated(scope) {
            let step = scope.increment_step_count();
            let shaken = hood.shake(scope.rng(), best.placement(), k);
            let shaken_energy = self.energy.evaluate(problem, &shaken);
            let (candidate, e) = self.polish(problem, shaken, shaken_energy);
            trace!(event = "step", step, k, energy = e);

            let improved = best.update(problem, &candidate, e);
            if improved {
                scope.mark_improved();
                debug!(event = "new_best", step, antennas = candidate.len(), energy = e);
            }
            k = next_k(k, k_max, improved);

            if step % 10 == 0 {
                info!(event = "progress", step, k, best_energy = best.energy());
            }
        }

        info!(
            event = "phase_end",
            strategy = "vns",
            steps = scope.step_count(),
            antennas = best.placement().len(),
            energy = best.energy(),
        );
        best.into_placement()
    }
}

/// Neighborhood size for the next shake: back to 1 after an improvement,
/// otherwise one larger, wrapping to 1 past `k_max`.
pub(super) fn next_k(k: usize, k_max: usize, improved: bool) -> usize {
    if improved || k >= k_max {
        1
    } else {
        k + 1
    }
}
