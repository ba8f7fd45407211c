//! Greedy priority search.

use cellforge_config::{GreedyConfig, StrategyKind};
use cellforge_core::Placement;
use cellforge_scoring::{CandidateScorer, GreedyScorer};
use tracing::{debug, info, trace, warn};

use super::SearchStrategy;
use crate::heuristic::{CandidateIndex, GreedyStep};
use crate::scope::RunScope;

/// Repeatedly places the best-scoring candidate until no candidate scores
/// above zero, the antenna cap is hit or the target coverage is reached.
///
/// Candidates over the remaining budget are skipped, so the result never
/// exceeds the budget.
#[derive(Debug, Clone, Default)]
pub struct Greedy {
    config: GreedyConfig,
}

impl Greedy {
    pub fn new(config: GreedyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GreedyConfig {
        &self.config
    }

    /// Runs the search and also returns every accepted step, in order.
    pub fn search_with_steps(&self, scope: &mut RunScope<'_>) -> (Placement, Vec<GreedyStep>) {
        let problem = scope.problem();
        let scorer = GreedyScorer::from(&self.config);
        let mut index = CandidateIndex::new(problem, scorer, self.config.use_candidate_index);
        let total_users = problem.total_users() as f64;
        let step_cap = problem.grid().area();

        info!(
            event = "phase_start",
            strategy = "greedy",
            scoring = scorer.name(),
            candidates = index.candidate_count(),
            lazy = self.config.use_candidate_index,
        );

        let mut placement = Placement::new();
        let mut steps = Vec::new();
        loop {
            if scope.is_terminate_early() {
                break;
            }
            if !problem.count_allowed(placement.len() + 1) {
                debug!(event = "antenna_cap_reached", antennas = placement.len());
                break;
            }
            if index.users_covered() as f64 * 100.0 >= self.config.target_coverage * total_users {
                debug!(event = "target_reached", users_covered = index.users_covered());
                break;
            }
            if placement.len() >= step_cap {
                break;
            }

            let Some(step) = index.next_best() else {
                if (index.users_covered() as f64) < total_users {
                    warn!(
                        event = "no_candidate",
                        antennas = placement.len(),
                        users_covered = index.users_covered(),
                        "could not place more antennas"
                    );
                }
                break;
            };

            index.accept(&step);
            placement.push(step.antenna);
            let step_no = scope.increment_step_count();
            trace!(
                event = "step",
                step = step_no,
                x = step.antenna.position.x,
                y = step.antenna.position.y,
                kind = %problem.spec(step.antenna.kind).name,
                score = step.score,
                users_covered = index.users_covered(),
            );
            steps.push(step);
        }

        info!(
            event = "phase_end",
            strategy = "greedy",
            antennas = placement.len(),
            users_covered = index.users_covered(),
            total_cost = index.total_cost(),
            recomputations = index.recomputations(),
        );
        (placement, steps)
    }
}

impl SearchStrategy for Greedy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Greedy
    }

    fn search(&self, scope: &mut RunScope<'_>) -> Placement {
        self.search_with_steps(scope).0
    }
}
