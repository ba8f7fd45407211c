//! Energy (minimize) and fitness (maximize) objectives.
//!
//! Both are pure functions of the problem and the placement. They differ in
//! how constraints are handled: energy penalizes a budget overrun smoothly so
//! local search can walk through infeasible space, while fitness rejects any
//! violation outright with negative infinity.

use cellforge_config::ObjectiveConfig;
use cellforge_core::{Placement, Problem};

use crate::evaluation::{summarize, CoverageSummary};

/// Energy objective used by hill climbing, annealing, tabu search and VNS.
///
/// `uncovered_users * penalty + cost / cost_divisor`, plus
/// `overrun_penalty * (cost - budget) / budget` over budget. A placement above
/// the antenna cap has infinite energy, and so does an empty placement while
/// there are houses to cover.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Energy {
    pub uncovered_user_penalty: f64,
    pub cost_divisor: f64,
    pub budget_overrun_penalty: f64,
}

impl Energy {
    pub fn new(objective: &ObjectiveConfig, cost_divisor: f64) -> Self {
        Self {
            uncovered_user_penalty: objective.uncovered_user_penalty,
            cost_divisor,
            budget_overrun_penalty: objective.budget_overrun_penalty,
        }
    }

    pub fn evaluate(&self, problem: &Problem, placement: &Placement) -> f64 {
        if !problem.count_allowed(placement.len()) {
            return f64::INFINITY;
        }
        self.of_summary(problem, &summarize(problem, placement))
    }

    /// Energy from an already computed summary.
    pub fn of_summary(&self, problem: &Problem, summary: &CoverageSummary) -> f64 {
        if !problem.count_allowed(summary.antenna_count) {
            return f64::INFINITY;
        }
        // Empty ranks below every non-empty placement.
        if summary.antenna_count == 0 && problem.house_count() > 0 {
            return f64::INFINITY;
        }
        let uncovered = summary.uncovered_users(problem) as f64;
        let cost = summary.total_cost as f64;
        let mut energy = uncovered * self.uncovered_user_penalty + cost / self.cost_divisor;
        if let Some(budget) = problem.budget() {
            if summary.total_cost > budget {
                let overrun = (summary.total_cost - budget) as f64;
                energy += self.budget_overrun_penalty * overrun / budget.max(1) as f64;
            }
        }
        energy
    }
}

impl Default for Energy {
    fn default() -> Self {
        Self::new(&ObjectiveConfig::default(), 1000.0)
    }
}

/// Fitness objective used by the genetic strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fitness {
    pub coverage_weight: f64,
    pub cost_weight: f64,
    pub full_coverage_bonus: f64,
}

impl Fitness {
    pub fn new(objective: &ObjectiveConfig) -> Self {
        Self {
            coverage_weight: objective.coverage_weight,
            cost_weight: objective.cost_weight,
            full_coverage_bonus: objective.full_coverage_bonus,
        }
    }

    /// `coverage_weight * ratio - cost_weight * normalized_cost [+ bonus]`.
    ///
    /// Empty placements and any budget or count violation score negative infinity.
    pub fn evaluate(&self, problem: &Problem, placement: &Placement) -> f64 {
        if placement.is_empty() || !problem.count_allowed(placement.len()) {
            return f64::NEG_INFINITY;
        }
        let summary = summarize(problem, placement);
        if !problem.within_budget(summary.total_cost) {
            return f64::NEG_INFINITY;
        }

        let coverage_ratio = if problem.house_count() > 0 {
            summary.houses_covered as f64 / problem.house_count() as f64
        } else {
            0.0
        };
        let max_possible = placement.len() as f64 * problem.catalog().max_cost() as f64;
        let normalized_cost = if max_possible > 0.0 {
            summary.total_cost as f64 / max_possible
        } else {
            0.0
        };

        let mut fitness = self.coverage_weight * coverage_ratio - self.cost_weight * normalized_cost;
        if coverage_ratio >= 1.0 {
            fitness += self.full_coverage_bonus;
        }
        fitness
    }
}

impl Default for Fitness {
    fn default() -> Self {
        Self::new(&ObjectiveConfig::default())
    }
}
