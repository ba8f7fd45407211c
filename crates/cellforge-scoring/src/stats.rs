//! Summary statistics reported for a final placement.

use cellforge_core::{Catalog, PlacedAntenna, Placement, Problem};
use serde::{Deserialize, Serialize};

use crate::capacity::assign_users;
use crate::evaluation::{covered_area, summarize};

/// One placed antenna, expanded with its type's parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AntennaPlacement {
    pub x: i32,
    pub y: i32,
    #[serde(rename = "type")]
    pub kind: String,
    pub radius: u32,
    pub cost: u64,
    pub capacity: Option<u32>,
}

impl AntennaPlacement {
    pub fn describe(catalog: &Catalog, antenna: &PlacedAntenna) -> Self {
        let spec = catalog.get(antenna.kind);
        Self {
            x: antenna.position.x,
            y: antenna.position.y,
            kind: spec.name.clone(),
            radius: spec.radius,
            cost: spec.cost,
            capacity: spec.capacity,
        }
    }

    /// Expands every antenna of a placement.
    pub fn describe_all(catalog: &Catalog, placement: &Placement) -> Vec<Self> {
        placement.iter().map(|a| Self::describe(catalog, a)).collect()
    }
}

/// Which instance constraints the placement satisfies.
///
/// A field is `None` when the instance does not set that constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConstraintReport {
    pub budget_satisfied: Option<bool>,
    pub max_antennas_satisfied: Option<bool>,
}

impl ConstraintReport {
    pub fn check(problem: &Problem, placement: &Placement) -> Self {
        Self {
            budget_satisfied: problem
                .budget()
                .map(|b| placement.total_cost(problem.catalog()) <= b),
            max_antennas_satisfied: problem.max_antennas().map(|m| placement.len() <= m),
        }
    }

    /// Returns true if no set constraint is violated.
    pub fn is_satisfied(&self) -> bool {
        self.budget_satisfied.unwrap_or(true) && self.max_antennas_satisfied.unwrap_or(true)
    }
}

/// Statistics of a placement against its problem.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlacementStats {
    pub antennas: Vec<AntennaPlacement>,
    /// Percentage of grid cells, houses included, inside some antenna's disc.
    pub coverage_percentage: f64,
    pub users_covered: u64,
    pub total_users: u64,
    pub user_coverage_percentage: f64,
    pub total_cost: u64,
    /// Sum of bounded antenna capacities.
    pub total_capacity: u64,
    /// Users assigned under capacity limits.
    pub users_served: u64,
    /// `users_served / total_capacity`, as a percentage.
    pub capacity_utilization: f64,
    pub constraints: ConstraintReport,
}

impl PlacementStats {
    pub fn compute(problem: &Problem, placement: &Placement) -> Self {
        let catalog = problem.catalog();
        let summary = summarize(problem, placement);
        let area = problem.grid().area();
        let total_users = problem.total_users();
        let total_capacity = placement.total_capacity(catalog);
        let users_served = assign_users(problem, placement).users_served;

        Self {
            antennas: AntennaPlacement::describe_all(catalog, placement),
            coverage_percentage: percent(covered_area(problem, placement) as u64, area as u64),
            users_covered: summary.users_covered,
            total_users,
            user_coverage_percentage: percent(summary.users_covered, total_users),
            total_cost: summary.total_cost,
            total_capacity,
            users_served,
            capacity_utilization: percent(users_served, total_capacity).min(100.0),
            constraints: ConstraintReport::check(problem, placement),
        }
    }
}

fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellforge_core::{PlacedAntenna, Position, ProblemSpec};

    #[test]
    fn test_single_femto_stats() {
        let problem = ProblemSpec::new(10, 10)
            .with_houses([(5, 5)])
            .with_budget(5_000)
            .build()
            .unwrap();
        let femto = problem.catalog().find("Femto").unwrap();
        let placement = Placement::from_antennas(vec![PlacedAntenna::new(Position::new(5, 4), femto)]);
        let stats = PlacementStats::compute(&problem, &placement);

        assert_eq!(stats.antennas.len(), 1);
        assert_eq!(stats.antennas[0].kind, "Femto");
        assert_eq!(stats.coverage_percentage, 5.0);
        assert_eq!(stats.users_covered, 20);
        assert_eq!(stats.user_coverage_percentage, 100.0);
        assert_eq!(stats.total_cost, 1_000);
        assert_eq!(stats.total_capacity, 20);
        assert_eq!(stats.users_served, 20);
        assert_eq!(stats.capacity_utilization, 100.0);
        assert_eq!(stats.constraints.budget_satisfied, Some(true));
        assert_eq!(stats.constraints.max_antennas_satisfied, None);
        assert!(stats.constraints.is_satisfied());
    }

    #[test]
    fn test_empty_placement_stats() {
        let problem = ProblemSpec::new(10, 10).build().unwrap();
        let stats = PlacementStats::compute(&problem, &Placement::new());
        assert!(stats.antennas.is_empty());
        assert_eq!(stats.coverage_percentage, 0.0);
        assert_eq!(stats.users_covered, 0);
        assert_eq!(stats.total_users, 0);
        assert_eq!(stats.user_coverage_percentage, 0.0);
        assert_eq!(stats.total_cost, 0);
        assert_eq!(stats.capacity_utilization, 0.0);
    }

    #[test]
    fn test_constraint_violation_reported() {
        let problem = ProblemSpec::new(10, 10)
            .with_houses([(5, 5)])
            .with_max_antennas(1)
            .build()
            .unwrap();
        let placement = Placement::from_antennas(vec![
            PlacedAntenna::new(Position::new(5, 4), 0),
            PlacedAntenna::new(Position::new(5, 6), 0),
        ]);
        let report = ConstraintReport::check(&problem, &placement);
        assert_eq!(report.max_antennas_satisfied, Some(false));
        assert!(!report.is_satisfied());
    }
}
