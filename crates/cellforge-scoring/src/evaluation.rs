//! Full-placement coverage evaluation.
//!
//! Everything here recomputes from scratch. The greedy candidate index keeps
//! its own incremental state and only uses these functions for verification.

use cellforge_core::{PlacedAntenna, Placement, Problem};

/// House-level coverage of a placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoverageSummary {
    pub antenna_count: usize,
    pub houses_covered: usize,
    pub users_covered: u64,
    pub total_cost: u64,
}

impl CoverageSummary {
    pub fn uncovered_users(&self, problem: &Problem) -> u64 {
        problem.total_users().saturating_sub(self.users_covered)
    }

    pub fn covers_all(&self, problem: &Problem) -> bool {
        self.houses_covered == problem.house_count()
    }
}

/// Per-house covered flags, indexed by house id.
pub fn covered_houses(problem: &Problem, placement: &Placement) -> Vec<bool> {
    let mut covered = vec![false; problem.house_count()];
    for antenna in placement {
        for id in problem.houses_within(antenna.position, antenna.kind) {
            covered[id] = true;
        }
    }
    covered
}

/// Counts covered houses, users and cost. Houses reached twice count once.
pub fn summarize(problem: &Problem, placement: &Placement) -> CoverageSummary {
    let houses_covered = covered_houses(problem, placement)
        .into_iter()
        .filter(|&c| c)
        .count();
    CoverageSummary {
        antenna_count: placement.len(),
        houses_covered,
        users_covered: houses_covered as u64 * problem.users_per_house() as u64,
        total_cost: placement.total_cost(problem.catalog()),
    }
}

/// Number of distinct grid cells, houses included, inside some antenna's disc.
pub fn covered_area(problem: &Problem, placement: &Placement) -> usize {
    let grid = problem.grid();
    let mut seen = vec![false; grid.area()];
    let mut count = 0;
    for antenna in placement {
        for cell in problem.cells_within(antenna.position, antenna.kind) {
            let idx = grid.index_of(cell);
            if !seen[idx] {
                seen[idx] = true;
                count += 1;
            }
        }
    }
    count
}

/// Returns true if the antenna reaches at least one house.
#[inline]
pub fn is_useful(problem: &Problem, antenna: &PlacedAntenna) -> bool {
    problem.covers_any_house(antenna.position, antenna.kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellforge_core::{Position, ProblemSpec};

    #[test]
    fn test_double_coverage_counts_once() {
        let problem = ProblemSpec::new(10, 10)
            .with_houses([(5, 5)])
            .build()
            .unwrap();
        let femto = problem.catalog().find("Femto").unwrap();
        let placement = Placement::from_antennas(vec![
            PlacedAntenna::new(Position::new(5, 4), femto),
            PlacedAntenna::new(Position::new(5, 6), femto),
        ]);
        let summary = summarize(&problem, &placement);
        assert_eq!(summary.houses_covered, 1);
        assert_eq!(summary.users_covered, 20);
        assert_eq!(summary.total_cost, 2_000);
        assert!(summary.covers_all(&problem));
    }

    #[test]
    fn test_covered_area_unions_discs() {
        let problem = ProblemSpec::new(10, 10).build().unwrap();
        let femto = problem.catalog().find("Femto").unwrap();
        let placement = Placement::from_antennas(vec![
            PlacedAntenna::new(Position::new(4, 4), femto),
            PlacedAntenna::new(Position::new(5, 4), femto),
        ]);
        // Two plus-shaped discs sharing two cells.
        assert_eq!(covered_area(&problem, &placement), 8);
    }
}
