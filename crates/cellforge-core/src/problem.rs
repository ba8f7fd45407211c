//! Problem instances.
//!
//! A [`ProblemSpec`] is the raw, serializable request. [`ProblemSpec::build`]
//! validates it into a [`Problem`], which is immutable for the rest of a run
//! and owns every lookup structure the drivers need.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::catalog::{AntennaSpec, Catalog, KindId};
use crate::error::{CellforgeError, Result};
use crate::geometry::{covered_by_offsets, CoverageSets, DiscCache};
use crate::grid::{Grid, Position};

/// Users living in each house unless the instance says otherwise.
pub const DEFAULT_USERS_PER_HOUSE: u32 = 20;

fn default_users_per_house() -> u32 {
    DEFAULT_USERS_PER_HOUSE
}

/// Unvalidated problem description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemSpec {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub houses: Vec<Position>,
    #[serde(default = "default_users_per_house")]
    pub users_per_house: u32,
    #[serde(default = "Catalog::standard")]
    pub catalog: Catalog,
    #[serde(default)]
    pub allowed_types: Option<Vec<String>>,
    #[serde(default)]
    pub budget: Option<u64>,
    #[serde(default)]
    pub max_antennas: Option<usize>,
}

impl ProblemSpec {
    /// An empty instance on a `width` x `height` grid with the standard catalog.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            houses: Vec::new(),
            users_per_house: DEFAULT_USERS_PER_HOUSE,
            catalog: Catalog::standard(),
            allowed_types: None,
            budget: None,
            max_antennas: None,
        }
    }

    pub fn with_houses(mut self, houses: impl IntoIterator<Item = impl Into<Position>>) -> Self {
        self.houses = houses.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_users_per_house(mut self, users: u32) -> Self {
        self.users_per_house = users;
        self
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_allowed_types<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.allowed_types = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_budget(mut self, budget: u64) -> Self {
        self.budget = Some(budget);
        self
    }

    pub fn with_max_antennas(mut self, max: usize) -> Self {
        self.max_antennas = Some(max);
        self
    }

    /// Validates the instance.
    ///
    /// # Errors
    ///
    /// Fails on an empty grid, a house outside the grid, an unknown allowed
    /// type, or an empty catalog after filtering.
    pub fn build(self) -> Result<Problem> {
        Problem::new(self)
    }
}

/// A validated problem instance.
#[derive(Debug, Clone)]
pub struct Problem {
    grid: Grid,
    houses: Vec<Position>,
    house_set: HashSet<Position>,
    house_index: HashMap<Position, usize>,
    users_per_house: u32,
    catalog: Catalog,
    budget: Option<u64>,
    max_antennas: Option<usize>,
    discs: DiscCache,
}

impl Problem {
    fn new(spec: ProblemSpec) -> Result<Self> {
        let grid = Grid::new(spec.width, spec.height)?;

        for h in &spec.houses {
            if !grid.contains(*h) {
                return Err(CellforgeError::DemandOutOfBounds {
                    x: h.x,
                    y: h.y,
                    width: spec.width,
                    height: spec.height,
                });
            }
        }

        let catalog = spec.catalog.filter(spec.allowed_types.as_deref())?;

        // Duplicate coordinates collapse into one house.
        let mut houses = spec.houses;
        houses.sort_unstable();
        houses.dedup();

        let house_index = houses.iter().enumerate().map(|(i, &p)| (p, i)).collect();
        let house_set = houses.iter().copied().collect();
        let discs = DiscCache::new(catalog.iter().map(|(_, s)| s.radius));

        Ok(Self {
            grid,
            houses,
            house_set,
            house_index,
            users_per_house: spec.users_per_house,
            catalog,
            budget: spec.budget,
            max_antennas: spec.max_antennas,
            discs,
        })
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Houses, sorted and deduplicated. A house id is its index here.
    #[inline]
    pub fn houses(&self) -> &[Position] {
        &self.houses
    }

    #[inline]
    pub fn house_count(&self) -> usize {
        self.houses.len()
    }

    pub fn house_set(&self) -> &HashSet<Position> {
        &self.house_set
    }

    #[inline]
    pub fn users_per_house(&self) -> u32 {
        self.users_per_house
    }

    pub fn total_users(&self) -> u64 {
        self.houses.len() as u64 * self.users_per_house as u64
    }

    #[inline]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[inline]
    pub fn spec(&self, kind: KindId) -> &AntennaSpec {
        self.catalog.get(kind)
    }

    #[inline]
    pub fn budget(&self) -> Option<u64> {
        self.budget
    }

    #[inline]
    pub fn max_antennas(&self) -> Option<usize> {
        self.max_antennas
    }

    #[inline]
    pub fn is_house(&self, pos: Position) -> bool {
        self.house_set.contains(&pos)
    }

    pub fn house_id(&self, pos: Position) -> Option<usize> {
        self.house_index.get(&pos).copied()
    }

    /// Returns true if an antenna may stand at `pos`: on the grid, not on a house.
    #[inline]
    pub fn is_valid_site(&self, pos: Position) -> bool {
        self.grid.contains(pos) && !self.is_house(pos)
    }

    pub fn within_budget(&self, cost: u64) -> bool {
        self.budget.map_or(true, |b| cost <= b)
    }

    /// Returns true if a placement of `count` antennas respects the cap.
    pub fn count_allowed(&self, count: usize) -> bool {
        self.max_antennas.map_or(true, |m| count <= m)
    }

    /// Disc offsets for an antenna kind.
    pub fn disc(&self, kind: KindId) -> &[(i32, i32)] {
        let radius = self.catalog.get(kind).radius;
        // Every catalog radius is cached at construction.
        self.discs.get(radius).unwrap_or(&[])
    }

    /// Full coverage of an antenna of `kind` at `pos`.
    pub fn coverage(&self, pos: Position, kind: KindId) -> CoverageSets {
        covered_by_offsets(pos, self.disc(kind), &self.house_set, &self.grid)
    }

    /// In-grid cells covered by an antenna of `kind` at `pos`.
    pub fn cells_within(&self, pos: Position, kind: KindId) -> impl Iterator<Item = Position> + '_ {
        let grid = self.grid;
        self.disc(kind)
            .iter()
            .map(move |&(dx, dy)| pos.offset(dx, dy))
            .filter(move |c| grid.contains(*c))
    }

    /// Ids of houses covered by an antenna of `kind` at `pos`, ascending.
    ///
    /// Scans whichever is smaller, the disc or the house list.
    pub fn houses_within(&self, pos: Position, kind: KindId) -> Vec<usize> {
        let disc = self.disc(kind);
        let mut ids: Vec<usize> = if disc.len() <= self.houses.len() {
            disc.iter()
                .filter_map(|&(dx, dy)| self.house_id(pos.offset(dx, dy)))
                .collect()
        } else {
            let r2 = radius_squared(self.catalog.get(kind).radius);
            self.houses
                .iter()
                .enumerate()
                .filter(|(_, h)| h.distance_squared(pos) <= r2)
                .map(|(i, _)| i)
                .collect()
        };
        ids.sort_unstable();
        ids
    }

    /// Returns true if an antenna of `kind` at `pos` reaches at least one house.
    pub fn covers_any_house(&self, pos: Position, kind: KindId) -> bool {
        let disc = self.disc(kind);
        if disc.len() <= self.houses.len() {
            disc.iter()
                .any(|&(dx, dy)| self.is_house(pos.offset(dx, dy)))
        } else {
            let r2 = radius_squared(self.catalog.get(kind).radius);
            self.houses.iter().any(|h| h.distance_squared(pos) <= r2)
        }
    }
}

impl TryFrom<ProblemSpec> for Problem {
    type Error = CellforgeError;

    fn try_from(spec: ProblemSpec) -> Result<Self> {
        Problem::new(spec)
    }
}

#[inline]
fn radius_squared(radius: u32) -> i64 {
    let r = radius as i64;
    r * r
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_out_of_bounds_house() {
        let err = ProblemSpec::new(10, 10)
            .with_houses([(10, 3)])
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            CellforgeError::DemandOutOfBounds {
                x: 10,
                y: 3,
                width: 10,
                height: 10
            }
        );
    }

    #[test]
    fn test_rejects_empty_filtered_catalog() {
        let err = ProblemSpec::new(10, 10)
            .with_allowed_types(Vec::<String>::new())
            .build()
            .unwrap_err();
        assert_eq!(err, CellforgeError::EmptyCatalog);
    }

    #[test]
    fn test_dedups_houses() {
        let problem = ProblemSpec::new(10, 10)
            .with_houses([(1, 1), (1, 1), (2, 2)])
            .build()
            .unwrap();
        assert_eq!(problem.house_count(), 2);
        assert_eq!(problem.total_users(), 40);
    }

    #[test]
    fn test_houses_within_both_scan_paths_agree() {
        // Few houses: house scan. Many houses: disc scan.
        let sparse = ProblemSpec::new(50, 50)
            .with_houses([(10, 10), (12, 10), (30, 30)])
            .build()
            .unwrap();
        let pico = sparse.catalog().find("Pico").unwrap();
        assert_eq!(sparse.houses_within(Position::new(11, 11), pico), vec![0, 1]);

        let dense_houses: Vec<(i32, i32)> = (0..20).flat_map(|x| (0..20).map(move |y| (x, y))).collect();
        let dense = ProblemSpec::new(20, 20)
            .with_houses(dense_houses)
            .build()
            .unwrap();
        let femto = dense.catalog().find("Femto").unwrap();
        let ids = dense.houses_within(Position::new(0, 0), femto);
        assert_eq!(ids.len(), 3);
        let expected: Vec<usize> = [(0, 0), (0, 1), (1, 0)]
            .into_iter()
            .filter_map(|p| dense.house_id(Position::from(p)))
            .collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_site_validity() {
        let problem = ProblemSpec::new(5, 5)
            .with_houses([(2, 2)])
            .build()
            .unwrap();
        assert!(!problem.is_valid_site(Position::new(2, 2)));
        assert!(!problem.is_valid_site(Position::new(5, 0)));
        assert!(problem.is_valid_site(Position::new(2, 1)));
        assert!(problem.covers_any_house(Position::new(2, 1), 0));
        assert!(!problem.covers_any_house(Position::new(0, 0), 0));
    }

    #[test]
    fn test_constraint_helpers() {
        let problem = ProblemSpec::new(5, 5)
            .with_budget(10_000)
            .with_max_antennas(2)
            .build()
            .unwrap();
        assert!(problem.within_budget(10_000));
        assert!(!problem.within_budget(10_001));
        assert!(problem.count_allowed(2));
        assert!(!problem.count_allowed(3));
    }

    #[test]
    fn test_spec_deserializes_with_defaults() {
        let spec: ProblemSpec =
            serde_json::from_str(r#"{"width": 8, "height": 4, "houses": [{"x": 1, "y": 2}]}"#).unwrap();
        assert_eq!(spec.users_per_house, DEFAULT_USERS_PER_HOUSE);
        assert_eq!(spec.catalog, Catalog::standard());
        let problem = spec.build().unwrap();
        assert_eq!(problem.house_count(), 1);
    }
}
