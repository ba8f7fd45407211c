//! Disc coverage on the grid.
//!
//! A cell at offset `(dx, dy)` from an antenna of radius `r` is covered iff
//! `dx² + dy² ≤ r²` and the cell lies inside the grid. Covered cells are split
//! into house cells and plain cells; the two sets are disjoint.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::grid::{Grid, Position};

/// Offsets of every cell inside the disc of `radius`, row-major.
pub fn disc_offsets(radius: u32) -> Vec<(i32, i32)> {
    let r = radius as i64;
    let r = r.min(i32::MAX as i64 / 2);
    let mut offsets = Vec::new();
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy <= r * r {
                offsets.push((dx as i32, dy as i32));
            }
        }
    }
    offsets
}

/// Cells and houses within reach of a single antenna.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageSets {
    /// Covered cells that are not houses.
    pub cells: BTreeSet<Position>,
    /// Covered house cells.
    pub houses: BTreeSet<Position>,
}

impl CoverageSets {
    /// Total number of covered cells, houses included.
    pub fn area(&self) -> usize {
        self.cells.len() + self.houses.len()
    }
}

/// Computes the coverage of an antenna at `position` with `radius`.
///
/// Pure: the same inputs always yield the same sets.
pub fn coverage(
    position: Position,
    radius: u32,
    houses: &HashSet<Position>,
    grid: &Grid,
) -> CoverageSets {
    covered_by_offsets(position, &disc_offsets(radius), houses, grid)
}

pub(crate) fn covered_by_offsets(
    position: Position,
    offsets: &[(i32, i32)],
    houses: &HashSet<Position>,
    grid: &Grid,
) -> CoverageSets {
    let mut sets = CoverageSets::default();
    for &(dx, dy) in offsets {
        let cell = position.offset(dx, dy);
        if !grid.contains(cell) {
            continue;
        }
        if houses.contains(&cell) {
            sets.houses.insert(cell);
        } else {
            sets.cells.insert(cell);
        }
    }
    sets
}

/// Disc offsets memoized per distinct radius.
#[derive(Debug, Clone, Default)]
pub struct DiscCache {
    discs: HashMap<u32, Vec<(i32, i32)>>,
}

impl DiscCache {
    /// Precomputes offsets for every radius in `radii`.
    pub fn new(radii: impl IntoIterator<Item = u32>) -> Self {
        let mut discs = HashMap::new();
        for r in radii {
            discs.entry(r).or_insert_with(|| disc_offsets(r));
        }
        Self { discs }
    }

    /// Offsets for `radius`, or `None` if that radius was not precomputed.
    pub fn get(&self, radius: u32) -> Option<&[(i32, i32)]> {
        self.discs.get(&radius).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.discs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.discs.is_empty()
    }
}
