//! Placed antennas and candidate placements.

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, KindId};
use crate::grid::Position;

/// An antenna of a given kind at a grid position.
///
/// This is a plain value; drivers copy it freely when deriving candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlacedAntenna {
    pub position: Position,
    pub kind: KindId,
}

impl PlacedAntenna {
    #[inline]
    pub const fn new(position: Position, kind: KindId) -> Self {
        Self { position, kind }
    }

    #[inline]
    pub fn with_kind(self, kind: KindId) -> Self {
        Self { kind, ..self }
    }

    #[inline]
    pub fn with_position(self, position: Position) -> Self {
        Self { position, ..self }
    }
}

/// Order-independent identity of a placement.
pub type PlacementKey = Vec<(i32, i32, KindId)>;

/// An ordered list of placed antennas.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Placement {
    antennas: Vec<PlacedAntenna>,
}

impl Placement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_antennas(antennas: Vec<PlacedAntenna>) -> Self {
        Self { antennas }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.antennas.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.antennas.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[PlacedAntenna] {
        &self.antennas
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlacedAntenna> {
        self.antennas.iter()
    }

    #[inline]
    pub fn get(&self, index: usize) -> PlacedAntenna {
        self.antennas[index]
    }

    pub fn push(&mut self, antenna: PlacedAntenna) {
        debug_assert!(
            !self.is_occupied(antenna.position),
            "duplicate antenna at {}",
            antenna.position
        );
        self.antennas.push(antenna);
    }

    pub fn remove(&mut self, index: usize) -> PlacedAntenna {
        self.antennas.remove(index)
    }

    pub fn set(&mut self, index: usize, antenna: PlacedAntenna) {
        self.antennas[index] = antenna;
    }

    pub fn truncate(&mut self, len: usize) {
        self.antennas.truncate(len);
    }

    pub fn retain(&mut self, f: impl FnMut(&PlacedAntenna) -> bool) {
        self.antennas.retain(f);
    }

    pub fn into_inner(self) -> Vec<PlacedAntenna> {
        self.antennas
    }

    /// Returns true if some antenna already sits at `pos`.
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.antennas.iter().any(|a| a.position == pos)
    }

    /// Same as [`is_occupied`](Self::is_occupied) but ignoring one index.
    pub fn is_occupied_except(&self, pos: Position, skip: usize) -> bool {
        self.antennas
            .iter()
            .enumerate()
            .any(|(i, a)| i != skip && a.position == pos)
    }

    pub fn total_cost(&self, catalog: &Catalog) -> u64 {
        self.antennas.iter().map(|a| catalog.get(a.kind).cost).sum()
    }

    /// Sum of bounded capacities. Unbounded antennas contribute nothing.
    pub fn total_capacity(&self, catalog: &Catalog) -> u64 {
        self.antennas
            .iter()
            .filter_map(|a| catalog.get(a.kind).capacity)
            .map(u64::from)
            .sum()
    }

    /// Sorted (x, y, kind) triples; equal for placements that differ only in order.
    pub fn key(&self) -> PlacementKey {
        let mut key: PlacementKey = self
            .antennas
            .iter()
            .map(|a| (a.position.x, a.position.y, a.kind))
            .collect();
        key.sort_unstable();
        key
    }

    /// Returns true if no two antennas share a position.
    pub fn has_unique_positions(&self) -> bool {
        let mut positions: Vec<Position> = self.antennas.iter().map(|a| a.position).collect();
        positions.sort_unstable();
        positions.windows(2).all(|w| w[0] != w[1])
    }
}

impl FromIterator<PlacedAntenna> for Placement {
    fn from_iter<I: IntoIterator<Item = PlacedAntenna>>(iter: I) -> Self {
        Self {
            antennas: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Placement {
    type Item = &'a PlacedAntenna;
    type IntoIter = std::slice::Iter<'a, PlacedAntenna>;

    fn into_iter(self) -> Self::IntoIter {
        self.antennas.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn antenna(x: i32, y: i32, kind: KindId) -> PlacedAntenna {
        PlacedAntenna::new(Position::new(x, y), kind)
    }

    #[test]
    fn test_key_ignores_order() {
        let a: Placement = vec![antenna(1, 2, 0), antenna(3, 4, 1)].into_iter().collect();
        let b: Placement = vec![antenna(3, 4, 1), antenna(1, 2, 0)].into_iter().collect();
        assert_ne!(a, b);
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_cost_and_capacity() {
        let catalog = Catalog::standard();
        let p: Placement = vec![antenna(0, 0, 0), antenna(1, 0, 3)].into_iter().collect();
        assert_eq!(p.total_cost(&catalog), 26_000);
        assert_eq!(p.total_capacity(&catalog), 2_020);
    }

    #[test]
    fn test_unique_positions() {
        let p = Placement::from_antennas(vec![antenna(0, 0, 0), antenna(0, 0, 1)]);
        assert!(!p.has_unique_positions());
        assert!(p.is_occupied_except(Position::new(0, 0), 0));
        let q = Placement::from_antennas(vec![antenna(0, 0, 0), antenna(0, 1, 1)]);
        assert!(q.has_unique_positions());
        assert!(!q.is_occupied_except(Position::new(0, 0), 0));
    }
}
