//! Placement moves.
//!
//! A move is a small value describing one edit of a placement. Drivers derive
//! candidates by applying a move to a clone of the current placement, so the
//! current placement is never mutated until a candidate is accepted.

use cellforge_core::{KindId, PlacedAntenna, Placement, Position, Problem};

/// One edit of a placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementMove {
    /// Appends an antenna.
    Add(PlacedAntenna),
    /// Removes the antenna at an index.
    Remove(usize),
    /// Moves the antenna at `index` to `to`, keeping its kind.
    Relocate { index: usize, to: Position },
    /// Changes the kind of the antenna at `index`.
    Retype { index: usize, kind: KindId },
}

impl PlacementMove {
    /// Returns true if applying this move keeps the placement well formed.
    ///
    /// Well formed means every antenna on a valid site, unique positions and
    /// the antenna cap respected. Budget is not checked here.
    pub fn is_doable(&self, problem: &Problem, placement: &Placement) -> bool {
        match *self {
            PlacementMove::Add(antenna) => {
                problem.is_valid_site(antenna.position)
                    && !placement.is_occupied(antenna.position)
                    && antenna.kind < problem.catalog().len()
                    && problem.count_allowed(placement.len() + 1)
            }
            PlacementMove::Remove(index) => index < placement.len(),
            PlacementMove::Relocate { index, to } => {
                index < placement.len()
                    && placement.get(index).position != to
                    && problem.is_valid_site(to)
                    && !placement.is_occupied_except(to, index)
            }
            PlacementMove::Retype { index, kind } => {
                index < placement.len()
                    && kind < problem.catalog().len()
                    && placement.get(index).kind != kind
            }
        }
    }

    /// Applies the move to `placement`.
    pub fn apply_in_place(&self, placement: &mut Placement) {
        match *self {
            PlacementMove::Add(antenna) => placement.push(antenna),
            PlacementMove::Remove(index) => {
                placement.remove(index);
            }
            PlacementMove::Relocate { index, to } => {
                let moved = placement.get(index).with_position(to);
                placement.set(index, moved);
            }
            PlacementMove::Retype { index, kind } => {
                let retyped = placement.get(index).with_kind(kind);
                placement.set(index, retyped);
            }
        }
    }

    /// Returns a new placement with the move applied.
    pub fn apply(&self, placement: &Placement) -> Placement {
        let mut next = placement.clone();
        self.apply_in_place(&mut next);
        next
    }

    /// Cost of the placement after the move, without building it.
    pub fn cost_after(&self, problem: &Problem, placement: &Placement, current_cost: u64) -> u64 {
        let catalog = problem.catalog();
        match *self {
            PlacementMove::Add(antenna) => current_cost + catalog.get(antenna.kind).cost,
            PlacementMove::Remove(index) => {
                current_cost - catalog.get(placement.get(index).kind).cost
            }
            PlacementMove::Relocate { .. } => current_cost,
            PlacementMove::Retype { index, kind } => {
                current_cost - catalog.get(placement.get(index).kind).cost + catalog.get(kind).cost
            }
        }
    }
}
