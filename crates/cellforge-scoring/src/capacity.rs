//! Capacity-aware assignment of houses to antennas.
//!
//! Coverage says which antennas *could* serve a house; assignment decides
//! which one does. Candidate (antenna, house) pairs are taken closest first
//! and a house is served by the first covering antenna that still has room
//! for all of its users. Houses are never split across antennas.

use cellforge_core::{Placement, Problem};
use smallvec::SmallVec;

/// Result of assigning houses to antennas.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assignment {
    /// Serving antenna index per house id, `None` if unserved.
    pub server: Vec<Option<usize>>,
    /// Users assigned to each antenna, by placement index.
    pub load: Vec<u64>,
    /// Total users served across all antennas.
    pub users_served: u64,
}

impl Assignment {
    pub fn houses_served(&self) -> usize {
        self.server.iter().filter(|s| s.is_some()).count()
    }

    /// Houses served by antenna `index`.
    pub fn served_by(&self, index: usize) -> SmallVec<[usize; 8]> {
        self.server
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == Some(index))
            .map(|(h, _)| h)
            .collect()
    }
}

/// Assigns every covered house to its nearest covering antenna with room left.
///
/// Ties in distance go to the lower antenna index, then the lower house id,
/// so the assignment is deterministic.
pub fn assign_users(problem: &Problem, placement: &Placement) -> Assignment {
    let users = problem.users_per_house() as u64;
    let houses = problem.houses();

    let mut pairs: Vec<(i64, usize, usize)> = Vec::new();
    for (a, antenna) in placement.iter().enumerate() {
        for h in problem.houses_within(antenna.position, antenna.kind) {
            pairs.push((houses[h].distance_squared(antenna.position), a, h));
        }
    }
    pairs.sort_unstable();

    let mut remaining: Vec<Option<u64>> = placement
        .iter()
        .map(|a| problem.spec(a.kind).capacity.map(u64::from))
        .collect();
    let mut server = vec![None; houses.len()];
    let mut load = vec![0u64; placement.len()];
    let mut users_served = 0;

    for (_, a, h) in pairs {
        if server[h].is_some() {
            continue;
        }
        let fits = match remaining[a] {
            Some(left) if left >= users => {
                remaining[a] = Some(left - users);
                true
            }
            Some(_) => false,
            None => true,
        };
        if fits {
            server[h] = Some(a);
            load[a] += users;
            users_served += users;
        }
    }

    Assignment {
        server,
        load,
        users_served,
    }
}
