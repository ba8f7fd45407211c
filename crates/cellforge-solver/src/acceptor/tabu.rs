//! Tabu memory of recently visited placements.

use std::collections::VecDeque;

use cellforge_core::PlacementKey;

/// Bounded FIFO of placement keys.
///
/// Keys are order independent, so a placement is tabu whatever order its
/// antennas were listed in. Once full, pushing evicts the oldest key.
#[derive(Debug, Clone)]
pub struct TabuMemory {
    tenure: usize,
    keys: VecDeque<PlacementKey>,
}

impl TabuMemory {
    pub fn new(tenure: usize) -> Self {
        Self {
            tenure,
            keys: VecDeque::with_capacity(tenure),
        }
    }

    pub fn tenure(&self) -> usize {
        self.tenure
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, key: &PlacementKey) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    pub fn push(&mut self, key: PlacementKey) {
        if self.tenure == 0 {
            return;
        }
        if self.keys.len() == self.tenure {
            self.keys.pop_front();
        }
        self.keys.push_back(key);
    }

    /// A candidate is admissible if it is not tabu, or if it beats the best
    /// energy seen so far (aspiration).
    pub fn is_admissible(&self, key: &PlacementKey, energy: f64, best_energy: f64) -> bool {
        energy < best_energy || !self.contains(key)
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }
}
