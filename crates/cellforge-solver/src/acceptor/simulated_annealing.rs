//! Simulated annealing acceptor.

use rand::{Rng, RngCore};

use super::Acceptor;

/// Metropolis acceptance with geometric cooling.
///
/// Lower energy is always accepted. Higher energy is accepted with
/// probability `exp(-delta / T)`. A non-finite candidate energy is never
/// accepted. The temperature is multiplied by the cooling rate at the end
/// of every step, and the run is frozen once it reaches the floor.
#[derive(Debug, Clone)]
pub struct SimulatedAnnealingAcceptor {
    starting_temperature: f64,
    current_temperature: f64,
    cooling_rate: f64,
    min_temperature: f64,
    evaluated: u64,
    accepted: u64,
}

impl SimulatedAnnealingAcceptor {
    pub fn new(starting_temperature: f64, cooling_rate: f64, min_temperature: f64) -> Self {
        Self {
            starting_temperature,
            current_temperature: starting_temperature,
            cooling_rate,
            min_temperature,
            evaluated: 0,
            accepted: 0,
        }
    }

    pub fn temperature(&self) -> f64 {
        self.current_temperature
    }

    /// Returns true once the temperature has reached the floor.
    pub fn is_frozen(&self) -> bool {
        self.current_temperature <= self.min_temperature
    }

    /// Accepted over evaluated candidates since the run started.
    pub fn acceptance_rate(&self) -> f64 {
        if self.evaluated == 0 {
            0.0
        } else {
            self.accepted as f64 / self.evaluated as f64
        }
    }

    /// Probability of moving from `current` to `candidate` at the current temperature.
    pub fn acceptance_probability(&self, current_energy: f64, candidate_energy: f64) -> f64 {
        if !candidate_energy.is_finite() {
            return 0.0;
        }
        if candidate_energy < current_energy {
            return 1.0;
        }
        if self.current_temperature <= 0.0 {
            return 0.0;
        }
        (-(candidate_energy - current_energy) / self.current_temperature).exp()
    }
}

impl Default for SimulatedAnnealingAcceptor {
    fn default() -> Self {
        Self::new(100.0, 0.95, 0.1)
    }
}

impl Acceptor for SimulatedAnnealingAcceptor {
    fn is_accepted(
        &mut self,
        rng: &mut dyn RngCore,
        current_energy: f64,
        candidate_energy: f64,
    ) -> bool {
        self.evaluated += 1;
        let p = self.acceptance_probability(current_energy, candidate_energy);
        // Drawn unconditionally.
        let accepted = rng.random::<f64>() < p;
        if accepted {
            self.accepted += 1;
        }
        accepted
    }

    fn phase_started(&mut self, _initial_energy: f64) {
        self.current_temperature = self.starting_temperature;
        self.evaluated = 0;
        self.accepted = 0;
    }

    fn step_ended(&mut self) {
        self.current_temperature *= self.cooling_rate;
    }
}
