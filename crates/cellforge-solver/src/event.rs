//! Structured progress events.
//!
//! Simulated annealing emits one [`SolveEvent::Progress`] per temperature
//! step. A streaming run then ends with exactly one [`SolveEvent::Complete`]
//! carrying the cleaned-up statistics. Events are plain data so a transport
//! layer can serialize them as they arrive.

use cellforge_config::StrategyKind;
use cellforge_core::{Placement, Problem};
use cellforge_scoring::{summarize, AntennaPlacement, PlacementStats};
use serde::{Deserialize, Serialize};

/// Events emitted during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SolveEvent {
    Progress(ProgressEvent),
    Complete(CompleteEvent),
}

impl SolveEvent {
    pub fn is_complete(&self) -> bool {
        matches!(self, SolveEvent::Complete(_))
    }
}

/// Snapshot of an annealing run at the end of a temperature step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub iteration: u64,
    pub temperature: f64,
    pub current_energy: f64,
    pub best_energy: f64,
    /// Best placement found so far.
    pub antennas: Vec<AntennaPlacement>,
    pub users_covered: u64,
    pub total_users: u64,
    pub total_cost: u64,
    pub progress_percent: f64,
    pub acceptance_rate: f64,
}

impl ProgressEvent {
    /// Builds an event whose placement fields describe `best`.
    ///
    /// Run fields (iteration, temperature, energies, rates) start at zero and
    /// are filled in by the caller.
    pub fn for_best(problem: &Problem, best: &Placement) -> Self {
        let summary = summarize(problem, best);
        Self {
            iteration: 0,
            temperature: 0.0,
            current_energy: 0.0,
            best_energy: 0.0,
            antennas: AntennaPlacement::describe_all(problem.catalog(), best),
            users_covered: summary.users_covered,
            total_users: problem.total_users(),
            total_cost: summary.total_cost,
            progress_percent: 0.0,
            acceptance_rate: 0.0,
        }
    }
}

/// Terminal event of a streaming run.
///
/// Carries no timing so that seeded runs produce identical event sequences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompleteEvent {
    pub strategy: StrategyKind,
    pub stats: PlacementStats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellforge_core::{PlacedAntenna, Position, ProblemSpec};

    #[test]
    fn test_for_best_matches_placement() {
        let problem = ProblemSpec::new(10, 10)
            .with_houses([(5, 5), (0, 0)])
            .build()
            .unwrap();
        let femto = problem.catalog().find("Femto").unwrap();
        let best = Placement::from_antennas(vec![PlacedAntenna::new(Position::new(5, 4), femto)]);
        let snap = ProgressEvent::for_best(&problem, &best);
        assert_eq!(snap.antennas.len(), 1);
        assert_eq!(snap.antennas[0].kind, "Femto");
        assert_eq!(snap.users_covered, 20);
        assert_eq!(snap.total_users, 40);
        assert_eq!(snap.total_cost, 1_000);
    }

    #[test]
    fn test_complete_flag() {
        let complete = SolveEvent::Complete(CompleteEvent {
            strategy: StrategyKind::SimulatedAnnealing,
            stats: PlacementStats::default(),
        });
        assert!(complete.is_complete());
    }
}
