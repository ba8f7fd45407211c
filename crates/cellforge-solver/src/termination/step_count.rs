//! Step count termination.

use super::Termination;
use crate::scope::RunScope;

/// Terminates after a step count.
///
/// # Example
///
/// ```
/// use cellforge_solver::termination::StepCountTermination;
///
/// // Terminate after 1000 steps
/// let term = StepCountTermination::new(1000);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct StepCountTermination {
    limit: u64,
}

impl StepCountTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl Termination for StepCountTermination {
    fn is_terminated(&self, scope: &RunScope<'_>) -> bool {
        scope.step_count() >= self.limit
    }
}
