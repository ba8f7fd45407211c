//! Termination based on lack of improvement.

use super::Termination;
use crate::scope::RunScope;

/// Terminates after `limit` steps without a new best.
///
/// Relies on the strategy calling [`RunScope::mark_improved`] whenever it
/// records a new best placement.
#[derive(Debug, Clone, Copy)]
pub struct UnimprovedStepCountTermination {
    limit: u64,
}

impl UnimprovedStepCountTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl Termination for UnimprovedStepCountTermination {
    fn is_terminated(&self, scope: &RunScope<'_>) -> bool {
        scope.unimproved_step_count() >= self.limit
    }
}
