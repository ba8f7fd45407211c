//! External termination via the run's cancellation flag.

use super::Termination;
use crate::scope::RunScope;

/// Terminates once cancellation is requested through the scope's flag.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExternalTermination;

impl Termination for ExternalTermination {
    fn is_terminated(&self, scope: &RunScope<'_>) -> bool {
        scope.is_terminate_early()
    }
}
