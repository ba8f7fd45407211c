//! Termination conditions for the iterative strategies.
//!
//! Strategies check their termination at outer step boundaries only.

mod composite;
mod external;
mod step_count;
mod unimproved;

use std::fmt::Debug;

use crate::scope::RunScope;

pub use composite::OrTermination;
pub use external::ExternalTermination;
pub use step_count::StepCountTermination;
pub use unimproved::UnimprovedStepCountTermination;

/// Trait for determining when to stop a run.
pub trait Termination: Debug {
    /// Returns true if the run should stop.
    fn is_terminated(&self, scope: &RunScope<'_>) -> bool;
}

/// An absent condition never terminates.
impl<T: Termination> Termination for Option<T> {
    fn is_terminated(&self, scope: &RunScope<'_>) -> bool {
        self.as_ref().is_some_and(|t| t.is_terminated(scope))
    }
}
