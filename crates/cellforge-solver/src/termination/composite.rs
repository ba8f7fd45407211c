//! OR composition over tuples of terminations.

use super::Termination;
use crate::scope::RunScope;

/// Terminates when any child terminates.
///
/// # Examples
///
/// ```
/// use cellforge_solver::termination::{ExternalTermination, OrTermination, StepCountTermination};
///
/// let termination = OrTermination((StepCountTermination::new(100), ExternalTermination));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct OrTermination<T>(pub T);

macro_rules! impl_or_termination {
    ($($idx:tt: $T:ident),+) => {
        impl<$($T: Termination),+> Termination for OrTermination<($($T,)+)> {
            fn is_terminated(&self, scope: &RunScope<'_>) -> bool {
                $((self.0).$idx.is_terminated(scope))||+
            }
        }
    };
}

impl_or_termination!(0: T0);
impl_or_termination!(0: T0, 1: T1);
impl_or_termination!(0: T0, 1: T1, 2: T2);
impl_or_termination!(0: T0, 1: T1, 2: T2, 3: T3);
