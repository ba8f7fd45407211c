//! Hill climbing acceptor.

use rand::RngCore;

use super::Acceptor;

/// Accepts only strictly lower energy.
///
/// # Example
///
/// ```
/// use cellforge_solver::acceptor::{Acceptor, HillClimbingAcceptor};
/// use rand::SeedableRng;
///
/// let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(0);
/// let mut acceptor = HillClimbingAcceptor::new();
/// assert!(acceptor.is_accepted(&mut rng, 10.0, 5.0));
/// assert!(!acceptor.is_accepted(&mut rng, 5.0, 5.0));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HillClimbingAcceptor;

impl HillClimbingAcceptor {
    pub fn new() -> Self {
        Self
    }
}

impl Acceptor for HillClimbingAcceptor {
    fn is_accepted(
        &mut self,
        _rng: &mut dyn RngCore,
        current_energy: f64,
        candidate_energy: f64,
    ) -> bool {
        candidate_energy < current_energy
    }
}
