//! Run-level scope.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use cellforge_core::Problem;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::sync::mpsc::UnboundedSender;

use crate::event::SolveEvent;

/// State owned by a single optimization run.
///
/// Holds the problem, the run's RNG, the step counters termination reads,
/// and the optional cancellation flag and event channel.
pub struct RunScope<'p> {
    problem: &'p Problem,
    rng: ChaCha8Rng,
    start_time: Instant,
    step_count: u64,
    last_improvement_step: u64,
    terminate_early_flag: Option<Arc<AtomicBool>>,
    events: Option<UnboundedSender<SolveEvent>>,
}

impl<'p> RunScope<'p> {
    /// Creates a scope seeded from OS entropy.
    pub fn new(problem: &'p Problem) -> Self {
        Self::from_rng(problem, ChaCha8Rng::from_os_rng())
    }

    pub fn with_seed(problem: &'p Problem, seed: u64) -> Self {
        Self::from_rng(problem, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Seeds from `seed` when present, otherwise from OS entropy.
    pub fn with_optional_seed(problem: &'p Problem, seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::with_seed(problem, seed),
            None => Self::new(problem),
        }
    }

    fn from_rng(problem: &'p Problem, rng: ChaCha8Rng) -> Self {
        Self {
            problem,
            rng,
            start_time: Instant::now(),
            step_count: 0,
            last_improvement_step: 0,
            terminate_early_flag: None,
            events: None,
        }
    }

    pub fn with_terminate_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.terminate_early_flag = Some(flag);
        self
    }

    pub fn with_events(mut self, sender: UnboundedSender<SolveEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    #[inline]
    pub fn problem(&self) -> &'p Problem {
        self.problem
    }

    #[inline]
    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn increment_step_count(&mut self) -> u64 {
        self.step_count += 1;
        self.step_count
    }

    /// Records that the current step produced a new best.
    pub fn mark_improved(&mut self) {
        self.last_improvement_step = self.step_count;
    }

    /// Steps taken since the last new best.
    pub fn unimproved_step_count(&self) -> u64 {
        self.step_count - self.last_improvement_step
    }

    /// Returns true if cancellation was requested.
    pub fn is_terminate_early(&self) -> bool {
        self.terminate_early_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    pub fn has_event_listener(&self) -> bool {
        self.events.is_some()
    }

    /// Sends an event if a listener is attached.
    ///
    /// Never blocks; a closed receiver is ignored.
    pub fn emit(&self, event: SolveEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }
}

impl std::fmt::Debug for RunScope<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunScope")
            .field("step_count", &self.step_count)
            .field("last_improvement_step", &self.last_improvement_step)
            .field("has_events", &self.events.is_some())
            .finish()
    }
}
