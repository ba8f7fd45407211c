//! Entry points that hide configuration loading and threading.

use std::path::Path;
use std::thread::{self, JoinHandle};

use cellforge_config::{ConfigError, OptimizerConfig};
use cellforge_core::{CellforgeError, Problem, ProblemSpec, Result};
use cellforge_solver::{optimize_by_name, OptimizeHandle, Optimizer, PlacementResult, SolveEvent};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tracing::debug;

/// Configuration file read by [`run`] from the working directory.
pub const CONFIG_FILE: &str = "cellforge.toml";

/// Runs the named strategy, taking its parameters from [`CONFIG_FILE`] when
/// present.
///
/// A missing file means defaults. A file that exists but does not parse or
/// validate is an error.
pub fn run(spec: ProblemSpec, strategy: &str) -> Result<PlacementResult> {
    let config = load_config(CONFIG_FILE)?;
    optimize_by_name(spec, strategy, config)
}

fn load_config(path: impl AsRef<Path>) -> Result<OptimizerConfig> {
    match OptimizerConfig::load(&path) {
        Ok(config) => Ok(config),
        Err(ConfigError::Io(e)) => {
            debug!(
                event = "config_defaults",
                path = %path.as_ref().display(),
                reason = %e,
            );
            Ok(OptimizerConfig::default())
        }
        Err(e) => Err(CellforgeError::InvalidParameter(e.to_string())),
    }
}

/// A run executing on its own thread.
#[derive(Debug)]
pub struct StreamingRun {
    /// Progress and completion events, in order.
    pub events: UnboundedReceiver<SolveEvent>,
    /// Cancels the run at its next step boundary.
    pub handle: OptimizeHandle,
    /// Joins the run and yields its result.
    pub join: JoinHandle<PlacementResult>,
}

/// Starts `config` on a background thread and returns its event stream.
///
/// Every strategy sends a final [`SolveEvent::Complete`]; simulated
/// annealing also sends progress after each temperature step.
///
/// # Errors
///
/// [`CellforgeError::InvalidParameter`] if `config` is out of range. Nothing
/// is spawned in that case.
pub fn spawn_streaming(problem: Problem, config: OptimizerConfig) -> Result<StreamingRun> {
    let (tx, rx) = unbounded_channel();
    let optimizer = Optimizer::new(config)?.with_events(tx);
    let handle = optimizer.handle();
    let join = thread::spawn(move || optimizer.run(&problem));
    Ok(StreamingRun {
        events: rx,
        handle,
        join,
    })
}
