//! Entry points: run one strategy on one problem and collect the result.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cellforge_config::{OptimizerConfig, StrategyConfig, StrategyKind};
use cellforge_core::{CellforgeError, Problem, ProblemSpec, Result};
use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

use crate::cleanup::remove_useless;
use crate::event::{CompleteEvent, SolveEvent};
use crate::result::PlacementResult;
use crate::scope::RunScope;
use crate::strategy::{SearchStrategy, Strategy};

/// Runs the configured strategy on `problem`.
///
/// # Errors
///
/// Returns [`CellforgeError::InvalidParameter`] if the configuration is out
/// of range. Search itself never fails; an infeasible instance yields a
/// possibly empty placement.
///
/// # Example
///
/// ```
/// use cellforge_config::OptimizerConfig;
/// use cellforge_core::ProblemSpec;
/// use cellforge_solver::optimize;
///
/// let problem = ProblemSpec::new(10, 10).with_houses([(5, 5)]).build().unwrap();
/// let result = optimize(&problem, &OptimizerConfig::default()).unwrap();
/// assert_eq!(result.users_covered(), problem.total_users());
/// ```
pub fn optimize(problem: &Problem, config: &OptimizerConfig) -> Result<PlacementResult> {
    Ok(Optimizer::new(config.clone())?.run(problem))
}

/// Builds the problem, resolves `strategy` by name and runs it.
///
/// When `config` carries parameters for a different strategy, they are
/// replaced by the named strategy's defaults.
///
/// # Errors
///
/// Instance errors from [`ProblemSpec::build`], an unknown strategy name,
/// or an out-of-range parameter, all before any search starts.
pub fn optimize_by_name(
    spec: ProblemSpec,
    strategy: &str,
    mut config: OptimizerConfig,
) -> Result<PlacementResult> {
    let kind: StrategyKind = strategy.parse()?;
    let problem = spec.build()?;
    if config.strategy.kind() != kind {
        config.strategy = StrategyConfig::defaults_for(kind);
    }
    optimize(&problem, &config)
}

/// Runs simulated annealing and streams its progress.
///
/// Sends one [`SolveEvent::Progress`] per temperature step, then exactly one
/// [`SolveEvent::Complete`]. A closed receiver does not stop the run.
///
/// # Errors
///
/// [`CellforgeError::StreamingUnsupported`] for any other strategy, and
/// [`CellforgeError::InvalidParameter`] for an out-of-range configuration.
pub fn optimize_streaming(
    problem: &Problem,
    config: &OptimizerConfig,
    sender: UnboundedSender<SolveEvent>,
) -> Result<PlacementResult> {
    let kind = config.strategy.kind();
    if kind != StrategyKind::SimulatedAnnealing {
        return Err(CellforgeError::StreamingUnsupported(kind.to_string()));
    }
    Ok(Optimizer::new(config.clone())?.with_events(sender).run(problem))
}

/// A configured optimization run.
///
/// Owns the strategy, the cancellation flag shared with its
/// [`OptimizeHandle`]s, and an optional event channel.
#[derive(Debug)]
pub struct Optimizer {
    config: OptimizerConfig,
    strategy: Strategy,
    terminate_early_flag: Arc<AtomicBool>,
    events: Option<UnboundedSender<SolveEvent>>,
}

impl Optimizer {
    /// Validates `config` and builds its strategy.
    pub fn new(config: OptimizerConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| CellforgeError::InvalidParameter(e.to_string()))?;
        let strategy = Strategy::from_config(&config);
        Ok(Self {
            config,
            strategy,
            terminate_early_flag: Arc::new(AtomicBool::new(false)),
            events: None,
        })
    }

    /// Attaches an event channel. Only simulated annealing emits progress;
    /// every strategy emits the final [`SolveEvent::Complete`].
    pub fn with_events(mut self, sender: UnboundedSender<SolveEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub fn kind(&self) -> StrategyKind {
        self.strategy.kind()
    }

    /// A handle that can cancel this run from another thread.
    pub fn handle(&self) -> OptimizeHandle {
        OptimizeHandle {
            terminate_early_flag: self.terminate_early_flag.clone(),
        }
    }

    /// Runs the search, removes useless antennas once, and computes statistics.
    pub fn run(&self, problem: &Problem) -> PlacementResult {
        let kind = self.strategy.kind();
        let mut scope = RunScope::with_optional_seed(problem, self.config.random_seed)
            .with_terminate_flag(self.terminate_early_flag.clone());
        if let Some(tx) = &self.events {
            scope = scope.with_events(tx.clone());
        }

        info!(
            event = "solve_start",
            strategy = %kind,
            width = problem.grid().width(),
            height = problem.grid().height(),
            houses = problem.house_count(),
            antenna_types = problem.catalog().len(),
            budget = ?problem.budget(),
            max_antennas = ?problem.max_antennas(),
            seed = ?self.config.random_seed,
        );

        let mut placement = self.strategy.search(&mut scope);
        let removed = remove_useless(problem, &mut placement);

        debug_assert!(placement.has_unique_positions(), "duplicate antenna positions");
        debug_assert!(
            placement.iter().all(|a| problem.is_valid_site(a.position)),
            "antenna placed on a house or off the grid"
        );

        let result = PlacementResult::new(problem, kind, placement, scope.elapsed());
        scope.emit(SolveEvent::Complete(CompleteEvent {
            strategy: kind,
            stats: result.stats.clone(),
        }));

        info!(
            event = "solve_end",
            strategy = %kind,
            steps = scope.step_count(),
            antennas = result.antenna_count(),
            removed,
            users_covered = result.stats.users_covered,
            total_users = result.stats.total_users,
            total_cost = result.stats.total_cost,
            duration_ms = result.elapsed_ms,
            feasible = result.is_feasible(),
        );
        result
    }
}

/// Cancels a running [`Optimizer`].
///
/// Strategies check the flag at their outer step boundaries, so the run
/// stops after the current step and still returns its best placement.
#[derive(Debug, Clone)]
pub struct OptimizeHandle {
    terminate_early_flag: Arc<AtomicBool>,
}

impl OptimizeHandle {
    pub fn terminate_early(&self) {
        self.terminate_early_flag.store(true, Ordering::SeqCst);
    }

    pub fn is_terminate_early_requested(&self) -> bool {
        self.terminate_early_flag.load(Ordering::SeqCst)
    }
}
