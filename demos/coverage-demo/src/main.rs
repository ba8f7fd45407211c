//! Runs every strategy on a generated town and prints a comparison.
//!
//! Set `RUST_LOG` to change verbosity, e.g. `RUST_LOG=cellforge_solver=debug`.

use std::error::Error;

use cellforge::prelude::*;
use cellforge::Position;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const WIDTH: u32 = 80;
const HEIGHT: u32 = 80;
const HOUSES: usize = 40;
const SEED: u64 = 2024;

fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init();
}

fn sample_town() -> ProblemSpec {
    let mut rng = ChaCha8Rng::seed_from_u64(SEED);
    let houses: Vec<Position> = (0..HOUSES)
        .map(|_| {
            Position::new(
                rng.random_range(0..WIDTH as i32),
                rng.random_range(0..HEIGHT as i32),
            )
        })
        .collect();
    ProblemSpec::new(WIDTH, HEIGHT)
        .with_houses(houses)
        .with_budget(120_000)
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logging();
    let problem = sample_town().build()?;

    println!(
        "{:<20} {:>8} {:>10} {:>10} {:>10} {:>8}",
        "strategy", "antennas", "users", "cost", "coverage", "ms"
    );
    for kind in StrategyKind::ALL {
        let config = OptimizerConfig::new()
            .with_random_seed(SEED)
            .with_strategy(cellforge::StrategyConfig::defaults_for(kind));
        let result = optimize(&problem, &config)?;
        println!(
            "{:<20} {:>8} {:>10} {:>10} {:>9.1}% {:>8}",
            kind,
            result.antenna_count(),
            result.users_covered(),
            result.total_cost(),
            result.stats.user_coverage_percentage,
            result.elapsed_ms,
        );
    }

    let config = OptimizerConfig::new()
        .with_random_seed(SEED)
        .with_strategy(SimulatedAnnealingConfig::default());
    let mut run = spawn_streaming(problem, config)?;
    let mut progress = 0;
    let mut last = None;
    while let Some(event) = run.events.blocking_recv() {
        match event {
            SolveEvent::Progress(p) => {
                progress += 1;
                if progress % 25 == 0 {
                    info!(
                        event = "progress",
                        iteration = p.iteration,
                        temperature = p.temperature,
                        best_energy = p.best_energy,
                        percent = p.progress_percent,
                    );
                }
            }
            SolveEvent::Complete(complete) => last = Some(complete),
        }
    }
    let result = run.join.join().map_err(|_| "annealing thread panicked")?;

    info!(event = "streamed", progress_events = progress);
    if let Some(complete) = last {
        println!("{}", serde_json::to_string_pretty(&complete.stats)?);
    }
    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
