//! End-to-end runs through the public entry points.

use cellforge_config::{
    GeneticConfig, GreedyConfig, GreedyScoring, OptimizerConfig, SimulatedAnnealingConfig,
    StrategyConfig, StrategyKind, TabuSearchConfig,
};
use cellforge_core::{CellforgeError, ProblemSpec};
use cellforge_test::{
    assert_cleaned, assert_well_formed, clustered, empty, far_apart_houses, single_house,
    small_town,
};
use tokio::sync::mpsc::unbounded_channel;

use super::*;

fn config_for(kind: StrategyKind) -> OptimizerConfig {
    let strategy: StrategyConfig = match kind {
        StrategyKind::SimulatedAnnealing => SimulatedAnnealingConfig::default()
            .with_cooling_rate(0.9)
            .with_iterations_per_temperature(25)
            .into(),
        StrategyKind::Genetic => GeneticConfig {
            population_size: 16,
            generations: 25,
            ..GeneticConfig::default()
        }
        .into(),
        other => StrategyConfig::defaults_for(other),
    };
    OptimizerConfig::new()
        .with_random_seed(7)
        .with_strategy(strategy)
}

fn drain(rx: &mut tokio::sync::mpsc::UnboundedReceiver<SolveEvent>) -> Vec<SolveEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[test]
fn test_results_are_cleaned_and_well_formed() {
    for problem in [clustered(), small_town()] {
        for kind in StrategyKind::ALL {
            let result = optimize(&problem, &config_for(kind)).unwrap();
            assert_eq!(result.strategy, kind);
            assert_well_formed(&problem, &result.placement);
            assert_cleaned(&problem, &result.placement);
            assert!(result.users_covered() <= problem.total_users());
            assert_eq!(result.stats.antennas.len(), result.antenna_count());
        }
    }
}

#[test]
fn test_zero_houses_every_strategy() {
    let problem = empty(15, 15);
    for kind in StrategyKind::ALL {
        let result = optimize(&problem, &config_for(kind)).unwrap();
        assert_eq!(result.antenna_count(), 0, "{kind}");
        assert_eq!(result.total_cost(), 0);
        assert_eq!(result.users_covered(), 0);
        assert_eq!(result.stats.coverage_percentage, 0.0);
        assert_eq!(result.stats.user_coverage_percentage, 0.0);
    }
}

#[test]
fn test_far_apart_houses_limited_by_budget() {
    let problem = far_apart_houses(6, Some(3_000));
    for kind in [StrategyKind::Greedy, StrategyKind::Genetic] {
        let result = optimize(&problem, &config_for(kind)).unwrap();
        assert!(result.antenna_count() <= 3, "{kind} placed {}", result.antenna_count());
        assert!(result.total_cost() <= 3_000);
        assert!(result
            .placement
            .iter()
            .all(|a| !problem.is_house(a.position)));
    }
}

#[test]
fn test_single_house_full_coverage() {
    let problem = single_house();
    let result = optimize(&problem, &config_for(StrategyKind::Greedy)).unwrap();
    assert_eq!(result.antenna_count(), 1);
    assert_eq!(result.stats.user_coverage_percentage, 100.0);
    assert_eq!(result.total_cost(), 1_000);
    assert!(result.is_feasible());
}

#[test]
fn test_streaming_is_deterministic_per_seed() {
    let problem = small_town();
    let config = config_for(StrategyKind::SimulatedAnnealing);

    let run = || {
        let (tx, mut rx) = unbounded_channel();
        let result = optimize_streaming(&problem, &config, tx).unwrap();
        (result.placement, drain(&mut rx))
    };
    let (placement_a, events_a) = run();
    let (placement_b, events_b) = run();
    assert_eq!(placement_a, placement_b);
    assert_eq!(events_a, events_b);
}

#[test]
fn test_streaming_ends_with_one_complete_event() {
    let problem = clustered();
    let (tx, mut rx) = unbounded_channel();
    let result =
        optimize_streaming(&problem, &config_for(StrategyKind::SimulatedAnnealing), tx).unwrap();
    let events = drain(&mut rx);

    assert!(events.len() >= 2);
    assert_eq!(events.iter().filter(|e| e.is_complete()).count(), 1);
    let Some(SolveEvent::Complete(complete)) = events.last() else {
        panic!("last event is not Complete");
    };
    assert_eq!(complete.strategy, StrategyKind::SimulatedAnnealing);
    assert_eq!(complete.stats, result.stats);

    let mut last_iteration = 0;
    for event in &events[..events.len() - 1] {
        let SolveEvent::Progress(progress) = event else {
            panic!("progress expected before Complete");
        };
        assert!(progress.iteration > last_iteration);
        assert!(progress.progress_percent <= 100.0);
        assert!(progress.best_energy <= progress.current_energy);
        last_iteration = progress.iteration;
    }
}

#[test]
fn test_streaming_survives_dropped_receiver() {
    let problem = small_town();
    let (tx, rx) = unbounded_channel();
    drop(rx);
    let result =
        optimize_streaming(&problem, &config_for(StrategyKind::SimulatedAnnealing), tx).unwrap();
    assert_cleaned(&problem, &result.placement);
}

#[test]
fn test_streaming_rejects_other_strategies() {
    let problem = single_house();
    let (tx, _rx) = unbounded_channel();
    let err = optimize_streaming(&problem, &config_for(StrategyKind::TabuSearch), tx).unwrap_err();
    assert!(matches!(err, CellforgeError::StreamingUnsupported(_)));
}

#[test]
fn test_optimize_by_name_errors_before_search() {
    let spec = || ProblemSpec::new(10, 10).with_houses([(5, 5)]);

    let err = optimize_by_name(spec(), "simplex", OptimizerConfig::default()).unwrap_err();
    assert_eq!(err, CellforgeError::UnknownStrategy("simplex".to_string()));

    let outside = ProblemSpec::new(10, 10).with_houses([(12, 3)]);
    let err = optimize_by_name(outside, "greedy", OptimizerConfig::default()).unwrap_err();
    assert!(matches!(err, CellforgeError::DemandOutOfBounds { x: 12, y: 3, .. }));

    let no_types = spec().with_allowed_types(Vec::<String>::new());
    let err = optimize_by_name(no_types, "greedy", OptimizerConfig::default()).unwrap_err();
    assert_eq!(err, CellforgeError::EmptyCatalog);

    let bad = OptimizerConfig::new().with_strategy(TabuSearchConfig {
        tabu_tenure: 0,
        ..TabuSearchConfig::default()
    });
    let err = optimize_by_name(spec(), "tabu", bad).unwrap_err();
    assert!(matches!(err, CellforgeError::InvalidParameter(_)));
}

#[test]
fn test_optimize_by_name_uses_named_strategy_defaults() {
    let spec = ProblemSpec::new(12, 12).with_houses([(3, 3), (8, 9)]);
    let config = OptimizerConfig::new().with_random_seed(1);
    let result = optimize_by_name(spec, "hill-climbing", config).unwrap();
    assert_eq!(result.strategy, StrategyKind::HillClimbing);
}

#[test]
fn test_optimize_by_name_capacity_waste_prefers_matching_capacity() {
    // 2000 users in one house: only a Macro serves them all.
    let spec = || {
        ProblemSpec::new(10, 10)
            .with_houses([(5, 5)])
            .with_users_per_house(2_000)
    };
    let config = |scoring| {
        OptimizerConfig::new().with_strategy(GreedyConfig::default().with_scoring(scoring))
    };

    let result =
        optimize_by_name(spec(), "greedy", config(GreedyScoring::CapacityWaste)).unwrap();
    assert_eq!(result.strategy, StrategyKind::Greedy);
    assert_eq!(result.antenna_count(), 1);
    assert_eq!(result.total_cost(), 25_000);
    assert_eq!(result.users_covered(), 2_000);
    assert_eq!(result.stats.users_served, 2_000);
    assert_eq!(result.stats.capacity_utilization, 100.0);

    // Users per unit cost alone settles for a Femto serving 20.
    let result = optimize_by_name(spec(), "greedy", config(GreedyScoring::CostPerUser)).unwrap();
    assert_eq!(result.total_cost(), 1_000);
    assert_eq!(result.stats.users_served, 20);
}

#[test]
fn test_penalty_strategies_stay_within_budget_end_to_end() {
    let problem = far_apart_houses(4, Some(3_000));
    for kind in [
        StrategyKind::HillClimbing,
        StrategyKind::SimulatedAnnealing,
        StrategyKind::TabuSearch,
        StrategyKind::Vns,
    ] {
        for seed in [1, 7, 42] {
            let config = config_for(kind).with_random_seed(seed);
            let result = optimize(&problem, &config).unwrap();
            assert!(result.is_feasible(), "{kind} seed {seed}");
            assert!(result.total_cost() <= 3_000, "{kind} seed {seed}");
            assert!(result.antenna_count() <= 3);
        }
    }
}

#[test]
fn test_cancelled_run_still_returns_clean_result() {
    let problem = clustered();
    let optimizer = Optimizer::new(config_for(StrategyKind::TabuSearch)).unwrap();
    let handle = optimizer.handle();
    assert!(!handle.is_terminate_early_requested());
    handle.terminate_early();
    assert!(handle.is_terminate_early_requested());

    let result = optimizer.run(&problem);
    assert_cleaned(&problem, &result.placement);
    assert_well_formed(&problem, &result.placement);
}

#[test]
fn test_result_serializes_flat() {
    let problem = single_house();
    let result = optimize(&problem, &config_for(StrategyKind::Greedy)).unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["strategy"], "greedy");
    assert_eq!(json["users_covered"], 20);
    assert!(json.get("elapsed_ms").is_some());
    assert_eq!(json["antennas"].as_array().map(Vec::len), Some(1));
}
