use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use cellforge_config::{
    GeneticConfig, GreedyConfig, ObjectiveConfig, OptimizerConfig, SimulatedAnnealingConfig,
    StrategyConfig, StrategyKind, TabuSearchConfig, VnsConfig,
};
use cellforge_core::{PlacedAntenna, Position};
use cellforge_test::{assert_well_formed, empty, far_apart_houses, single_house, small_town};

use super::best::BestPlacement;
use super::vns::next_k;
use super::*;
use crate::acceptor::TabuMemory;

const PENALTY_STRATEGIES: [StrategyKind; 4] = [
    StrategyKind::HillClimbing,
    StrategyKind::SimulatedAnnealing,
    StrategyKind::TabuSearch,
    StrategyKind::Vns,
];

fn quick_config(kind: StrategyKind) -> OptimizerConfig {
    let strategy: StrategyConfig = match kind {
        StrategyKind::SimulatedAnnealing => SimulatedAnnealingConfig::default()
            .with_iterations_per_temperature(20)
            .into(),
        StrategyKind::Genetic => GeneticConfig {
            population_size: 20,
            generations: 30,
            ..GeneticConfig::default()
        }
        .into(),
        other => StrategyConfig::defaults_for(other),
    };
    OptimizerConfig::new().with_strategy(strategy)
}

fn run(problem: &Problem, kind: StrategyKind, seed: u64) -> Placement {
    let strategy = Strategy::from_config(&quick_config(kind));
    let mut scope = RunScope::with_seed(problem, seed);
    strategy.search(&mut scope)
}

#[test]
fn test_from_config_selects_kind() {
    for kind in StrategyKind::ALL {
        assert_eq!(Strategy::from_config(&quick_config(kind)).kind(), kind);
    }
}

#[test]
fn test_every_strategy_is_well_formed() {
    let problem = small_town();
    for kind in StrategyKind::ALL {
        let placement = run(&problem, kind, 11);
        assert_well_formed(&problem, &placement);
    }
}

#[test]
fn test_zero_houses_gives_empty_placement() {
    let problem = empty(20, 20);
    for kind in StrategyKind::ALL {
        assert!(run(&problem, kind, 1).is_empty(), "{kind} placed antennas");
    }
}

#[test]
fn test_rejection_strategies_respect_budget() {
    let problem = small_town();
    for kind in [StrategyKind::Greedy, StrategyKind::Genetic] {
        let placement = run(&problem, kind, 5);
        assert!(placement.total_cost(problem.catalog()) <= 40_000, "{kind} over budget");
    }
}

#[test]
fn test_penalty_strategies_respect_budget() {
    // Four houses needing four antennas against a budget for three Femtos.
    for problem in [small_town(), far_apart_houses(4, Some(3_000))] {
        let budget = problem.budget().unwrap();
        for kind in PENALTY_STRATEGIES {
            for seed in 0..6 {
                let placement = run(&problem, kind, seed);
                let cost = placement.total_cost(problem.catalog());
                assert!(cost <= budget, "{kind} seed {seed}: cost {cost} over {budget}");
            }
        }
    }
}

#[test]
fn test_best_placement_ranks_feasible_first() {
    let problem = far_apart_houses(2, Some(1_000));
    let femto = PlacedAntenna::new(Position::new(15, 14), 0);
    let pico = PlacedAntenna::new(Position::new(30, 29), 1);
    let feasible = Placement::from_antennas(vec![femto]);
    let over = Placement::from_antennas(vec![femto, pico]);

    let mut best = BestPlacement::new(&problem, Placement::new(), f64::INFINITY);
    assert!(!best.is_feasible());
    assert!(best.update(&problem, &over, 50.0));
    assert!(!best.is_feasible());
    assert!(best.update(&problem, &feasible, 201.0));
    assert!(best.is_feasible());
    assert!(!best.update(&problem, &over, 50.0));
    assert_eq!(best.placement(), &feasible);
    assert_eq!(best.energy(), 201.0);
}

#[test]
fn test_tabu_aspiration_admits_move_beating_best() {
    let problem = single_house();
    let tabu = TabuSearch::new(
        TabuSearchConfig::default(),
        &ObjectiveConfig::default(),
        Default::default(),
    );
    let current = Placement::new();
    let femto = PlacedAntenna::new(Position::new(5, 4), 0);
    let moves = [
        PlacementMove::Add(femto),
        PlacementMove::Add(PlacedAntenna::new(Position::new(5, 6), 1)),
    ];
    let mut memory = TabuMemory::new(5);
    memory.push(Placement::from_antennas(vec![femto]).key());

    // Femto reaches energy 1.0, Pico 5.0.
    let (chosen, e) = tabu.choose_move(&problem, &memory, &current, &moves, 3.0).unwrap();
    assert_eq!(chosen.get(0).kind, 0);
    assert_eq!(e, 1.0);

    let (chosen, e) = tabu.choose_move(&problem, &memory, &current, &moves, 0.5).unwrap();
    assert_eq!(chosen.get(0).kind, 1);
    assert_eq!(e, 5.0);

    let mut all_tabu = memory.clone();
    all_tabu.push(moves[1].apply(&current).key());
    assert!(tabu.choose_move(&problem, &all_tabu, &current, &moves, 0.5).is_none());
}

#[test]
fn test_vns_neighborhood_escalates_and_resets() {
    let mut k = 1;
    let mut seen = Vec::new();
    for _ in 0..4 {
        k = next_k(k, 3, false);
        seen.push(k);
    }
    assert_eq!(seen, [2, 3, 1, 2]);
    assert_eq!(next_k(3, 3, true), 1);
    assert_eq!(next_k(2, 3, true), 1);
    assert_eq!(next_k(1, 1, false), 1);
}

#[test]
fn test_greedy_stops_at_target_coverage() {
    let problem = far_apart_houses(2, None);
    let greedy = Greedy::new(GreedyConfig::default().with_target_coverage(50.0));
    let mut scope = RunScope::with_seed(&problem, 0);
    let (placement, steps) = greedy.search_with_steps(&mut scope);
    assert_eq!(placement.len(), 1);
    assert_eq!(steps[0].gain.new_users, 20);

    let greedy = Greedy::new(GreedyConfig::default());
    let mut scope = RunScope::with_seed(&problem, 0);
    assert_eq!(greedy.search(&mut scope).len(), 2);
}

#[test]
fn test_greedy_single_house_places_one_adjacent_antenna() {
    let problem = single_house();
    let placement = run(&problem, StrategyKind::Greedy, 0);
    assert_eq!(placement.len(), 1);
    let antenna = placement.get(0);
    assert_eq!(antenna.position.distance_squared(Position::new(5, 5)), 1);
    assert_eq!(problem.spec(antenna.kind).name, "Femto");
}

#[test]
fn test_greedy_users_never_decrease() {
    let problem = small_town();
    let greedy = Greedy::new(Default::default());
    let mut scope = RunScope::with_seed(&problem, 0);
    let (placement, steps) = greedy.search_with_steps(&mut scope);
    assert_eq!(placement.len(), steps.len());
    let mut covered = 0;
    for step in &steps {
        assert!(step.gain.new_users > 0);
        covered += step.gain.new_users;
    }
    assert!(covered <= problem.total_users());
    assert_eq!(scope.step_count(), steps.len() as u64);
}

#[test]
fn test_greedy_far_apart_houses_within_budget() {
    let problem = far_apart_houses(5, Some(3_000));
    let placement = run(&problem, StrategyKind::Greedy, 0);
    assert_eq!(placement.len(), 3);
    assert!(placement.iter().all(|a| !problem.is_house(a.position)));
}

#[test]
fn test_simulated_annealing_is_deterministic() {
    let problem = small_town();
    let a = run(&problem, StrategyKind::SimulatedAnnealing, 42);
    let b = run(&problem, StrategyKind::SimulatedAnnealing, 42);
    assert_eq!(a, b);
}

#[test]
fn test_terminate_flag_stops_before_first_step() {
    let problem = small_town();
    for kind in [
        StrategyKind::HillClimbing,
        StrategyKind::TabuSearch,
        StrategyKind::Vns,
        StrategyKind::SimulatedAnnealing,
    ] {
        let strategy = Strategy::from_config(&quick_config(kind));
        let mut scope =
            RunScope::with_seed(&problem, 3).with_terminate_flag(Arc::new(AtomicBool::new(true)));
        strategy.search(&mut scope);
        assert_eq!(scope.step_count(), 0, "{kind} kept stepping");
    }
}

#[test]
fn test_hill_climbing_never_worsens_initial_energy() {
    let problem = small_town();
    let config = quick_config(StrategyKind::HillClimbing);
    let StrategyConfig::HillClimbing(hc) = config.strategy.clone() else {
        unreachable!()
    };
    let energy = Energy::new(&config.objective, hc.cost_divisor);

    let hood_config = config.neighborhood.clone();
    let hood = crate::heuristic::Neighborhood::new(&problem, &hood_config);
    let mut scope = RunScope::with_seed(&problem, 9);
    let initial = hood.initial_placement(scope.rng(), hc.max_initial_antennas, hc.initial_large_bias);

    let mut scope = RunScope::with_seed(&problem, 9);
    let result = Strategy::from_config(&config).search(&mut scope);
    assert!(energy.evaluate(&problem, &result) <= energy.evaluate(&problem, &initial));
}

#[test]
fn test_vns_polish_only_improves() {
    let problem = small_town();
    let vns = Vns::new(VnsConfig::default(), &ObjectiveConfig::default(), Default::default());
    let energy = Energy::new(&ObjectiveConfig::default(), VnsConfig::default().cost_divisor);
    let start = Placement::from_antennas(vec![
        PlacedAntenna::new(Position::new(3, 3), 3),
        PlacedAntenna::new(Position::new(12, 13), 3),
    ]);
    let e = energy.evaluate(&problem, &start);
    let (polished, polished_energy) = vns.polish(&problem, start, e);
    assert!(polished_energy <= e);
    assert_eq!(polished_energy, energy.evaluate(&problem, &polished));
}

#[test]
fn test_best_candidate_respects_admission() {
    let problem = single_house();
    let energy = Energy::new(&ObjectiveConfig::default(), 1000.0);
    let current = Placement::new();
    let moves = [
        PlacementMove::Add(PlacedAntenna::new(Position::new(5, 4), 0)),
        PlacementMove::Add(PlacedAntenna::new(Position::new(5, 6), 1)),
    ];
    let (best, _) = best_candidate(&problem, &energy, &current, &moves, |_, _| true).unwrap();
    assert_eq!(best.get(0).kind, 0);

    let (second, _) = best_candidate(&problem, &energy, &current, &moves, |p, _| {
        p.get(0).kind != 0
    })
    .unwrap();
    assert_eq!(second.get(0).kind, 1);
}
