//! Population-based search.

use std::collections::HashSet;

use cellforge_config::{GeneticConfig, ObjectiveConfig, StrategyKind};
use cellforge_core::{PlacedAntenna, Placement, Position, Problem};
use cellforge_scoring::{is_useful, Fitness};
use rand::seq::index::sample;
use rand::Rng;
use tracing::{debug, info};

use super::SearchStrategy;
use crate::scope::RunScope;
use crate::termination::{ExternalTermination, Termination};

/// Random-site draws per antenna when building a chromosome.
const CHROMOSOME_ATTEMPTS_PER_ANTENNA: usize = 3;

/// Random-site draws for an add mutation.
const MUTATION_ADD_ATTEMPTS: usize = 20;

/// Generational genetic algorithm over placements, maximizing [`Fitness`].
///
/// Every chromosome is repaired after crossover: duplicate sites and
/// antennas reaching no house are dropped, the list is truncated to the
/// antenna cap, then the most expensive antennas are discarded until the
/// budget holds. Budget and cap violations are never returned.
#[derive(Debug, Clone)]
pub struct Genetic {
    config: GeneticConfig,
    fitness: Fitness,
}

#[derive(Debug, Clone, Copy)]
enum Mutation {
    Add,
    Remove,
    Retype,
}

impl Genetic {
    pub fn new(config: GeneticConfig, objective: &ObjectiveConfig) -> Self {
        Self {
            config,
            fitness: Fitness::new(objective),
        }
    }

    fn antenna_cap(&self, problem: &Problem) -> usize {
        problem.max_antennas().unwrap_or(self.config.default_max_antennas)
    }

    fn random_chromosome<R: Rng + ?Sized>(&self, problem: &Problem, rng: &mut R) -> Placement {
        let mut placement = Placement::new();
        let cap = self.antenna_cap(problem);
        if cap == 0 {
            return placement;
        }
        let target = rng.random_range(1..=cap);
        let grid = problem.grid();
        let kinds = problem.catalog().len();
        let mut attempts = 0;
        while placement.len() < target && attempts < target * CHROMOSOME_ATTEMPTS_PER_ANTENNA {
            attempts += 1;
            let pos = Position::new(
                rng.random_range(0..grid.width()) as i32,
                rng.random_range(0..grid.height()) as i32,
            );
            if !problem.is_valid_site(pos) || placement.is_occupied(pos) {
                continue;
            }
            let antenna = PlacedAntenna::new(pos, rng.random_range(0..kinds));
            if is_useful(problem, &antenna) {
                placement.push(antenna);
            }
        }
        enforce_budget(problem, &mut placement);
        placement
    }

    /// Single-point crossover with independent cut points in each parent.
    fn crossover<R: Rng + ?Sized>(
        &self,
        problem: &Problem,
        rng: &mut R,
        a: &Placement,
        b: &Placement,
    ) -> (Placement, Placement) {
        if rng.random::<f64>() >= self.config.crossover_rate || a.is_empty() || b.is_empty() {
            return (a.clone(), b.clone());
        }
        let cut_a = rng.random_range(0..=a.len());
        let cut_b = rng.random_range(0..=b.len());

        let splice = |head: &[PlacedAntenna], tail: &[PlacedAntenna]| {
            let mut child: Placement = head.iter().chain(tail).copied().collect();
            self.repair(problem, &mut child);
            child
        };
        (
            splice(&a.as_slice()[..cut_a], &b.as_slice()[cut_b..]),
            splice(&b.as_slice()[..cut_b], &a.as_slice()[cut_a..]),
        )
    }

    fn repair(&self, problem: &Problem, child: &mut Placement) {
        let mut seen = HashSet::new();
        child.retain(|a| seen.insert(a.position) && is_useful(problem, a));
        child.truncate(self.antenna_cap(problem));
        enforce_budget(problem, child);
    }

    fn mutate<R: Rng + ?Sized>(&self, problem: &Problem, rng: &mut R, chromosome: &mut Placement) {
        if rng.random::<f64>() >= self.config.mutation_rate {
            return;
        }
        let catalog = problem.catalog();
        let cost = chromosome.total_cost(catalog);
        let mutation = match rng.random_range(0..3) {
            0 => Mutation::Add,
            1 => Mutation::Remove,
            _ => Mutation::Retype,
        };
        match mutation {
            Mutation::Add => {
                if !problem.count_allowed(chromosome.len() + 1) {
                    return;
                }
                let grid = problem.grid();
                for _ in 0..MUTATION_ADD_ATTEMPTS {
                    let pos = Position::new(
                        rng.random_range(0..grid.width()) as i32,
                        rng.random_range(0..grid.height()) as i32,
                    );
                    if !problem.is_valid_site(pos) || chromosome.is_occupied(pos) {
                        continue;
                    }
                    let antenna = PlacedAntenna::new(pos, rng.random_range(0..catalog.len()));
                    if !problem.within_budget(cost + catalog.get(antenna.kind).cost) {
                        continue;
                    }
                    if is_useful(problem, &antenna) {
                        chromosome.push(antenna);
                        break;
                    }
                }
            }
            Mutation::Remove => {
                if !chromosome.is_empty() {
                    chromosome.remove(rng.random_range(0..chromosome.len()));
                }
            }
            Mutation::Retype => {
                if chromosome.is_empty() {
                    return;
                }
                let index = rng.random_range(0..chromosome.len());
                let old = chromosome.get(index);
                let base = cost - catalog.get(old.kind).cost;
                // First kind, in catalog order, that fits the budget and still reaches a house.
                let replacement = catalog
                    .iter()
                    .map(|(kind, _)| old.with_kind(kind))
                    .find(|a| {
                        problem.within_budget(base + catalog.get(a.kind).cost) && is_useful(problem, a)
                    });
                if let Some(antenna) = replacement {
                    chromosome.set(index, antenna);
                }
            }
        }
    }

    /// Index of the fittest among `tournament_size` distinct random individuals.
    fn tournament<R: Rng + ?Sized>(&self, rng: &mut R, fitnesses: &[f64]) -> usize {
        let size = self.config.tournament_size.clamp(1, fitnesses.len());
        let mut winner: Option<usize> = None;
        for i in sample(rng, fitnesses.len(), size) {
            if winner.map_or(true, |w| fitnesses[i] > fitnesses[w]) {
                winner = Some(i);
            }
        }
        winner.unwrap_or(0)
    }
}

/// Discards the most expensive antenna until the placement fits the budget.
fn enforce_budget(problem: &Problem, placement: &mut Placement) {
    let Some(budget) = problem.budget() else {
        return;
    };
    let catalog = problem.catalog();
    while placement.total_cost(catalog) > budget {
        let priciest = placement
            .iter()
            .enumerate()
            .max_by(|(i, a), (j, b)| {
                catalog
                    .get(a.kind)
                    .cost
                    .cmp(&catalog.get(b.kind).cost)
                    .then_with(|| j.cmp(i))
            })
            .map(|(i, _)| i);
        match priciest {
            Some(i) => {
                placement.remove(i);
            }
            None => break,
        }
    }
}

impl SearchStrategy for Genetic {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Genetic
    }

    fn search(&self, scope: &mut RunScope<'_>) -> Placement {
        let problem = scope.problem();
        let size = self.config.population_size.max(2);

        info!(
            event = "phase_start",
            strategy = "genetic",
            population = size,
            generations = self.config.generations,
        );

        let mut population: Vec<Placement> = (0..size)
            .map(|_| self.random_chromosome(problem, scope.rng()))
            .collect();
        let mut best: Option<(Placement, f64)> = None;

        for generation in 0..self.config.generations {
            if ExternalTermination.is_terminated(scope) {
                break;
            }
            scope.increment_step_count();

            let fitnesses: Vec<f64> = population
                .iter()
                .map(|p| self.fitness.evaluate(problem, p))
                .collect();

            let mut generation_best: Option<usize> = None;
            for (i, &f) in fitnesses.iter().enumerate() {
                if generation_best.map_or(true, |b| f > fitnesses[b]) {
                    generation_best = Some(i);
                }
            }
            if let Some(i) = generation_best {
                let f = fitnesses[i];
                if best.as_ref().map_or(f > f64::NEG_INFINITY, |(_, b)| f > *b) {
                    debug!(
                        event = "new_best",
                        generation,
                        fitness = f,
                        antennas = population[i].len(),
                    );
                    best = Some((population[i].clone(), f));
                    scope.mark_improved();
                }
            }

            if generation % 10 == 0 || generation + 1 == self.config.generations {
                let finite: Vec<f64> = fitnesses.iter().copied().filter(|f| f.is_finite()).collect();
                let avg_fitness = if finite.is_empty() {
                    f64::NEG_INFINITY
                } else {
                    finite.iter().sum::<f64>() / finite.len() as f64
                };
                let avg_antennas =
                    population.iter().map(Placement::len).sum::<usize>() as f64 / size as f64;
                info!(
                    event = "progress",
                    generation,
                    best_fitness = best.as_ref().map_or(f64::NEG_INFINITY, |(_, f)| *f),
                    avg_fitness,
                    avg_antennas,
                );
            }

            let selected: Vec<Placement> = (0..size)
                .map(|_| population[self.tournament(scope.rng(), &fitnesses)].clone())
                .collect();

            let mut next = Vec::with_capacity(size + 1);
            for pair in selected.chunks(2) {
                let a = &pair[0];
                let b = pair.get(1).unwrap_or(&selected[0]);
                let (mut c1, mut c2) = self.crossover(problem, scope.rng(), a, b);
                self.mutate(problem, scope.rng(), &mut c1);
                self.mutate(problem, scope.rng(), &mut c2);
                next.push(c1);
                next.push(c2);
            }
            next.truncate(size);
            population = next;
        }

        let best = best.map(|(p, _)| p).unwrap_or_default();
        info!(
            event = "phase_end",
            strategy = "genetic",
            antennas = best.len(),
            total_cost = best.total_cost(problem.catalog()),
        );
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellforge_core::ProblemSpec;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn problem(budget: Option<u64>, max: Option<usize>) -> Problem {
        let mut spec = ProblemSpec::new(30, 30).with_houses([(3, 3), (10, 20), (25, 5), (20, 25)]);
        if let Some(b) = budget {
            spec = spec.with_budget(b);
        }
        if let Some(m) = max {
            spec = spec.with_max_antennas(m);
        }
        spec.build().unwrap()
    }

    #[test]
    fn test_random_chromosomes_are_repaired() {
        let problem = problem(Some(6_000), Some(3));
        let genetic = Genetic::new(GeneticConfig::default(), &ObjectiveConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..50 {
            let c = genetic.random_chromosome(&problem, &mut rng);
            assert!(c.len() <= 3);
            assert!(c.total_cost(problem.catalog()) <= 6_000);
            assert!(c.has_unique_positions());
            assert!(c.iter().all(|a| is_useful(&problem, a)));
        }
    }

    #[test]
    fn test_crossover_children_are_repaired() {
        let problem = problem(Some(30_000), Some(4));
        let config = GeneticConfig {
            crossover_rate: 1.0,
            ..GeneticConfig::default()
        };
        let genetic = Genetic::new(config, &ObjectiveConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        for _ in 0..50 {
            let a = genetic.random_chromosome(&problem, &mut rng);
            let b = genetic.random_chromosome(&problem, &mut rng);
            let (c1, c2) = genetic.crossover(&problem, &mut rng, &a, &b);
            for child in [c1, c2] {
                assert!(child.len() <= 4);
                assert!(child.total_cost(problem.catalog()) <= 30_000);
                assert!(child.has_unique_positions());
            }
        }
    }

    #[test]
    fn test_enforce_budget_drops_most_expensive_first() {
        let problem = problem(Some(6_000), None);
        let mut placement = Placement::from_antennas(vec![
            PlacedAntenna::new(Position::new(3, 4), 0),
            PlacedAntenna::new(Position::new(3, 5), 3),
            PlacedAntenna::new(Position::new(3, 6), 1),
        ]);
        enforce_budget(&problem, &mut placement);
        assert_eq!(placement.len(), 2);
        assert_eq!(placement.total_cost(problem.catalog()), 6_000);
    }

    #[test]
    fn test_tournament_picks_fittest_of_full_field() {
        let config = GeneticConfig {
            population_size: 4,
            tournament_size: 4,
            ..GeneticConfig::default()
        };
        let genetic = Genetic::new(config, &ObjectiveConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let fitnesses = [1.0, f64::NEG_INFINITY, 7.5, 3.0];
        assert_eq!(genetic.tournament(&mut rng, &fitnesses), 2);
    }
}
