//! Neighbor generation for the local-search strategies.
//!
//! Every generated move is doable: sites are on the grid, off houses and
//! unoccupied, and added or relocated antennas reach at least one house.
//! Adds and the initial seed are pre-checked against the budget; other moves
//! are not, the energy penalty handles those.

use cellforge_config::NeighborhoodConfig;
use cellforge_core::{KindId, PlacedAntenna, Placement, Position, Problem};
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::seq::IndexedRandom;
use rand::Rng;

use super::r#move::PlacementMove;

/// Draws allowed when a shake looks for a site.
const SHAKE_ATTEMPTS: usize = 10;

/// Extra ring distance searched past an antenna's radius when seeding.
const INITIAL_RING_SLACK: u32 = 5;

/// Kinds of random perturbation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Remove,
    Relocate,
    Retype,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Add,
        Operation::Remove,
        Operation::Relocate,
        Operation::Retype,
    ];
}

/// Generates moves around a placement.
#[derive(Debug, Clone)]
pub struct Neighborhood<'a> {
    problem: &'a Problem,
    config: &'a NeighborhoodConfig,
    weights: Option<WeightedIndex<u32>>,
}

impl<'a> Neighborhood<'a> {
    pub fn new(problem: &'a Problem, config: &'a NeighborhoodConfig) -> Self {
        Self {
            problem,
            config,
            weights: WeightedIndex::new(config.weights()).ok(),
        }
    }

    /// Uniform grid cell.
    pub fn random_site<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        let grid = self.problem.grid();
        Position::new(
            rng.random_range(0..grid.width()) as i32,
            rng.random_range(0..grid.height()) as i32,
        )
    }

    fn random_kind<R: Rng + ?Sized>(&self, rng: &mut R) -> KindId {
        rng.random_range(0..self.problem.catalog().len())
    }

    fn is_free_site(&self, placement: &Placement, pos: Position) -> bool {
        self.problem.is_valid_site(pos) && !placement.is_occupied(pos)
    }

    /// A random useful antenna that fits the budget, within `attempts` draws.
    pub fn random_add<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        placement: &Placement,
        current_cost: u64,
        attempts: usize,
    ) -> Option<PlacementMove> {
        if !self.problem.count_allowed(placement.len() + 1) {
            return None;
        }
        for _ in 0..attempts {
            let pos = self.random_site(rng);
            if !self.is_free_site(placement, pos) {
                continue;
            }
            let kind = self.random_kind(rng);
            if !self
                .problem
                .within_budget(current_cost + self.problem.spec(kind).cost)
            {
                continue;
            }
            if self.problem.covers_any_house(pos, kind) {
                return Some(PlacementMove::Add(PlacedAntenna::new(pos, kind)));
            }
        }
        None
    }

    /// Removes a random antenna, never the last one.
    pub fn random_remove<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        placement: &Placement,
    ) -> Option<PlacementMove> {
        if placement.len() <= 1 {
            return None;
        }
        Some(PlacementMove::Remove(rng.random_range(0..placement.len())))
    }

    /// Moves a random antenna to a random useful site.
    pub fn random_relocation<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        placement: &Placement,
        attempts: usize,
    ) -> Option<PlacementMove> {
        if placement.is_empty() {
            return None;
        }
        let index = rng.random_range(0..placement.len());
        let kind = placement.get(index).kind;
        for _ in 0..attempts {
            let to = self.random_site(rng);
            let mv = PlacementMove::Relocate { index, to };
            if mv.is_doable(self.problem, placement) && self.problem.covers_any_house(to, kind) {
                return Some(mv);
            }
        }
        None
    }

    /// Gives a random antenna a different random kind.
    pub fn random_retype<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        placement: &Placement,
    ) -> Option<PlacementMove> {
        let kinds = self.problem.catalog().len();
        if placement.is_empty() || kinds < 2 {
            return None;
        }
        let index = rng.random_range(0..placement.len());
        let current = placement.get(index).kind;
        let mut kind = rng.random_range(0..kinds - 1);
        if kind >= current {
            kind += 1;
        }
        Some(PlacementMove::Retype { index, kind })
    }

    fn perturb<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        op: Operation,
        placement: &Placement,
        current_cost: u64,
        attempts: usize,
    ) -> Option<PlacementMove> {
        match op {
            Operation::Add => self.random_add(rng, placement, current_cost, attempts),
            Operation::Remove => self.random_remove(rng, placement),
            Operation::Relocate => self.random_relocation(rng, placement, attempts),
            Operation::Retype => self.random_retype(rng, placement),
        }
    }

    /// One weighted random move, as used by simulated annealing.
    ///
    /// Returns `None` when the drawn operation finds nothing to do; the
    /// caller then evaluates the unchanged placement.
    pub fn random_move<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        placement: &Placement,
        current_cost: u64,
    ) -> Option<PlacementMove> {
        let weights = self.weights.as_ref()?;
        let op = Operation::ALL[weights.sample(rng)];
        self.perturb(rng, op, placement, current_cost, self.config.random_attempts)
    }

    /// Applies `k` independent uniform perturbations.
    ///
    /// An empty placement gets a random useful antenna instead.
    pub fn shake<R: Rng + ?Sized>(&self, rng: &mut R, placement: &Placement, k: usize) -> Placement {
        let mut result = placement.clone();
        for _ in 0..k {
            let cost = result.total_cost(self.problem.catalog());
            let mv = if result.is_empty() {
                self.random_add(rng, &result, cost, SHAKE_ATTEMPTS)
            } else {
                let op = *Operation::ALL.choose(rng).unwrap_or(&Operation::Add);
                self.perturb(rng, op, &result, cost, SHAKE_ATTEMPTS)
            };
            if let Some(mv) = mv {
                mv.apply_in_place(&mut result);
            }
        }
        result
    }

    /// Sampled neighborhood for best-of-neighbors strategies.
    ///
    /// `add_samples` random sites, each tried with every kind; every removal
    /// while more than one antenna remains; `move_samples_per_antenna`
    /// random relocations per antenna; and every retype.
    pub fn sampled_moves<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        placement: &Placement,
        current_cost: u64,
    ) -> Vec<PlacementMove> {
        let problem = self.problem;
        let catalog = problem.catalog();
        let mut moves = Vec::new();

        if problem.count_allowed(placement.len() + 1) {
            for _ in 0..self.config.add_samples {
                let pos = self.random_site(rng);
                if !self.is_free_site(placement, pos) {
                    continue;
                }
                for (kind, spec) in catalog.iter() {
                    if problem.within_budget(current_cost + spec.cost)
                        && problem.covers_any_house(pos, kind)
                    {
                        moves.push(PlacementMove::Add(PlacedAntenna::new(pos, kind)));
                    }
                }
            }
        }

        if placement.len() > 1 {
            moves.extend((0..placement.len()).map(PlacementMove::Remove));
        }

        for (index, antenna) in placement.iter().enumerate() {
            for _ in 0..self.config.move_samples_per_antenna {
                let to = self.random_site(rng);
                let mv = PlacementMove::Relocate { index, to };
                if mv.is_doable(problem, placement) && problem.covers_any_house(to, antenna.kind) {
                    moves.push(mv);
                }
            }
        }

        for (index, antenna) in placement.iter().enumerate() {
            moves.extend(
                catalog
                    .kinds()
                    .filter(|&k| k != antenna.kind)
                    .map(|kind| PlacementMove::Retype { index, kind }),
            );
        }

        moves
    }

    /// Seeds a local search with antennas near random houses.
    ///
    /// Each attempt picks a house and a kind (the largest with probability
    /// `large_bias`, otherwise uniform), then searches expanding rings around
    /// the house for a free site. At most `max_initial` antennas are placed,
    /// capped by the instance's antenna limit. An attempt whose kind would
    /// take the seed over budget is skipped.
    pub fn initial_placement<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        max_initial: usize,
        large_bias: f64,
    ) -> Placement {
        let problem = self.problem;
        let mut placement = Placement::new();
        let target = problem
            .max_antennas()
            .map_or(max_initial, |m| m.min(max_initial));
        let Some(largest) = problem.catalog().largest() else {
            return placement;
        };
        if problem.houses().is_empty() {
            return placement;
        }

        let grid = problem.grid();
        let ring_limit = grid.width().max(grid.height());
        let max_attempts = target * 10;
        let mut attempts = 0;
        let mut cost = 0;

        while placement.len() < target && attempts < max_attempts {
            attempts += 1;
            let Some(&house) = problem.houses().choose(rng) else {
                break;
            };
            let kind = if rng.random::<f64>() < large_bias {
                largest
            } else {
                self.random_kind(rng)
            };
            let spec = problem.spec(kind);
            if !problem.within_budget(cost + spec.cost) {
                continue;
            }
            let rings = (spec.radius + INITIAL_RING_SLACK).min(ring_limit);

            for ring in 0..rings {
                let candidates = ring_sites(house, ring)
                    .filter(|&pos| self.is_free_site(&placement, pos))
                    .collect::<Vec<_>>();
                if let Some(&pos) = candidates.choose(rng) {
                    placement.push(PlacedAntenna::new(pos, kind));
                    cost += spec.cost;
                    break;
                }
            }
        }
        placement
    }
}

/// Cells whose squared distance from `center` lies in `[r², (r + 1)²]`, row-major.
fn ring_sites(center: Position, ring: u32) -> impl Iterator<Item = Position> {
    let r = ring as i64;
    let inner = r * r;
    let outer = (r + 1) * (r + 1);
    let reach = ring as i32;
    (-reach..=reach).flat_map(move |dx| {
        (-reach..=reach).filter_map(move |dy| {
            let d2 = (dx as i64).pow(2) + (dy as i64).pow(2);
            (inner <= d2 && d2 <= outer).then_some(center.offset(dx, dy))
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellforge_core::ProblemSpec;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn problem() -> Problem {
        ProblemSpec::new(20, 20)
            .with_houses([(3, 3), (15, 15), (10, 4)])
            .build()
            .unwrap()
    }

    fn assert_well_formed(problem: &Problem, placement: &Placement) {
        assert!(placement.has_unique_positions());
        for antenna in placement {
            assert!(problem.is_valid_site(antenna.position), "{:?}", antenna);
        }
    }

    #[test]
    fn test_ring_sites_include_center_only_for_ring_zero() {
        let ring: Vec<_> = ring_sites(Position::new(5, 5), 0).collect();
        assert!(ring.contains(&Position::new(5, 5)));
        assert!(ring.contains(&Position::new(5, 6)));
        assert!(!ring_sites(Position::new(5, 5), 2).any(|p| p == Position::new(5, 5)));
    }

    #[test]
    fn test_initial_placement_is_well_formed() {
        let problem = problem();
        let config = NeighborhoodConfig::default();
        let hood = Neighborhood::new(&problem, &config);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let placement = hood.initial_placement(&mut rng, 5, 0.5);
        assert!(!placement.is_empty());
        assert!(placement.len() <= 5);
        assert_well_formed(&problem, &placement);
    }

    #[test]
    fn test_initial_placement_respects_antenna_cap() {
        let problem = ProblemSpec::new(20, 20)
            .with_houses([(3, 3), (15, 15)])
            .with_max_antennas(2)
            .build()
            .unwrap();
        let config = NeighborhoodConfig::default();
        let hood = Neighborhood::new(&problem, &config);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(hood.initial_placement(&mut rng, 10, 0.0).len() <= 2);
    }

    #[test]
    fn test_initial_placement_fits_budget() {
        // Room for two Femtos or one Pico; the large bias keeps drawing Macros.
        let problem = ProblemSpec::new(30, 30)
            .with_houses([(3, 3), (15, 15), (26, 8)])
            .with_budget(5_000)
            .build()
            .unwrap();
        let config = NeighborhoodConfig::default();
        let hood = Neighborhood::new(&problem, &config);
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let placement = hood.initial_placement(&mut rng, 5, 0.9);
            assert!(placement.total_cost(problem.catalog()) <= 5_000, "seed {seed}");
            assert_well_formed(&problem, &placement);
        }
    }

    #[test]
    fn test_sampled_moves_are_doable() {
        let problem = problem();
        let config = NeighborhoodConfig::default();
        let hood = Neighborhood::new(&problem, &config);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let placement = hood.initial_placement(&mut rng, 3, 0.0);
        let cost = placement.total_cost(problem.catalog());

        let moves = hood.sampled_moves(&mut rng, &placement, cost);
        assert!(!moves.is_empty());
        for mv in moves {
            assert!(mv.is_doable(&problem, &placement), "{:?}", mv);
            assert_well_formed(&problem, &mv.apply(&placement));
        }
    }

    #[test]
    fn test_random_add_respects_budget() {
        let problem = ProblemSpec::new(20, 20)
            .with_houses([(3, 3)])
            .with_budget(1_000)
            .build()
            .unwrap();
        let config = NeighborhoodConfig::default();
        let hood = Neighborhood::new(&problem, &config);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..50 {
            if let Some(PlacementMove::Add(antenna)) =
                hood.random_add(&mut rng, &Placement::new(), 0, 200)
            {
                assert_eq!(problem.spec(antenna.kind).name, "Femto");
            }
        }
    }

    #[test]
    fn test_shake_keeps_placement_well_formed() {
        let problem = problem();
        let config = NeighborhoodConfig::default();
        let hood = Neighborhood::new(&problem, &config);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut placement = Placement::new();
        for k in 1..=3 {
            placement = hood.shake(&mut rng, &placement, k);
            assert_well_formed(&problem, &placement);
        }
    }

    #[test]
    fn test_random_retype_changes_kind() {
        let problem = problem();
        let config = NeighborhoodConfig::default();
        let hood = Neighborhood::new(&problem, &config);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let placement = Placement::from_antennas(vec![PlacedAntenna::new(Position::new(3, 4), 2)]);
        for _ in 0..20 {
            match hood.random_retype(&mut rng, &placement) {
                Some(PlacementMove::Retype { kind, .. }) => assert_ne!(kind, 2),
                other => panic!("unexpected {:?}", other),
            }
        }
    }
}
