//! Lazy priority index over greedy candidates.
//!
//! Candidates are built from inverse coverage: for every house and every
//! antenna kind, each valid site whose disc reaches the house. Sites that
//! reach no house are never candidates.
//!
//! Keys in the heap are upper bounds. Placing an antenna only shrinks the
//! gain of other candidates, and scorers are monotone in the gain, so a key
//! computed earlier can never understate the current score. Popping a key,
//! recomputing it and re-inserting it when it dropped therefore yields the
//! true best candidate as soon as a recomputed score matches its key.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use cellforge_core::{PlacedAntenna, Position, Problem};
use cellforge_scoring::{CandidateGain, CandidateScorer};
use smallvec::SmallVec;

/// House ids reached by one candidate. Most sites reach only a few houses.
type HouseIds = SmallVec<[usize; 4]>;

/// One site and kind with the houses it reaches.
#[derive(Debug, Clone)]
struct Candidate {
    antenna: PlacedAntenna,
    /// Ascending house ids.
    houses: HouseIds,
}

#[derive(Debug, Clone, Copy)]
struct HeapEntry {
    score: f64,
    candidate: usize,
    antenna: PlacedAntenna,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    // Higher score first; ties go to the smaller position, then smaller kind.
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.antenna.cmp(&self.antenna))
    }
}

/// An accepted greedy choice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GreedyStep {
    pub antenna: PlacedAntenna,
    pub score: f64,
    pub gain: CandidateGain,
}

/// Incremental greedy state: covered houses and cells, occupied sites, cost.
#[derive(Debug)]
pub struct CandidateIndex<'p, S> {
    problem: &'p Problem,
    scorer: S,
    candidates: Vec<Candidate>,
    heap: BinaryHeap<HeapEntry>,
    lazy: bool,
    covered_houses: Vec<bool>,
    covered_cells: Vec<bool>,
    occupied: HashSet<Position>,
    users_covered: u64,
    total_cost: u64,
    placed: usize,
    recomputations: u64,
}

impl<'p, S: CandidateScorer> CandidateIndex<'p, S> {
    /// Builds the index. With `lazy` false every step rescans all
    /// candidates instead of using the heap.
    pub fn new(problem: &'p Problem, scorer: S, lazy: bool) -> Self {
        let mut reach: HashMap<PlacedAntenna, HouseIds> = HashMap::new();
        for (house_id, &house) in problem.houses().iter().enumerate() {
            for kind in problem.catalog().kinds() {
                // Discs are symmetric: sites reaching the house are the disc around it.
                for &(dx, dy) in problem.disc(kind) {
                    let site = house.offset(dx, dy);
                    if problem.is_valid_site(site) {
                        reach
                            .entry(PlacedAntenna::new(site, kind))
                            .or_default()
                            .push(house_id);
                    }
                }
            }
        }

        let mut candidates: Vec<Candidate> = reach
            .into_iter()
            .map(|(antenna, houses)| Candidate { antenna, houses })
            .collect();
        candidates.sort_unstable_by_key(|c| c.antenna);

        let uses_cells = scorer.uses_cells();
        let mut index = Self {
            problem,
            scorer,
            candidates,
            heap: BinaryHeap::new(),
            lazy,
            covered_houses: vec![false; problem.house_count()],
            covered_cells: if uses_cells {
                vec![false; problem.grid().area()]
            } else {
                Vec::new()
            },
            occupied: HashSet::new(),
            users_covered: 0,
            total_cost: 0,
            placed: 0,
            recomputations: 0,
        };

        if lazy {
            let entries: Vec<HeapEntry> = (0..index.candidates.len())
                .filter_map(|i| {
                    let score = index.scorer.score(&index.gain(i));
                    (score > 0.0).then_some(HeapEntry {
                        score,
                        candidate: i,
                        antenna: index.candidates[i].antenna,
                    })
                })
                .collect();
            index.heap = BinaryHeap::from(entries);
        }
        index
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    pub fn users_covered(&self) -> u64 {
        self.users_covered
    }

    pub fn total_cost(&self) -> u64 {
        self.total_cost
    }

    pub fn placed(&self) -> usize {
        self.placed
    }

    /// Score evaluations performed after construction.
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }

    /// Marginal gain of a candidate against the current covered set.
    fn gain(&self, candidate: usize) -> CandidateGain {
        let problem = self.problem;
        let c = &self.candidates[candidate];
        let spec = problem.spec(c.antenna.kind);
        let new_houses = c.houses.iter().filter(|&&h| !self.covered_houses[h]).count() as u64;
        let new_cells = if self.covered_cells.is_empty() {
            0
        } else {
            let grid = problem.grid();
            problem
                .cells_within(c.antenna.position, c.antenna.kind)
                .filter(|&cell| !problem.is_house(cell) && !self.covered_cells[grid.index_of(cell)])
                .count() as u64
        };
        CandidateGain {
            new_users: new_houses * problem.users_per_house() as u64,
            new_cells,
            cost: spec.cost,
            capacity: spec.capacity,
        }
    }

    /// Returns true if the candidate may still be placed at all.
    ///
    /// Sites only fill up and cost only grows, so a candidate failing this
    /// check never passes it again.
    fn is_placeable(&self, candidate: usize) -> bool {
        let antenna = self.candidates[candidate].antenna;
        !self.occupied.contains(&antenna.position)
            && self
                .problem
                .within_budget(self.total_cost + self.problem.spec(antenna.kind).cost)
    }

    /// The best placeable candidate with a positive score, if any.
    pub fn next_best(&mut self) -> Option<GreedyStep> {
        if self.lazy {
            self.next_best_lazy()
        } else {
            self.next_best_scan()
        }
    }

    fn next_best_lazy(&mut self) -> Option<GreedyStep> {
        while let Some(entry) = self.heap.pop() {
            if !self.is_placeable(entry.candidate) {
                continue;
            }
            let gain = self.gain(entry.candidate);
            let score = self.scorer.score(&gain);
            self.recomputations += 1;
            if score <= 0.0 {
                continue;
            }
            if score < entry.score {
                self.heap.push(HeapEntry { score, ..entry });
                continue;
            }
            debug_assert!(score <= entry.score, "candidate score grew from a stale key");
            return Some(GreedyStep {
                antenna: entry.antenna,
                score,
                gain,
            });
        }
        None
    }

    fn next_best_scan(&mut self) -> Option<GreedyStep> {
        let mut best: Option<GreedyStep> = None;
        for i in 0..self.candidates.len() {
            if !self.is_placeable(i) {
                continue;
            }
            let gain = self.gain(i);
            let score = self.scorer.score(&gain);
            self.recomputations += 1;
            // Candidates are sorted, so strict improvement keeps the smallest on ties.
            if score > 0.0 && best.map_or(true, |b| score > b.score) {
                best = Some(GreedyStep {
                    antenna: self.candidates[i].antenna,
                    score,
                    gain,
                });
            }
        }
        best
    }

    /// Commits a step returned by [`next_best`](Self::next_best).
    pub fn accept(&mut self, step: &GreedyStep) {
        let problem = self.problem;
        let antenna = step.antenna;
        for id in problem.houses_within(antenna.position, antenna.kind) {
            self.covered_houses[id] = true;
        }
        if !self.covered_cells.is_empty() {
            let grid = problem.grid();
            for cell in problem.cells_within(antenna.position, antenna.kind) {
                self.covered_cells[grid.index_of(cell)] = true;
            }
        }
        self.occupied.insert(antenna.position);
        self.users_covered += step.gain.new_users;
        self.total_cost += step.gain.cost;
        self.placed += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellforge_core::ProblemSpec;
    use cellforge_scoring::{CostPerUser, MaxCoverage};

    fn run<S: CandidateScorer>(index: &mut CandidateIndex<'_, S>) -> Vec<GreedyStep> {
        let mut steps = Vec::new();
        while let Some(step) = index.next_best() {
            index.accept(&step);
            steps.push(step);
        }
        steps
    }

    #[test]
    fn test_single_house_takes_adjacent_femto() {
        let problem = ProblemSpec::new(10, 10)
            .with_houses([(5, 5)])
            .build()
            .unwrap();
        let mut index = CandidateIndex::new(&problem, CostPerUser, true);
        let steps = run(&mut index);
        assert_eq!(steps.len(), 1);
        let antenna = steps[0].antenna;
        assert_eq!(problem.spec(antenna.kind).name, "Femto");
        assert_eq!(antenna.position.distance_squared(Position::new(5, 5)), 1);
        assert_eq!(index.users_covered(), 20);
    }

    #[test]
    fn test_lazy_matches_full_scan() {
        let problem = ProblemSpec::new(30, 30)
            .with_houses([(2, 2), (3, 2), (10, 10), (11, 12), (25, 25), (28, 3)])
            .build()
            .unwrap();
        let lazy = run(&mut CandidateIndex::new(&problem, CostPerUser, true));
        let scan = run(&mut CandidateIndex::new(&problem, CostPerUser, false));
        let users = |steps: &[GreedyStep]| steps.iter().map(|s| s.gain.new_users).sum::<u64>();
        let cost = |steps: &[GreedyStep]| steps.iter().map(|s| s.gain.cost).sum::<u64>();
        assert_eq!(users(&lazy), users(&scan));
        assert_eq!(cost(&lazy), cost(&scan));
        let lazy_scores: Vec<f64> = lazy.iter().map(|s| s.score).collect();
        let scan_scores: Vec<f64> = scan.iter().map(|s| s.score).collect();
        assert_eq!(lazy_scores, scan_scores);
    }

    #[test]
    fn test_scores_never_increase() {
        let problem = ProblemSpec::new(25, 25)
            .with_houses([(1, 1), (4, 4), (12, 12), (20, 3), (22, 22)])
            .build()
            .unwrap();
        let steps = run(&mut CandidateIndex::new(&problem, MaxCoverage, true));
        assert!(!steps.is_empty());
        for pair in steps.windows(2) {
            assert!(pair[1].score <= pair[0].score);
        }
    }

    #[test]
    fn test_budget_skips_expensive_candidates() {
        let problem = ProblemSpec::new(40, 40)
            .with_houses([(2, 2), (37, 37)])
            .with_budget(2_000)
            .build()
            .unwrap();
        let mut index = CandidateIndex::new(&problem, CostPerUser, true);
        let steps = run(&mut index);
        assert_eq!(steps.len(), 2);
        assert!(index.total_cost() <= 2_000);
    }

    #[test]
    fn test_candidate_houses_match_coverage() {
        let problem = ProblemSpec::new(30, 30)
            .with_houses([(2, 2), (3, 2), (10, 10), (11, 12)])
            .build()
            .unwrap();
        let index = CandidateIndex::new(&problem, CostPerUser, true);
        assert!(index.candidate_count() > 0);
        for candidate in &index.candidates {
            let antenna = candidate.antenna;
            let mut expected = problem.houses_within(antenna.position, antenna.kind);
            expected.sort_unstable();
            assert_eq!(candidate.houses.as_slice(), expected.as_slice(), "{:?}", antenna);
        }
    }

    #[test]
    fn test_no_houses_no_candidates() {
        let problem = ProblemSpec::new(10, 10).build().unwrap();
        let mut index = CandidateIndex::new(&problem, CostPerUser, true);
        assert_eq!(index.candidate_count(), 0);
        assert!(index.next_best().is_none());
    }
}
