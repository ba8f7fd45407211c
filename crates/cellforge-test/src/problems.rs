//! Sample problem instances.
//!
//! All fixtures use the standard catalog and the default users per house
//! unless noted otherwise.

use cellforge_core::{Position, Problem, ProblemSpec};

/// Distance between neighbouring houses in [`far_apart_houses`].
///
/// Wider than two Pico radii, so no Femto or Pico reaches two houses.
pub const FAR_APART_SPACING: i32 = 15;

/// A 10×10 grid with one house at (5, 5).
pub fn single_house() -> Problem {
    ProblemSpec::new(10, 10)
        .with_houses([(5, 5)])
        .build()
        .expect("single_house fixture is valid")
}

/// A grid with no houses at all.
pub fn empty(width: u32, height: u32) -> Problem {
    ProblemSpec::new(width, height)
        .build()
        .expect("empty fixture is valid")
}

/// `count` houses on a diagonal, [`FAR_APART_SPACING`] cells apart, with
/// only Femto and Pico allowed.
///
/// With `budget`, the instance also carries that budget.
pub fn far_apart_houses(count: usize, budget: Option<u64>) -> Problem {
    let side = (count as u32 + 1) * FAR_APART_SPACING as u32;
    let houses: Vec<Position> = (1..=count as i32)
        .map(|i| Position::new(i * FAR_APART_SPACING, i * FAR_APART_SPACING))
        .collect();
    let mut spec = ProblemSpec::new(side, side)
        .with_houses(houses)
        .with_allowed_types(["Femto", "Pico"]);
    if let Some(b) = budget {
        spec = spec.with_budget(b);
    }
    spec.build().expect("far_apart_houses fixture is valid")
}

/// Three tight clusters of houses on a 60×60 grid.
pub fn clustered() -> Problem {
    let mut houses = Vec::new();
    for (cx, cy) in [(10, 10), (45, 15), (30, 48)] {
        for (dx, dy) in [(0, 0), (1, 0), (0, 2), (-2, 1), (2, -2)] {
            houses.push(Position::new(cx + dx, cy + dy));
        }
    }
    ProblemSpec::new(60, 60)
        .with_houses(houses)
        .build()
        .expect("clustered fixture is valid")
}

/// A 30×30 town with a budget and antenna cap tight enough to matter.
pub fn small_town() -> Problem {
    ProblemSpec::new(30, 30)
        .with_houses([
            (2, 3),
            (4, 4),
            (8, 20),
            (12, 12),
            (13, 14),
            (20, 5),
            (25, 25),
            (27, 18),
        ])
        .with_budget(40_000)
        .with_max_antennas(6)
        .build()
        .expect("small_town fixture is valid")
}
