//! Structural checks shared by solver tests.

use cellforge_core::{Placement, Problem};

/// Panics unless the placement has unique positions, every antenna is on a
/// valid site and the antenna cap holds.
pub fn assert_well_formed(problem: &Problem, placement: &Placement) {
    assert!(
        placement.has_unique_positions(),
        "duplicate positions in {placement:?}"
    );
    for antenna in placement.iter() {
        assert!(
            problem.is_valid_site(antenna.position),
            "antenna on invalid site {:?}",
            antenna.position
        );
    }
    assert!(
        problem.count_allowed(placement.len()),
        "{} antennas exceed the cap",
        placement.len()
    );
}

/// Panics unless every antenna reaches at least one house.
pub fn assert_cleaned(problem: &Problem, placement: &Placement) {
    for antenna in placement.iter() {
        assert!(
            problem.covers_any_house(antenna.position, antenna.kind),
            "antenna at {:?} covers no house",
            antenna.position
        );
    }
}
