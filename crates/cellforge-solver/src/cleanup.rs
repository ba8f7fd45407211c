//! Final removal of antennas that reach no house.

use cellforge_core::{Placement, Problem};
use cellforge_scoring::is_useful;
use tracing::{debug, info};

/// Drops every antenna whose disc contains no house. Returns how many were removed.
///
/// Runs once per strategy, on the final placement, before statistics.
pub fn remove_useless(problem: &Problem, placement: &mut Placement) -> usize {
    let before = placement.len();
    placement.retain(|antenna| {
        let useful = is_useful(problem, antenna);
        if !useful {
            debug!(
                event = "antenna_removed",
                x = antenna.position.x,
                y = antenna.position.y,
                kind = %problem.spec(antenna.kind).name,
            );
        }
        useful
    });
    let removed = before - placement.len();
    if removed > 0 {
        info!(event = "cleanup", removed, remaining = placement.len());
    }
    removed
}
