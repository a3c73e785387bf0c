use std::collections::HashSet;

use rand::Rng;
use rand::seq::IteratorRandom;

use super::state::{Bounds, Position};

/// Random draws tried before falling back to a full scan of the board
pub const FOOD_SAMPLE_ATTEMPTS: usize = 100;

/// Pick a uniformly random playable cell that is not in `excluded`.
///
/// Rejection sampling is tried first; once the board is crowded enough that
/// it keeps missing, every free cell is enumerated and one is drawn from that
/// list. Returns `None` only when no free cell exists.
pub fn place<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: &Bounds,
    excluded: &HashSet<Position>,
) -> Option<Position> {
    if bounds.cell_count() == 0 {
        return None;
    }

    for _ in 0..FOOD_SAMPLE_ATTEMPTS {
        let x = rng.gen_range(0..bounds.width);
        let y = rng.gen_range(bounds.min_row..bounds.height);
        let pos = Position::new(x, y);

        if !excluded.contains(&pos) {
            return Some(pos);
        }
    }

    log::debug!(
        "Food sampling missed {} times, scanning {} cells",
        FOOD_SAMPLE_ATTEMPTS,
        bounds.cell_count()
    );
    bounds
        .cells()
        .filter(|pos| !excluded.contains(pos))
        .choose(rng)
}
