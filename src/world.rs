//! The generation engine.
//!
//! Only live cells are stored. A generation visits the live cells and their neighbors, so the
//! cost of a step grows with the population rather than with the area of the domain.

use std::collections::HashSet;

use crate::grid;
use crate::grid::Coord;

/// Every live cell of one generation. Callers must only insert in-bounds coordinates.
pub type LiveSet = HashSet<Coord>;

/// The cells that may be alive in the next generation: all live cells and their neighbors.
pub fn candidates(live: &LiveSet) -> LiveSet {
    let mut cand = LiveSet::with_capacity(live.len() * 9);
    cand.extend(live.iter().copied());

    for &c in live {
        cand.extend(grid::neighbors(c));
    }

    cand
}

/// Number of live cells around `c`.
pub fn live_neighbors(live: &LiveSet, c: Coord) -> usize {
    grid::neighbors(c).filter(|n| live.contains(n)).count()
}

/// Life rule B3/S23: a live cell survives with 2 or 3 live neighbors, a dead one is born with 3.
pub const fn survives(alive: bool, n: usize) -> bool {
    matches!((alive, n), (true, 2 | 3) | (false, 3))
}

/// Compute the next generation.
///
/// Every candidate is judged against `live` only, never against the generation being built, so
/// the whole board updates at once.
pub fn step(live: &LiveSet) -> LiveSet {
    candidates(live)
        .into_iter()
        .filter(|&c| survives(live.contains(&c), live_neighbors(live, c)))
        .collect()
}
