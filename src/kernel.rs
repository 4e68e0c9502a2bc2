//! The B3/S23 stencil: pure function of a cell and its eight neighbors at
//! the current time step, applied to every interior cell of a patch.

use crate::patch::Patch;

/// Survives on 2 or 3 live neighbors; born on exactly 3.
#[inline]
fn next_state(alive: u8, live_neighbors: u8) -> u8 {
    match (alive, live_neighbors) {
        (1, 2) | (1, 3) => 1,
        (0, 3) => 1,
        _ => 0,
    }
}

#[inline]
fn neighbor_sum(patch: &Patch, y: usize, x: usize) -> u8 {
    let yi = y as isize;
    let xi = x as isize;
    let mut sum = 0u8;
    for dy in [-1isize, 0, 1] {
        for dx in [-1isize, 0, 1] {
            if dy == 0 && dx == 0 {
                continue;
            }
            sum += patch.get_padded(yi + dy, xi + dx);
        }
    }
    sum
}

/// Advances `patch` by one generation in place. Requires the halo to have
/// already been refreshed for this step (see [`crate::halo::exchange`]).
pub fn step(patch: &mut Patch) {
    let rows = patch.rows();
    let cols = patch.cols();
    let mut next = vec![0u8; rows * cols];
    for y in 0..rows {
        for x in 0..cols {
            let alive = patch.get(y, x);
            let n = neighbor_sum(patch, y, x);
            next[y * cols + x] = next_state(alive, n);
        }
    }
    for y in 0..rows {
        patch.set_interior_row(y, &next[y * cols..(y + 1) * cols]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decomp::{Layout, PatchPlan};
    use crate::halo;
    use crate::topology::Topology;
    use crate::transport::local_transport::build_world;

    fn full_plan(rows: usize, cols: usize) -> PatchPlan {
        PatchPlan {
            py: 0,
            px: 0,
            row_start: 0,
            row_count: rows,
            col_start: 0,
            col_count: cols,
        }
    }

    /// Runs one generation on a single-rank patch, refreshing the halo
    /// (which wraps toroidally onto the patch's own opposite edges)
    /// before applying the kernel — the same sequence the driver uses.
    fn step_single_rank(patch: &mut Patch) {
        let topo = Topology::new(1, 1);
        let world = build_world(1);
        halo::exchange(patch, &topo, 0, &world[0]).unwrap();
        step(patch);
    }

    #[test]
    fn block_still_life_is_invariant() {
        let mut p = Patch::new(full_plan(6, 6), Layout::Cartesian);
        for (y, x) in [(2, 2), (2, 3), (3, 2), (3, 3)] {
            p.set(y, x, 1);
        }
        let before = p.to_interior_grid();
        step_single_rank(&mut p);
        assert_eq!(p.to_interior_grid(), before);
        assert_eq!(p.to_interior_grid().alive_count(), 4);
    }

    #[test]
    fn blinker_oscillates_with_period_two() {
        let mut p = Patch::new(full_plan(8, 8), Layout::Cartesian);
        for x in 3..6 {
            p.set(3, x, 1);
        }
        let before = p.to_interior_grid();
        step_single_rank(&mut p);
        assert_ne!(p.to_interior_grid(), before);
        assert_eq!(p.to_interior_grid().alive_count(), 3);
        step_single_rank(&mut p);
        assert_eq!(p.to_interior_grid(), before);
    }

    #[test]
    fn dead_cell_with_three_neighbors_is_born() {
        assert_eq!(next_state(0, 3), 1);
        assert_eq!(next_state(0, 2), 0);
        assert_eq!(next_state(0, 4), 0);
    }

    #[test]
    fn live_cell_survives_only_on_two_or_three() {
        assert_eq!(next_state(1, 1), 0);
        assert_eq!(next_state(1, 2), 1);
        assert_eq!(next_state(1, 3), 1);
        assert_eq!(next_state(1, 4), 0);
    }
}
