//! Seeds the initial global grid. Ported from `create_glider_gun`,
//! `create_glider`, `create_r_pentomino`, and the `random` branch of
//! `initialize_grid` in `life_mpi.py`; cell offsets are placed with
//! toroidal wrap so a pattern near an edge never goes out of bounds.

use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

use crate::grid::GridBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Pattern {
    GliderGun,
    Random,
    Glider,
    RPentomino,
}

impl Pattern {
    pub fn name(self) -> &'static str {
        match self {
            Pattern::GliderGun => "glider_gun",
            Pattern::Random => "random",
            Pattern::Glider => "glider",
            Pattern::RPentomino => "r_pentomino",
        }
    }
}

fn set_wrapped(grid: &mut GridBuffer, y: i64, x: i64) {
    let ny = grid.rows() as i64;
    let nx = grid.cols() as i64;
    let wy = y.rem_euclid(ny) as usize;
    let wx = x.rem_euclid(nx) as usize;
    grid.set(wy, wx, 1);
}

/// The 36-cell Gosper glider gun, anchored with its top-left corner at `(oy, ox)`.
fn place_glider_gun(grid: &mut GridBuffer, oy: i64, ox: i64) {
    const CELLS: &[(i64, i64)] = &[
        (5, 1), (5, 2), (6, 1), (6, 2),
        (5, 11), (6, 11), (7, 11),
        (4, 12), (8, 12),
        (3, 13), (9, 13),
        (3, 14), (9, 14),
        (6, 15),
        (4, 16), (8, 16),
        (5, 17), (6, 17), (7, 17),
        (6, 18),
        (3, 21), (4, 21), (5, 21),
        (3, 22), (4, 22), (5, 22),
        (2, 23), (6, 23),
        (1, 25), (2, 25), (6, 25), (7, 25),
        (3, 35), (4, 35),
        (3, 36), (4, 36),
    ];
    for &(dy, dx) in CELLS {
        set_wrapped(grid, oy + dy, ox + dx);
    }
}

fn place_glider(grid: &mut GridBuffer, oy: i64, ox: i64) {
    const CELLS: &[(i64, i64)] = &[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)];
    for &(dy, dx) in CELLS {
        set_wrapped(grid, oy + dy, ox + dx);
    }
}

fn place_r_pentomino(grid: &mut GridBuffer, oy: i64, ox: i64) {
    const CELLS: &[(i64, i64)] = &[(0, 1), (0, 2), (1, 0), (1, 1), (2, 1)];
    for &(dy, dx) in CELLS {
        set_wrapped(grid, oy + dy, ox + dx);
    }
}

fn place_random(grid: &mut GridBuffer, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    for y in 0..grid.rows() {
        for x in 0..grid.cols() {
            // matches the reference's 10% initial-alive density
            if rng.gen_bool(0.1) {
                grid.set(y, x, 1);
            }
        }
    }
}

/// Builds the full `(ny, nx)` global grid for `pattern`, seeded with `seed`
/// where randomness is involved. Always runs on the whole grid (never per
/// patch), so the result — and hence the simulation — is independent of
/// how many ranks the run uses.
pub fn seed(ny: usize, nx: usize, pattern: Pattern, seed: u64) -> GridBuffer {
    let mut grid = GridBuffer::new(ny, nx);
    match pattern {
        Pattern::GliderGun => place_glider_gun(&mut grid, 0, 0),
        Pattern::Glider => place_glider(&mut grid, (ny / 2) as i64, (nx / 2) as i64),
        Pattern::RPentomino => place_r_pentomino(&mut grid, (ny / 2) as i64, (nx / 2) as i64),
        Pattern::Random => place_random(&mut grid, seed),
    }
    grid
}
