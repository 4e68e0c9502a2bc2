//! Maps a global grid and process count to a per-rank patch plan.
//!
//! Ported from `life_mpi.py`/`life_mpi_2d.py`'s row/column distribution
//! (`rows_per_rank = ny // size`, remainder handed to the first ranks).

use crate::error::{Result, StencilError};

/// Which axis layout a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Layout {
    /// P x 1 row strips.
    #[value(name = "1d")]
    RowStrip,
    /// Py x Px balanced Cartesian grid.
    #[value(name = "2d")]
    Cartesian,
}

/// One rank's slice of the global grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchPlan {
    pub py: usize,
    pub px: usize,
    pub row_start: usize,
    pub row_count: usize,
    pub col_start: usize,
    pub col_count: usize,
}

/// The full decomposition: process-grid shape plus every rank's patch.
#[derive(Debug, Clone)]
pub struct DecompositionPlan {
    pub dims: (usize, usize), // (Py, Px)
    pub patches: Vec<PatchPlan>,
    pub layout: Layout,
}

/// Splits `total` into `parts` counts and start offsets per the remainder
/// rule: the first `total % parts` parts get one extra unit.
fn remainder_split(total: usize, parts: usize) -> Vec<(usize, usize)> {
    let base = total / parts;
    let rem = total % parts;
    let mut out = Vec::with_capacity(parts);
    let mut start = 0;
    for i in 0..parts {
        let count = if i < rem { base + 1 } else { base };
        out.push((start, count));
        start += count;
    }
    out
}

/// Factors `p` into `(py, px)` with `py * px == p` and `|py - px|` minimal,
/// ties broken toward `py <= px`.
fn balanced_factors(p: usize) -> (usize, usize) {
    let mut best = (1, p);
    let mut py = 1;
    while py * py <= p {
        if p % py == 0 {
            best = (py, p / py);
        }
        py += 1;
    }
    best
}

impl DecompositionPlan {
    pub fn plan(ny: usize, nx: usize, p: usize, layout: Layout) -> Result<Self> {
        if p == 0 {
            return Err(StencilError::config("process count must be positive"));
        }
        let (py, px) = match layout {
            Layout::RowStrip => (p, 1),
            Layout::Cartesian => balanced_factors(p),
        };
        if ny < py {
            return Err(StencilError::config(format!(
                "ny={ny} smaller than row-strip count Py={py}; a patch would be empty"
            )));
        }
        if nx < px {
            return Err(StencilError::config(format!(
                "nx={nx} smaller than column-strip count Px={px}; a patch would be empty"
            )));
        }

        let row_splits = remainder_split(ny, py);
        let col_splits = remainder_split(nx, px);

        let mut patches = Vec::with_capacity(p);
        for r in 0..py {
            for c in 0..px {
                let (row_start, row_count) = row_splits[r];
                let (col_start, col_count) = col_splits[c];
                patches.push(PatchPlan {
                    py: r,
                    px: c,
                    row_start,
                    row_count,
                    col_start,
                    col_count,
                });
            }
        }

        Ok(DecompositionPlan {
            dims: (py, px),
            patches,
            layout,
        })
    }

    /// Rank index for a given process-grid coordinate, row-major.
    pub fn rank_of(&self, py: usize, px: usize) -> usize {
        py * self.dims.1 + px
    }

    pub fn patch(&self, rank: usize) -> PatchPlan {
        self.patches[rank]
    }
}
