//! Dense byte-valued grid storage shared by the global grid (root only) and
//! per-rank patches (halo-padded).

use crate::error::{Result, StencilError};

/// A row-major grid of `{0, 1}`-valued cells.
///
/// `GridBuffer` makes no assumption about whether it represents a bare
/// global grid or a halo-padded patch; callers that need halo semantics
/// layer that on top (see [`crate::distributor::Patch`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridBuffer {
    rows: usize,
    cols: usize,
    cells: Vec<u8>,
}

impl GridBuffer {
    pub fn new(rows: usize, cols: usize) -> Self {
        GridBuffer {
            rows,
            cols,
            cells: vec![0u8; rows * cols],
        }
    }

    pub fn from_cells(rows: usize, cols: usize, cells: Vec<u8>) -> Result<Self> {
        if cells.len() != rows * cols {
            return Err(StencilError::internal(format!(
                "grid buffer shape mismatch: expected {} cells for {}x{}, got {}",
                rows * cols,
                rows,
                cols,
                cells.len()
            )));
        }
        Ok(GridBuffer { rows, cols, cells })
    }

    /// Builds an all-dead `rows x cols` grid with exactly the given cells
    /// set alive, for tests and patterns that need to seed an exact layout
    /// (a still life, a specific oscillator phase) rather than a named one.
    pub fn with_live_cells(rows: usize, cols: usize, live: &[(usize, usize)]) -> Self {
        let mut grid = GridBuffer::new(rows, cols);
        for &(y, x) in live {
            grid.set(y, x, 1);
        }
        grid
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, y: usize, x: usize) -> u8 {
        debug_assert!(y < self.rows && x < self.cols, "index out of bounds");
        self.cells[y * self.cols + x]
    }

    #[inline]
    pub fn set(&mut self, y: usize, x: usize, v: u8) {
        debug_assert!(y < self.rows && x < self.cols, "index out of bounds");
        self.cells[y * self.cols + x] = v;
    }

    pub fn row(&self, y: usize) -> &[u8] {
        &self.cells[y * self.cols..(y + 1) * self.cols]
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        &mut self.cells[y * self.cols..(y + 1) * self.cols]
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.cells
    }

    pub fn as_slice_mut(&mut self) -> &mut [u8] {
        &mut self.cells
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.cells
    }

    /// Count of live cells, used for the snapshot `checksum`/`alive_cells` fields.
    pub fn alive_count(&self) -> u64 {
        self.cells.iter().map(|&c| c as u64).sum()
    }

    /// Copies a rectangular subregion `[y0, y0+h) x [x0, x0+w)` out as a new buffer.
    pub fn subregion(&self, y0: usize, x0: usize, h: usize, w: usize) -> GridBuffer {
        let mut out = GridBuffer::new(h, w);
        for i in 0..h {
            out.row_mut(i).copy_from_slice(&self.row(y0 + i)[x0..x0 + w]);
        }
        out
    }

    /// Writes `src` into this buffer at `(y0, x0)`.
    pub fn paste(&mut self, y0: usize, x0: usize, src: &GridBuffer) {
        for i in 0..src.rows {
            self.row_mut(y0 + i)[x0..x0 + src.cols].copy_from_slice(src.row(i));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_set_round_trip() {
        let mut g = GridBuffer::new(4, 5);
        g.set(2, 3, 1);
        assert_eq!(g.get(2, 3), 1);
        assert_eq!(g.get(0, 0), 0);
    }

    #[test]
    fn alive_count_matches_manual_sum() {
        let mut g = GridBuffer::new(3, 3);
        g.set(0, 0, 1);
        g.set(1, 1, 1);
        g.set(2, 2, 1);
        assert_eq!(g.alive_count(), 3);
    }

    #[test]
    fn subregion_and_paste_round_trip() {
        let mut g = GridBuffer::new(6, 6);
        for x in 0..6 {
            g.set(2, x, 1);
        }
        let sub = g.subregion(1, 1, 3, 3);
        let mut h = GridBuffer::new(6, 6);
        h.paste(1, 1, &sub);
        assert_eq!(h.get(2, 2), 1);
        assert_eq!(h.get(2, 4), 0);
    }

    #[test]
    fn from_cells_rejects_shape_mismatch() {
        assert!(GridBuffer::from_cells(2, 2, vec![0, 1, 0]).is_err());
    }

    #[test]
    fn with_live_cells_sets_only_the_listed_cells() {
        let g = GridBuffer::with_live_cells(4, 4, &[(1, 1), (1, 2), (2, 1), (2, 2)]);
        assert_eq!(g.alive_count(), 4);
        assert_eq!(g.get(1, 1), 1);
        assert_eq!(g.get(0, 0), 0);
    }
}
