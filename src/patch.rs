//! The halo-padded per-rank patch: owned interior cells plus a halo
//! refreshed each generation by the halo exchange.
//!
//! Storage shape follows `SPEC_FULL.md` §3/§4.1 exactly: a `Layout::Cartesian`
//! patch gets a full perimeter (`(rows+2) x (cols+2)`, with corners), but a
//! `Layout::RowStrip` patch owns every column already, so it gets no column
//! halo at all (`(rows+2) x cols`) — horizontal neighbors are read by
//! wrapping the column index within the row itself, exactly like
//! `compute_next_generation`'s `nj = (j+dj) % nx` in `life_mpi.py`, rather
//! than by exchanging extra halo columns nothing needs.

use crate::decomp::{Layout, PatchPlan};
use crate::grid::GridBuffer;

#[derive(Debug, Clone)]
pub struct Patch {
    pub plan: PatchPlan,
    layout: Layout,
    buf: GridBuffer,
}

impl Patch {
    pub fn new(plan: PatchPlan, layout: Layout) -> Self {
        let col_halo = Self::col_halo_width(layout);
        Patch {
            buf: GridBuffer::new(plan.row_count + 2, plan.col_count + col_halo * 2),
            plan,
            layout,
        }
    }

    fn col_halo_width(layout: Layout) -> usize {
        match layout {
            Layout::Cartesian => 1,
            Layout::RowStrip => 0,
        }
    }

    /// Interior rows/cols (excludes the halo perimeter).
    pub fn rows(&self) -> usize {
        self.plan.row_count
    }

    pub fn cols(&self) -> usize {
        self.plan.col_count
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    fn col_offset(&self) -> usize {
        Self::col_halo_width(self.layout)
    }

    #[inline]
    fn padded(&self, y: usize, x: usize) -> (usize, usize) {
        (y + 1, x + self.col_offset())
    }

    #[inline]
    pub fn get(&self, y: usize, x: usize) -> u8 {
        let (py, px) = self.padded(y, x);
        self.buf.get(py, px)
    }

    #[inline]
    pub fn set(&mut self, y: usize, x: usize, v: u8) {
        let (py, px) = self.padded(y, x);
        self.buf.set(py, px, v);
    }

    /// Reads a cell relative to the interior, `-1..=rows` and `-1..=cols`
    /// inclusive, used by the stencil kernel to read halo cells. Under
    /// `Layout::RowStrip` there is no column halo to read, so a
    /// horizontal offset wraps within the owned row instead.
    #[inline]
    pub fn get_padded(&self, y: isize, x: isize) -> u8 {
        let py = (y + 1) as usize;
        let px = match self.layout {
            Layout::Cartesian => (x + self.col_offset() as isize) as usize,
            Layout::RowStrip => x.rem_euclid(self.cols() as isize) as usize,
        };
        self.buf.get(py, px)
    }

    /// Writes a halo cell. Only meaningful for the sides the current
    /// layout actually maintains a halo for (see [`crate::halo::active_directions`]).
    pub fn set_halo_cell(&mut self, y: isize, x: isize, v: u8) {
        let py = (y + 1) as usize;
        let px = match self.layout {
            Layout::Cartesian => (x + self.col_offset() as isize) as usize,
            Layout::RowStrip => x as usize,
        };
        self.buf.set(py, px, v);
    }

    pub fn interior_row(&self, y: usize) -> &[u8] {
        let offset = self.col_offset();
        let row = self.buf.row(y + 1);
        &row[offset..offset + self.cols()]
    }

    pub fn set_interior_row(&mut self, y: usize, data: &[u8]) {
        let offset = self.col_offset();
        let cols = self.cols();
        self.buf.row_mut(y + 1)[offset..offset + cols].copy_from_slice(data);
    }

    /// Copies this patch's owned interior into a fresh, halo-free grid.
    pub fn to_interior_grid(&self) -> GridBuffer {
        self.buf.subregion(1, self.col_offset(), self.rows(), self.cols())
    }

    /// Overwrites the owned interior from a halo-free grid of the same shape.
    pub fn load_interior(&mut self, src: &GridBuffer) {
        let offset = self.col_offset();
        self.buf.paste(1, offset, src);
    }
}
