//! Maps the root-only global grid to per-rank patches and back.
//!
//! Ported from `life_mpi_2d.py`'s point-to-point scatter/gather: 2D
//! patches are not contiguous in the root's row-major buffer, so this
//! always uses per-rank blocking sends rather than a true collective (see
//! `SPEC_FULL.md` §9, "2D scatter is not a symmetric collective" — the
//! same point-to-point approach also works for the 1D layout and keeps
//! one code path for both).

use crate::decomp::DecompositionPlan;
use crate::error::Result;
use crate::grid::GridBuffer;
use crate::patch::Patch;
use crate::transport::Transport;

const SCATTER_TAG: i32 = 100;
const GATHER_TAG: i32 = 101;

pub const ROOT: usize = 0;

/// Splits `global` (present only on `ROOT`) into patches and delivers one
/// to each rank, including the root's own.
pub fn scatter(
    global: Option<&GridBuffer>,
    plan: &DecompositionPlan,
    rank: usize,
    transport: &dyn Transport,
) -> Result<Patch> {
    if rank == ROOT {
        let global = global.expect("scatter called on root without a global grid");
        let mut own = None;
        for (r, patch_plan) in plan.patches.iter().enumerate() {
            let region = global.subregion(
                patch_plan.row_start,
                patch_plan.col_start,
                patch_plan.row_count,
                patch_plan.col_count,
            );
            if r == ROOT {
                own = Some(region);
            } else {
                transport.send_bytes(r, SCATTER_TAG, region.as_slice())?;
            }
        }
        let mut patch = Patch::new(plan.patch(ROOT), plan.layout);
        patch.load_interior(&own.expect("root patch always populated"));
        Ok(patch)
    } else {
        let patch_plan = plan.patch(rank);
        let len = patch_plan.row_count * patch_plan.col_count;
        let bytes = transport.recv_bytes(ROOT, SCATTER_TAG, len)?;
        let region = GridBuffer::from_cells(patch_plan.row_count, patch_plan.col_count, bytes)?;
        let mut patch = Patch::new(patch_plan, plan.layout);
        patch.load_interior(&region);
        Ok(patch)
    }
}

/// Collects every rank's owned interior into a single grid, present only
/// on `ROOT`. Non-root ranks must call this too, even though they get
/// nothing useful back, so the point-to-point protocol stays in lockstep.
pub fn gather(
    patch: &Patch,
    plan: &DecompositionPlan,
    rank: usize,
    ny: usize,
    nx: usize,
    transport: &dyn Transport,
) -> Result<Option<GridBuffer>> {
    if rank == ROOT {
        let mut global = GridBuffer::new(ny, nx);
        global.paste(0, 0, &patch.to_interior_grid());
        for (r, patch_plan) in plan.patches.iter().enumerate() {
            if r == ROOT {
                continue;
            }
            let len = patch_plan.row_count * patch_plan.col_count;
            let bytes = transport.recv_bytes(r, GATHER_TAG, len)?;
            let region = GridBuffer::from_cells(patch_plan.row_count, patch_plan.col_count, bytes)?;
            global.paste(patch_plan.row_start, patch_plan.col_start, &region);
        }
        Ok(Some(global))
    } else {
        let interior = patch.to_interior_grid();
        transport.send_bytes(ROOT, GATHER_TAG, interior.as_slice())?;
        Ok(None)
    }
}
