//! Orchestrates one full run: scatter the seeded grid, step the kernel
//! with a halo refresh before every generation, emit snapshots on cadence,
//! and gather the final grid for the closing snapshot and benchmark line.

use std::path::PathBuf;
use std::time::Instant;

use tracing::{error, info, info_span, warn};

use crate::decomp::{DecompositionPlan, Layout};
use crate::distributor::{self, ROOT};
use crate::error::Result;
use crate::halo;
use crate::kernel;
use crate::pattern::{self, Pattern};
use crate::snapshot::{self, SnapshotMeta};
use crate::topology::Topology;
use crate::transport::Transport;

pub struct RunConfig {
    pub ny: usize,
    pub nx: usize,
    pub steps: u64,
    pub save_interval: u64,
    pub output_dir: PathBuf,
    pub pattern: Pattern,
    pub seed: u64,
    pub benchmark: bool,
    pub layout: Layout,
}

#[derive(Debug, Clone, Copy)]
pub struct RunStats {
    pub elapsed_secs: f64,
    pub checksum: u64,
    pub alive_cells: u64,
}

fn write_if_root(
    output_dir: &std::path::Path,
    step: u64,
    global: Option<crate::grid::GridBuffer>,
    mut meta: SnapshotMeta,
) {
    let Some(grid) = global else { return };
    meta.alive_cells = Some(grid.alive_count());
    let path = snapshot::snapshot_path(output_dir, step);
    if let Err(e) = snapshot::write_snapshot(&path, &grid, meta) {
        // IOError is recoverable per SPEC_FULL.md §7: log and keep stepping.
        warn!(error = %e, step, "failed to write snapshot, continuing run");
    }
}

/// Runs the full simulation described by `config` over `transport`.
/// Returns `Some(RunStats)` on the root rank, `None` elsewhere.
///
/// A fatal error (`ConfigError`/`CommError`/`InternalError`) on any one rank
/// means every other rank may already be blocked waiting on it inside a
/// halo exchange or the scatter/gather protocol, so this never lets such an
/// error simply unwind: it logs and calls [`Transport::abort`], which brings
/// down the whole job instead of leaving peers hung (`SPEC_FULL.md` §5, §7).
pub fn run(config: &RunConfig, transport: &dyn Transport) -> Result<Option<RunStats>> {
    match run_inner(config, transport) {
        Ok(stats) => Ok(stats),
        Err(e) => {
            error!(error = %e, "fatal error, aborting job");
            transport.abort(1);
        }
    }
}

fn run_inner(config: &RunConfig, transport: &dyn Transport) -> Result<Option<RunStats>> {
    let rank = transport.rank();
    let size = transport.size();
    let span = info_span!("rank", rank);
    let _guard = span.enter();

    let plan = DecompositionPlan::plan(config.ny, config.nx, size, config.layout)?;
    let topo = Topology::new(plan.dims.0, plan.dims.1);
    info!(dims = ?plan.dims, ranks = size, "decomposition planned");

    let seeded = if rank == ROOT {
        Some(pattern::seed(config.ny, config.nx, config.pattern, config.seed))
    } else {
        None
    };
    let mut patch = distributor::scatter(seeded.as_ref(), &plan, rank, transport)?;

    if rank == ROOT {
        // IOError is recoverable per SPEC_FULL.md §7: a missing output dir
        // only costs us snapshots, so log and keep running rather than
        // routing it through the fatal-abort path.
        if let Err(e) = std::fs::create_dir_all(&config.output_dir) {
            warn!(error = %e, dir = %config.output_dir.display(), "failed to create output dir, snapshots will be skipped");
        }
    }

    // Initial halo so step-0's snapshot (and the first kernel step) read a
    // fully consistent patch.
    halo::exchange(&mut patch, &topo, rank, transport)?;

    let initial_global = distributor::gather(&patch, &plan, rank, config.ny, config.nx, transport)?;
    let mut initial_meta = SnapshotMeta::bare(config.nx, config.ny);
    initial_meta.pattern = Some(config.pattern.name().to_string());
    initial_meta.seed = Some(config.seed);
    write_if_root(&config.output_dir, 0, initial_global, initial_meta);

    let start = Instant::now();
    for step in 1..=config.steps {
        halo::exchange(&mut patch, &topo, rank, transport)?;
        kernel::step(&mut patch);

        let is_final = step == config.steps;
        let on_cadence = config.save_interval > 0 && step % config.save_interval == 0;
        if on_cadence && !is_final {
            let global = distributor::gather(&patch, &plan, rank, config.ny, config.nx, transport)?;
            write_if_root(&config.output_dir, step, global, SnapshotMeta::bare(config.nx, config.ny));
        }
    }

    transport.barrier();
    let elapsed_secs = start.elapsed().as_secs_f64();

    let final_global = distributor::gather(&patch, &plan, rank, config.ny, config.nx, transport)?;
    if rank == ROOT {
        let grid = final_global.expect("root always receives the gathered grid");
        let alive_cells = grid.alive_count();
        let mut meta = SnapshotMeta::bare(config.nx, config.ny);
        meta.checksum = Some(alive_cells);
        meta.alive_cells = Some(alive_cells);
        meta.elapsed_time = Some(elapsed_secs);
        let path = snapshot::snapshot_path(&config.output_dir, config.steps);
        if let Err(e) = snapshot::write_snapshot(&path, &grid, meta) {
            warn!(error = %e, "failed to write final snapshot");
        }

        if config.benchmark {
            println!(
                "BENCHMARK: ranks={}, grid={}x{}, steps={}, time={:.6}, time_per_step={:.6}",
                size,
                config.nx,
                config.ny,
                config.steps,
                elapsed_secs,
                if config.steps > 0 {
                    elapsed_secs / config.steps as f64
                } else {
                    0.0
                }
            );
            println!("BENCHMARK: checksum={alive_cells}, alive_cells={alive_cells}");
        }

        Ok(Some(RunStats {
            elapsed_secs,
            checksum: alive_cells,
            alive_cells,
        }))
    } else {
        Ok(None)
    }
}
