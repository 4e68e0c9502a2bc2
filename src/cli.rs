//! Command-line surface, mirroring `SPEC_FULL.md` §6's options table
//! (names, types, and defaults match the `life_mpi.py`/`life_mpi_2d.py`
//! reference's `argparse` setup) in the teacher's `clap::Parser` style.

use std::path::PathBuf;

use clap::Parser;

use crate::decomp::Layout;
use crate::pattern::Pattern;

#[derive(Debug, Parser)]
#[command(about = "Distributed toroidal Game of Life stencil engine")]
pub struct Args {
    #[arg(long, default_value_t = 16384)]
    pub nx: usize,

    #[arg(long, default_value_t = 16384)]
    pub ny: usize,

    #[arg(long, default_value_t = 2000)]
    pub steps: u64,

    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    #[arg(long, value_enum, default_value_t = Pattern::GliderGun)]
    pub pattern: Pattern,

    #[arg(long, value_enum, default_value_t = Layout::RowStrip)]
    pub decomp: Layout,

    #[arg(long, default_value = "snapshots")]
    pub output_dir: PathBuf,

    #[arg(long, default_value_t = 100)]
    pub save_interval: u64,

    #[arg(long, default_value_t = false)]
    pub benchmark: bool,
}
