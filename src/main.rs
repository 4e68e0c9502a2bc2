use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use torus_stencil::cli::Args;
use torus_stencil::driver::{self, RunConfig};
use torus_stencil::transport::local_transport::build_world;

#[cfg(feature = "mpi")]
fn make_transport() -> Box<dyn torus_stencil::transport::Transport> {
    use mpi::traits::Communicator;
    use torus_stencil::transport::mpi_transport::MpiTransport;

    let universe = mpi::initialize().expect("failed to initialize MPI");
    let world = universe.world();
    Box::leak(Box::new(universe));
    Box::new(MpiTransport::new(world))
}

#[cfg(not(feature = "mpi"))]
fn make_transport() -> Box<dyn torus_stencil::transport::Transport> {
    // Without the `mpi` feature this runs as a single simulated rank over
    // the in-process transport, which still satisfies the same contract.
    let mut world = build_world(1);
    Box::new(world.pop().expect("single-rank local world"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let transport = make_transport();

    let config = RunConfig {
        ny: args.ny,
        nx: args.nx,
        steps: args.steps,
        save_interval: args.save_interval,
        output_dir: args.output_dir,
        pattern: args.pattern,
        seed: args.seed,
        benchmark: args.benchmark,
        layout: args.decomp,
    };

    driver::run(&config, transport.as_ref())?;
    Ok(())
}
