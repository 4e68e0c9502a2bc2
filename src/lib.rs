//! Distributed toroidal 2D stencil engine (Conway's Game of Life, B3/S23)
//! decomposed across cooperating processes with non-blocking halo exchange.

pub mod cli;
pub mod decomp;
pub mod distributor;
pub mod driver;
pub mod error;
pub mod grid;
pub mod halo;
pub mod kernel;
pub mod patch;
pub mod pattern;
pub mod snapshot;
pub mod topology;
pub mod transport;
