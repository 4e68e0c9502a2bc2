//! Refreshes a patch's halo perimeter from its eight neighbors.
//!
//! Ported from `exchange_halo_2d` in `life_mpi_2d.py`: for every direction
//! `D`, a rank sends its `D`-facing edge to its `D` neighbor tagged `D`,
//! and receives into its `D` halo slot from the same neighbor tagged
//! `opposite(D)` — the tag a message carries is the direction it is
//! travelling in, not which side posted the request, so a rank that is
//! its own neighbor (P=1 on some axis) never has a send collide with an
//! unrelated receive.

use crate::decomp::Layout;
use crate::error::Result;
use crate::patch::Patch;
use crate::topology::{Direction, Topology};
use crate::transport::{PostedRecv, PostedSend, Transport};

/// Which directions actually need a message for this layout.
///
/// A `Layout::RowStrip` patch owns every column, so east/west and every
/// diagonal collapse to the rank itself (`SPEC_FULL.md` §4.1) and carry no
/// column halo to fill (see `Patch`'s layout-aware storage) — only the
/// vertical neighbors are exchanged.
pub fn active_directions(layout: Layout) -> &'static [Direction] {
    match layout {
        Layout::Cartesian => &Direction::ALL,
        Layout::RowStrip => &[Direction::N, Direction::S],
    }
}

fn edge_bytes(patch: &Patch, dir: Direction) -> Vec<u8> {
    let rows = patch.rows();
    let cols = patch.cols();
    match dir {
        Direction::N => patch.interior_row(0).to_vec(),
        Direction::S => patch.interior_row(rows - 1).to_vec(),
        Direction::W => (0..rows).map(|y| patch.get(y, 0)).collect(),
        Direction::E => (0..rows).map(|y| patch.get(y, cols - 1)).collect(),
        Direction::NW => vec![patch.get(0, 0)],
        Direction::NE => vec![patch.get(0, cols - 1)],
        Direction::SW => vec![patch.get(rows - 1, 0)],
        Direction::SE => vec![patch.get(rows - 1, cols - 1)],
    }
}

fn edge_len(patch: &Patch, dir: Direction) -> usize {
    match dir {
        Direction::N | Direction::S => patch.cols(),
        Direction::E | Direction::W => patch.rows(),
        _ => 1,
    }
}

fn write_halo(patch: &mut Patch, dir: Direction, data: &[u8]) {
    let rows = patch.rows() as isize;
    let cols = patch.cols() as isize;
    match dir {
        Direction::N => {
            for (x, &v) in data.iter().enumerate() {
                patch.set_halo_cell(-1, x as isize, v);
            }
        }
        Direction::S => {
            for (x, &v) in data.iter().enumerate() {
                patch.set_halo_cell(rows, x as isize, v);
            }
        }
        Direction::W => {
            for (y, &v) in data.iter().enumerate() {
                patch.set_halo_cell(y as isize, -1, v);
            }
        }
        Direction::E => {
            for (y, &v) in data.iter().enumerate() {
                patch.set_halo_cell(y as isize, cols, v);
            }
        }
        Direction::NW => patch.set_halo_cell(-1, -1, data[0]),
        Direction::NE => patch.set_halo_cell(-1, cols, data[0]),
        Direction::SW => patch.set_halo_cell(rows, -1, data[0]),
        Direction::SE => patch.set_halo_cell(rows, cols, data[0]),
    }
}

/// Refreshes every halo cell of `patch` from its neighbors, via `transport`.
pub fn exchange(patch: &mut Patch, topo: &Topology, rank: usize, transport: &dyn Transport) -> Result<()> {
    let dirs = active_directions(patch.layout());

    let edges: Vec<(Direction, Vec<u8>)> = dirs.iter().map(|&d| (d, edge_bytes(patch, d))).collect();

    let sends: Vec<PostedSend> = dirs
        .iter()
        .zip(edges.iter())
        .map(|(&d, (_, data))| PostedSend {
            dest: topo.neighbor(rank, d),
            tag: d.tag(),
            data,
        })
        .collect();

    let recvs: Vec<PostedRecv> = dirs
        .iter()
        .map(|&d| PostedRecv {
            src: topo.neighbor(rank, d),
            tag: d.opposite().tag(),
            len: edge_len(patch, d),
        })
        .collect();

    let received = transport.exchange(&sends, &recvs)?;
    for (dir, data) in dirs.iter().zip(received.iter()) {
        write_halo(patch, *dir, data);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decomp::{DecompositionPlan, Layout};
    use crate::transport::local_transport::build_world;
    use std::thread;

    #[test]
    fn halo_matches_neighbor_owned_cells_after_exchange() {
        let ny = 6;
        let nx = 6;
        let p = 4;
        let plan = DecompositionPlan::plan(ny, nx, p, Layout::Cartesian).unwrap();
        let topo = Topology::new(plan.dims.0, plan.dims.1);

        let world = build_world(p);
        let handles: Vec<_> = world
            .into_iter()
            .enumerate()
            .map(|(rank, transport)| {
                let patch_plan = plan.patch(rank);
                thread::spawn(move || {
                    let mut patch = Patch::new(patch_plan, Layout::Cartesian);
                    // seed every owned cell with a value unique to its rank
                    for y in 0..patch.rows() {
                        for x in 0..patch.cols() {
                            patch.set(y, x, (rank as u8) + 1);
                        }
                    }
                    exchange(&mut patch, &topo, rank, &transport).unwrap();
                    // the cell just above the patch's own top-left corner
                    // must equal the north neighbor's fill value
                    let north = topo.neighbor(rank, Direction::N);
                    assert_eq!(patch.get_padded(-1, 0), (north as u8) + 1);
                    let west = topo.neighbor(rank, Direction::W);
                    assert_eq!(patch.get_padded(0, -1), (west as u8) + 1);
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
    }

    #[test]
    fn single_rank_exchange_fills_halo_from_self() {
        let plan = DecompositionPlan::plan(3, 3, 1, Layout::Cartesian).unwrap();
        let topo = Topology::new(1, 1);
        let world = build_world(1);
        let transport = &world[0];
        let mut patch = Patch::new(plan.patch(0), Layout::Cartesian);
        patch.set(0, 0, 9);
        patch.set(2, 2, 5);
        exchange(&mut patch, &topo, 0, transport).unwrap();
        assert_eq!(patch.get_padded(-1, -1), 5); // wraps to own SE corner
        assert_eq!(patch.get_padded(3, 3), 9); // wraps to own NW corner
    }

    #[test]
    fn row_strip_exchange_only_sends_vertical_neighbors() {
        let ny = 9;
        let nx = 5;
        let p = 3;
        let plan = DecompositionPlan::plan(ny, nx, p, Layout::RowStrip).unwrap();
        let topo = Topology::new(plan.dims.0, plan.dims.1);

        let world = build_world(p);
        let handles: Vec<_> = world
            .into_iter()
            .enumerate()
            .map(|(rank, transport)| {
                let patch_plan = plan.patch(rank);
                thread::spawn(move || {
                    let mut patch = Patch::new(patch_plan, Layout::RowStrip);
                    for y in 0..patch.rows() {
                        for x in 0..patch.cols() {
                            patch.set(y, x, (rank as u8) + 1);
                        }
                    }
                    exchange(&mut patch, &topo, rank, &transport).unwrap();
                    let north = topo.neighbor(rank, Direction::N);
                    let south = topo.neighbor(rank, Direction::S);
                    assert_eq!(patch.get_padded(-1, 0), (north as u8) + 1);
                    assert_eq!(patch.get_padded(patch.rows() as isize, 0), (south as u8) + 1);
                    // horizontal wrap reads the rank's own data, not a halo column
                    assert_eq!(patch.get_padded(0, -1), patch.get(0, patch.cols() - 1));
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
    }
}
