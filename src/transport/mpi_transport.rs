//! Real MPI-backed transport, built on the `mpi` crate (rsmpi).
//!
//! Mirrors the `mpi4py` reference 1:1: non-blocking point-to-point for the
//! halo exchange (post receives, then sends, then wait all — see
//! `SPEC_FULL.md` §4.4), blocking point-to-point for the distributor's
//! scatter/gather (the reference's 2D path is a per-rank `Send`/`Recv`
//! loop, not a true collective; see §9's "2D scatter is not a symmetric
//! collective").

use mpi::request::{scope, WaitGuard};
use mpi::topology::SystemCommunicator;
use mpi::traits::*;

use crate::error::Result;
use crate::transport::{PostedRecv, PostedSend, Transport};

pub struct MpiTransport {
    world: SystemCommunicator,
}

impl MpiTransport {
    pub fn new(world: SystemCommunicator) -> Self {
        MpiTransport { world }
    }
}

impl Transport for MpiTransport {
    fn rank(&self) -> usize {
        self.world.rank() as usize
    }

    fn size(&self) -> usize {
        self.world.size() as usize
    }

    fn barrier(&self) {
        self.world.barrier();
    }

    fn abort(&self, code: i32) -> ! {
        // rsmpi does not expose a safe MPI_Abort binding; exiting the
        // process is the closest equivalent and still brings this rank
        // down immediately rather than leaving peers blocked in recv.
        std::process::exit(code);
    }

    fn send_bytes(&self, dest: usize, tag: i32, data: &[u8]) -> Result<()> {
        let process = self.world.process_at_rank(dest as i32);
        process.send_with_tag(data, tag);
        Ok(())
    }

    fn recv_bytes(&self, src: usize, tag: i32, len: usize) -> Result<Vec<u8>> {
        let process = self.world.process_at_rank(src as i32);
        let mut buf = vec![0u8; len];
        process.receive_into_with_tag(&mut buf, tag);
        Ok(buf)
    }

    fn exchange(&self, sends: &[PostedSend], recvs: &[PostedRecv]) -> Result<Vec<Vec<u8>>> {
        let mut recv_bufs: Vec<Vec<u8>> = recvs.iter().map(|r| vec![0u8; r.len]).collect();
        let world = &self.world;
        scope(|scope| {
            let mut guards = Vec::with_capacity(sends.len() + recvs.len());
            for (i, recv) in recvs.iter().enumerate() {
                let process = world.process_at_rank(recv.src as i32);
                guards.push(WaitGuard::from(
                    process.immediate_receive_into_with_tag(scope, &mut recv_bufs[i], recv.tag),
                ));
            }
            for send in sends {
                let process = world.process_at_rank(send.dest as i32);
                guards.push(WaitGuard::from(
                    process.immediate_send_with_tag(scope, send.data, send.tag),
                ));
            }
            // Dropping the guards waits on every request; any failure
            // surfaces as a panic inside rsmpi, which is the library's
            // own policy for communication faults.
            drop(guards);
        });
        Ok(recv_bufs)
    }
}
