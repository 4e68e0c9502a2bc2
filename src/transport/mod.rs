//! The message-passing abstraction the rest of the crate is written against.
//!
//! `Halo Exchange`, `Distributor`, and `Simulation Driver` never touch the
//! `mpi` crate directly; they call through [`Transport`], so the same code
//! drives both a real MPI job ([`mpi_transport::MpiTransport`]) and an
//! in-process harness used by the equivalence tests
//! ([`local_transport::LocalTransport`]).

#[cfg(feature = "mpi")]
pub mod mpi_transport;
pub mod local_transport;

use crate::error::Result;

/// One posted non-blocking send: destination rank, direction tag, payload.
pub struct PostedSend<'a> {
    pub dest: usize,
    pub tag: i32,
    pub data: &'a [u8],
}

/// One posted non-blocking receive: source rank, direction tag, expected length.
pub struct PostedRecv {
    pub src: usize,
    pub tag: i32,
    pub len: usize,
}

/// The process-to-process communication surface the simulation core needs.
///
/// Implementations must honor the canonical ordering required by
/// `SPEC_FULL.md` §4.4: conceptually post every receive before any send,
/// then wait for all of them, so the halo exchange cannot deadlock
/// regardless of how much buffering the transport provides.
pub trait Transport {
    fn rank(&self) -> usize;
    fn size(&self) -> usize;

    /// A full barrier across every rank.
    fn barrier(&self);

    /// Aborts the whole job. Never returns.
    fn abort(&self, code: i32) -> !;

    /// Blocking point-to-point send, used by the distributor's scatter/gather.
    fn send_bytes(&self, dest: usize, tag: i32, data: &[u8]) -> Result<()>;

    /// Blocking point-to-point receive of an exactly-`len`-byte message.
    fn recv_bytes(&self, src: usize, tag: i32, len: usize) -> Result<Vec<u8>>;

    /// Posts every receive, then every send, then waits for all of them,
    /// returning the received payloads in the same order as `recvs`.
    fn exchange(&self, sends: &[PostedSend], recvs: &[PostedRecv]) -> Result<Vec<Vec<u8>>>;
}
