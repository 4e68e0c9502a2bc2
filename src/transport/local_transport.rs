//! In-process transport that simulates `P` ranks as threads connected by
//! `crossbeam-channel` channels, one inbox per rank.
//!
//! Used by the integration tests in `tests/` to check the equivalence
//! property (§8 of `SPEC_FULL.md`) without spawning real MPI processes, and
//! is a reasonable stand-in for `P = 1` single-process runs too.

use std::cell::RefCell;
use std::sync::{Arc, Barrier};

use crossbeam_channel::{Receiver, Sender};

use crate::error::{Result, StencilError};
use crate::transport::{PostedRecv, PostedSend, Transport};

struct Envelope {
    src: usize,
    tag: i32,
    data: Vec<u8>,
}

pub struct LocalTransport {
    rank: usize,
    size: usize,
    senders: Vec<Sender<Envelope>>,
    receiver: Receiver<Envelope>,
    // Messages received out of (src, tag) order relative to what the
    // caller asked for next; the real network has no such ordering
    // guarantee either, so callers must already tolerate this.
    pending: RefCell<Vec<Envelope>>,
    barrier: Arc<Barrier>,
}

/// Builds one [`LocalTransport`] per simulated rank, sharing inboxes and a
/// barrier so they behave like peers in a single MPI_COMM_WORLD.
pub fn build_world(size: usize) -> Vec<LocalTransport> {
    let mut senders = Vec::with_capacity(size);
    let mut receivers = Vec::with_capacity(size);
    for _ in 0..size {
        let (tx, rx) = crossbeam_channel::unbounded();
        senders.push(tx);
        receivers.push(rx);
    }
    let barrier = Arc::new(Barrier::new(size));
    receivers
        .into_iter()
        .enumerate()
        .map(|(rank, receiver)| LocalTransport {
            rank,
            size,
            senders: senders.clone(),
            receiver,
            pending: RefCell::new(Vec::new()),
            barrier: barrier.clone(),
        })
        .collect()
}

impl LocalTransport {
    fn take_matching(&self, src: usize, tag: i32) -> Option<Vec<u8>> {
        let mut pending = self.pending.borrow_mut();
        if let Some(pos) = pending.iter().position(|e| e.src == src && e.tag == tag) {
            return Some(pending.remove(pos).data);
        }
        None
    }
}

impl Transport for LocalTransport {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn barrier(&self) {
        self.barrier.wait();
    }

    fn abort(&self, code: i32) -> ! {
        std::process::exit(code);
    }

    fn send_bytes(&self, dest: usize, tag: i32, data: &[u8]) -> Result<()> {
        self.senders[dest]
            .send(Envelope {
                src: self.rank,
                tag,
                data: data.to_vec(),
            })
            .map_err(|e| StencilError::comm(format!("local send to {dest} failed: {e}")))
    }

    fn recv_bytes(&self, src: usize, tag: i32, _len: usize) -> Result<Vec<u8>> {
        if let Some(data) = self.take_matching(src, tag) {
            return Ok(data);
        }
        loop {
            let envelope = self
                .receiver
                .recv()
                .map_err(|e| StencilError::comm(format!("local recv failed: {e}")))?;
            if envelope.src == src && envelope.tag == tag {
                return Ok(envelope.data);
            }
            self.pending.borrow_mut().push(envelope);
        }
    }

    fn exchange(&self, sends: &[PostedSend], recvs: &[PostedRecv]) -> Result<Vec<Vec<u8>>> {
        // Channels here are unbounded, so posting sends before receives
        // cannot deadlock the way a real network's send buffers could;
        // real transports must still post receives first (see trait docs).
        for send in sends {
            self.send_bytes(send.dest, send.tag, send.data)?;
        }
        let mut out = Vec::with_capacity(recvs.len());
        for recv in recvs {
            out.push(self.recv_bytes(recv.src, recv.tag, recv.len)?);
        }
        Ok(out)
    }
}
