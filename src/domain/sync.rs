//! Shutdown broadcast and small channel helpers shared by every producer
//! thread (gene/chromosome streams, parent sampler, strategy workers).
//!
//! The concurrency model is: several independent producers, each feeding a
//! bounded, blocking-send channel, all fanned into a single broadcast
//! shutdown flag. A producer checks the flag non-blockingly between items
//! and, on seeing it set, drains at most one buffered item (so a
//! coordinator parked on `recv()` doesn't deadlock) before exiting.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// A cloneable broadcast flag. Every producer holds a clone; any holder can
/// signal it and every other holder observes the signal on its next check.
#[derive(Clone, Default)]
pub struct Shutdown(Arc<AtomicBool>);

impl Shutdown {
    pub fn new() -> Self {
        Shutdown(Arc::new(AtomicBool::new(false)))
    }

    pub fn signal(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A bounded, blocking-send/receive channel with a fixed capacity, matching
/// the single-element and small-buffer hand-offs the gene, chromosome, and
/// strategy-result streams use.
pub struct BoundedChannel<T> {
    sender: SyncSender<T>,
    receiver: Receiver<T>,
}

impl<T> BoundedChannel<T> {
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = mpsc::sync_channel(capacity);
        BoundedChannel { sender, receiver }
    }

    pub fn split(self) -> (SyncSender<T>, Receiver<T>) {
        (self.sender, self.receiver)
    }
}

/// Tries to receive one item within `timeout`, treating both "empty" and
/// "sender gone" as "nothing arrived" — a producer observing shutdown closes
/// its sender, and the coordinator's poll loop should not distinguish the
/// two at the call site.
pub fn try_recv_timeout<T>(receiver: &Receiver<T>, timeout: Duration) -> Option<T> {
    match receiver.recv_timeout(timeout) {
        Ok(item) => Some(item),
        Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
    }
}

/// Drains at most one buffered item from `receiver` without blocking. Used
/// during teardown so a producer that already pushed an item before
/// observing the shutdown signal doesn't leave the channel's other end
/// waiting forever.
pub fn drain_one<T>(receiver: &Receiver<T>) {
    let _ = receiver.try_recv();
}

/// Joins every handle, ignoring panics from already-finished threads the
/// way the façade's teardown path does — a panicking producer shouldn't
/// prevent the rest of the solver from unwinding.
pub fn join_all(handles: Vec<JoinHandle<()>>) {
    for handle in handles {
        let _ = handle.join();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shutdown_is_observed_across_clones() {
        let flag = Shutdown::new();
        let clone = flag.clone();
        assert!(!clone.is_set());
        flag.signal();
        assert!(clone.is_set());
    }

    #[test]
    fn try_recv_timeout_times_out_on_empty_channel() {
        let channel = BoundedChannel::<u32>::new(1);
        let (_sender, receiver) = channel.split();
        let result = try_recv_timeout(&receiver, Duration::from_millis(1));
        assert!(result.is_none());
    }

    #[test]
    fn drain_one_does_not_panic_on_empty_channel() {
        let channel = BoundedChannel::<u32>::new(1);
        let (_sender, receiver) = channel.split();
        drain_one(&receiver);
    }
}
