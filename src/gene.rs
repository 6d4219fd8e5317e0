//! Lazy, unbounded gene and chromosome producers. Each runs on its own
//! thread, pushing into a small bounded hand-off channel, and exits once
//! it observes the shared [`Shutdown`] flag.

use std::sync::mpsc::Receiver;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::domain::{drain_one, try_recv_timeout, BoundedChannel, Random, Shutdown};

const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// A non-empty, duplicate-free alphabet of gene symbols.
#[derive(Clone, Debug)]
pub struct GeneSet(Vec<String>);

impl GeneSet {
    pub fn new(symbols: Vec<String>) -> Result<Self, crate::error::SolverError> {
        if symbols.is_empty() {
            return Err(crate::error::SolverError::invalid_configuration(
                "gene set must not be empty",
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for symbol in &symbols {
            if !seen.insert(symbol.clone()) {
                return Err(crate::error::SolverError::invalid_configuration(format!(
                    "gene set contains duplicate symbol {symbol:?}"
                )));
            }
        }
        Ok(GeneSet(symbols))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Handle onto a running gene-stream thread: a bounded receiver of random
/// symbols plus the join handle torn down at solver return.
pub struct GeneStream {
    pub receiver: Receiver<String>,
    handle: JoinHandle<()>,
}

impl GeneStream {
    pub fn spawn(gene_set: GeneSet, random: Random, shutdown: Shutdown, length: usize) -> Self {
        let capacity = 1 + length;
        let channel = BoundedChannel::new(capacity);
        let (sender, receiver) = channel.split();
        let handle = std::thread::spawn(move || loop {
            if shutdown.is_set() {
                return;
            }
            let symbol = random.choose(gene_set.as_slice()).clone();
            if sender.send(symbol).is_err() {
                return;
            }
        });
        GeneStream { receiver, handle }
    }

    pub fn join(self) {
        drain_one(&self.receiver);
        let _ = self.handle.join();
    }

    /// Splits the stream into its raw receiver and join handle for callers
    /// that need to hand the receiver to a downstream producer (the
    /// chromosome stream) while still owning teardown of this thread.
    pub fn into_parts(self) -> (Receiver<String>, JoinHandle<()>) {
        (self.receiver, self.handle)
    }
}

/// Handle onto a running chromosome-stream thread: concatenates exactly `L`
/// genes drawn from a [`GeneStream`] into one chromosome per demand.
pub struct ChromosomeStream {
    pub receiver: Receiver<String>,
    handle: JoinHandle<()>,
}

impl ChromosomeStream {
    pub fn spawn(gene_receiver: Receiver<String>, shutdown: Shutdown, length: usize) -> Self {
        let channel = BoundedChannel::new(1);
        let (sender, receiver) = channel.split();
        let handle = std::thread::spawn(move || loop {
            if shutdown.is_set() {
                return;
            }
            let mut chromosome = String::new();
            for _ in 0..length {
                match try_recv_timeout(&gene_receiver, POLL_INTERVAL) {
                    Some(gene) => chromosome.push_str(&gene),
                    None => {
                        if shutdown.is_set() {
                            return;
                        }
                    }
                }
            }
            if chromosome.chars().count() < length {
                continue;
            }
            if sender.send(chromosome).is_err() {
                return;
            }
        });
        ChromosomeStream { receiver, handle }
    }

    pub fn join(self) {
        drain_one(&self.receiver);
        let _ = self.handle.join();
    }

    /// Splits the stream into its raw receiver and join handle, for callers
    /// that need to share the receiver (wrapped behind a lock) with more
    /// than one consumer while still owning this thread's teardown.
    pub fn into_parts(self) -> (Receiver<String>, JoinHandle<()>) {
        (self.receiver, self.handle)
    }
}
