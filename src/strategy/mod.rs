//! Strategies as polymorphic producers. Each strategy is a capability —
//! produce one child given a parent sampler and the gene streams — not a
//! class hierarchy; concrete operators implement [`Propose`] and everything
//! else (the worker thread, the outbound queue, success-count bookkeeping)
//! is identical across strategies.

mod crossover;
mod substitution;

pub use crossover::Crossover;
pub use substitution::Substitution;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crate::domain::{BoundedChannel, Random, SequenceId, Shutdown};
use crate::parent_sampler::ParentSampler;
use crate::sequence::StrategyId;

/// A child candidate still missing its fitness: strategies produce children
/// without computing fitness themselves — the coordinator attaches fitness
/// on admission consideration. Because a [`crate::sequence::Sequence`] is
/// immutable once built, the unscored child is carried as this lighter
/// value until the coordinator computes its fitness and constructs the
/// real `Sequence`.
#[derive(Clone, Debug)]
pub struct Proposal {
    pub genes: String,
    pub parent: SequenceId,
    pub strategy: StrategyId,
}

/// The one capability every strategy must provide: propose a child from
/// sampled parents and the shared gene/chromosome material. Returns `None`
/// when the parent sample(s) it needs aren't available within one attempt,
/// so the caller — not this method — owns the retry loop and can check the
/// shutdown signal between attempts; a strategy that looped internally until
/// it got a parent would never notice shutdown if the sampler's channel had
/// already disconnected.
pub trait Propose: Send + 'static {
    fn name(&self) -> &'static str;

    fn propose(
        &self,
        sampler: &ParentSampler,
        chromosome_receiver: &Mutex<Receiver<String>>,
        random: &Random,
    ) -> Option<Proposal>;
}

/// Bookkeeping shared between a strategy's worker thread and the
/// coordinator: its display name and its monotonically non-decreasing
/// success count.
pub struct StrategyRecord {
    name: &'static str,
    success_count: AtomicUsize,
}

impl StrategyRecord {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn success_count(&self) -> usize {
        self.success_count.load(Ordering::SeqCst)
    }

    pub fn record_success(&self) -> usize {
        self.success_count.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// A running strategy worker: its bookkeeping record, its outbound queue,
/// and the thread proposing children into that queue until shutdown.
pub struct StrategyWorker {
    pub record: Arc<StrategyRecord>,
    pub receiver: Receiver<Proposal>,
    handle: JoinHandle<()>,
}

impl StrategyWorker {
    pub fn spawn(
        id: StrategyId,
        strategy: impl Propose,
        sampler: Arc<ParentSampler>,
        chromosome_receiver: Arc<Mutex<Receiver<String>>>,
        random: Random,
        shutdown: Shutdown,
        queue_capacity: usize,
    ) -> Self {
        let record = Arc::new(StrategyRecord {
            name: strategy.name(),
            success_count: AtomicUsize::new(0),
        });
        let channel = BoundedChannel::new(queue_capacity);
        let (sender, receiver) = channel.split();
        let handle = std::thread::spawn(move || loop {
            if shutdown.is_set() {
                return;
            }
            let Some(mut proposal) = strategy.propose(&sampler, &chromosome_receiver, &random)
            else {
                continue;
            };
            proposal.strategy = id;
            if sender.send(proposal).is_err() {
                return;
            }
        });
        StrategyWorker {
            record,
            receiver,
            handle,
        }
    }

    pub fn join(self) {
        crate::domain::drain_one(&self.receiver);
        let _ = self.handle.join();
    }
}
