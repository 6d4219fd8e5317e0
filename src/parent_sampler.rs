//! Lazy producer of parent samples: a dedicated thread continually draws
//! one sample — biased toward the current best in proportion to how often
//! the best parent has produced an improving child — and pushes it into a
//! small bounded queue for strategy workers to pull from.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::Arc;

use crate::domain::{drain_one, BoundedChannel, Random, Shutdown};
use crate::pool::{Member, SharedPool};

const SAMPLE_QUEUE_CAPACITY: usize = 10;

/// Counters the coordinator updates and the sampler reads to bias its draw:
/// the running count of improvements, and how many of those improvements
/// came from a child of the then-current best parent.
pub struct ImprovementStats {
    number_of_improvements: AtomicUsize,
    success_parent_is_best_count: AtomicUsize,
}

impl ImprovementStats {
    /// `number_of_improvements` starts at 1, counting the seeded initial
    /// parent as improvement #1 — matching the Go original
    /// (`solver.numberOfImprovements = 1` once the pool is seeded) and spec
    /// §8 invariant 5, which states successCount sums to
    /// `numberOfImprovements − 1` (the seeded initial doesn't earn any
    /// strategy a success).
    pub fn new() -> Arc<Self> {
        Arc::new(ImprovementStats {
            number_of_improvements: AtomicUsize::new(1),
            success_parent_is_best_count: AtomicUsize::new(0),
        })
    }

    pub fn record_improvement(&self) -> usize {
        self.number_of_improvements.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn record_best_parent_success(&self) {
        self.success_parent_is_best_count
            .fetch_add(1, Ordering::SeqCst);
    }

    pub fn number_of_improvements(&self) -> usize {
        self.number_of_improvements.load(Ordering::SeqCst)
    }

    pub fn success_parent_is_best_count(&self) -> usize {
        self.success_parent_is_best_count.load(Ordering::SeqCst)
    }

    /// Probability the next sample should be the current best:
    /// `successParentIsBestParentCount / numberOfImprovements`. Guarded
    /// against a zero denominator even though `number_of_improvements`
    /// never observes zero post-construction (it's seeded at 1).
    fn best_parent_probability(&self) -> f64 {
        let improvements = self.number_of_improvements();
        if improvements == 0 {
            return 0.0;
        }
        let successes = self.success_parent_is_best_count.load(Ordering::SeqCst);
        successes as f64 / improvements as f64
    }
}

/// Handle a strategy worker pulls sampled parents from. Shared across
/// workers behind an `Arc`, the same way the chromosome stream is.
pub struct ParentSampler {
    receiver: Receiver<Member>,
}

impl ParentSampler {
    /// Spawns the sampling thread and returns the receiving end. The
    /// returned receiver is wrapped by callers in an `Arc` when more than
    /// one strategy worker must draw from the same stream, mirroring how
    /// the chromosome stream is shared.
    pub fn spawn(
        pool: SharedPool,
        stats: Arc<ImprovementStats>,
        random: Random,
        shutdown: Shutdown,
    ) -> Receiver<Member> {
        let channel = BoundedChannel::new(SAMPLE_QUEUE_CAPACITY);
        let (sender, receiver) = channel.split();
        std::thread::spawn(move || loop {
            if shutdown.is_set() {
                return;
            }
            if pool.len() == 0 {
                std::thread::yield_now();
                continue;
            }
            let probability = stats.best_parent_probability();
            let sample = if random.bool(probability) {
                pool.best()
            } else {
                pool.with_state(|state| {
                    let members = state.members();
                    let index = random.draw(members.len());
                    members[index].clone()
                })
            };
            if sender.send(sample).is_err() {
                return;
            }
        });
        receiver
    }

    pub fn from_receiver(receiver: Receiver<Member>) -> Self {
        ParentSampler { receiver }
    }

    pub fn sample(&self, timeout: std::time::Duration) -> Option<Member> {
        crate::domain::try_recv_timeout(&self.receiver, timeout)
    }

    pub fn join(self) {
        drain_one(&self.receiver);
    }
}
