//! The inner search: the single consumer of every strategy's queue,
//! responsible for admission, the challenger pool, strategy-success bias,
//! and the one stagnation timeout the core knows about.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::comparator::Comparator;
use crate::domain::Random;
use crate::parent_sampler::ImprovementStats;
use crate::pool::SharedPool;
use crate::sequence::{Provenance, Sequence};
use crate::strategy::StrategyWorker;
use tracing::{debug, info};

const POLL_INTERVAL: Duration = Duration::from_millis(1);
const CHILDREN_PROMOTE_FULL: usize = 20;
const CHILDREN_PROMOTE_PARTIAL: usize = 10;
const DISTINCT_FITNESS_THRESHOLD: usize = 4;
/// The success-count threshold used to pick an eligible strategy can spin
/// forever once every strategy is filtered out below the current minimum.
/// After this many consecutive sweeps with no eligible strategy, the
/// coordinator falls through to an unbiased pick (threshold 0) instead.
const UNBIASED_FALLBACK_AFTER_SWEEPS: usize = 50;

/// Diagnostic events the coordinator reports for the façade to render as
/// `.`/`+`/`>` progress markers.
pub enum DiagnosticEvent<'a> {
    /// A candidate was added to the challenger pool (`.`).
    ChildAccumulated,
    /// A strict improvement was admitted into the real pool (`+`), with the
    /// improving child's genes and the strategy that produced it.
    Improvement {
        genes: &'a str,
        strategy_name: &'static str,
    },
    /// The challenger pool was promoted into the real pool (`>`).
    Promotion,
}

/// A single-threaded accumulating challenger pool: seeded with the real
/// pool's current best and promoted wholesale into the real pool once it
/// grows large enough or stagnation is near.
struct ChallengerPool {
    members: Vec<Sequence>,
    distinct_genes: HashSet<String>,
    distinct_fitnesses: HashSet<i64>,
    capacity: usize,
    comparator: Comparator,
}

impl ChallengerPool {
    fn seeded_with(seed: Sequence, capacity: usize, comparator: Comparator) -> Self {
        let mut distinct_genes = HashSet::new();
        let mut distinct_fitnesses = HashSet::new();
        distinct_genes.insert(seed.genes().to_string());
        distinct_fitnesses.insert(seed.fitness());
        ChallengerPool {
            members: vec![seed],
            distinct_genes,
            distinct_fitnesses,
            capacity,
            comparator,
        }
    }

    fn weakest_fitness(&self) -> i64 {
        self.members[self.members.len() - 1].fitness()
    }

    fn contains(&self, genes: &str) -> bool {
        self.distinct_genes.contains(genes)
    }

    fn is_full(&self) -> bool {
        self.members.len() >= self.capacity
    }

    /// Appends while there's room and either fewer than 4 distinct fitnesses
    /// are present or the candidate ties the current weakest child;
    /// otherwise overwrites the weakest slot if the candidate is at least
    /// as good.
    fn add(&mut self, candidate: Sequence) {
        let weakest = self.weakest_fitness();
        let should_append = !self.is_full()
            && (self.distinct_fitnesses.len() < DISTINCT_FITNESS_THRESHOLD
                || candidate.fitness() == weakest);
        if should_append {
            self.distinct_genes.insert(candidate.genes().to_string());
            self.distinct_fitnesses.insert(candidate.fitness());
            self.members.push(candidate);
            self.sift_up_from(self.members.len() - 1);
        } else if self.comparator.is_same_or_better(candidate.fitness(), weakest) {
            let last = self.members.len() - 1;
            self.distinct_genes.remove(self.members[last].genes());
            self.distinct_genes.insert(candidate.genes().to_string());
            self.distinct_fitnesses.insert(candidate.fitness());
            self.members[last] = candidate;
            self.sift_up_from(last);
        }
    }

    fn sift_up_from(&mut self, mut i: usize) {
        while i > 0
            && self
                .comparator
                .is_same_or_better(self.members[i].fitness(), self.members[i - 1].fitness())
        {
            self.members.swap(i, i - 1);
            i -= 1;
        }
    }

    /// Whether the challenger pool has grown large enough, or stagnation
    /// is close enough, to promote now.
    fn should_promote(&self, elapsed_since_improvement: Duration, stagnation_window: Duration) -> bool {
        self.members.len() >= CHILDREN_PROMOTE_FULL
            || (self.members.len() >= CHILDREN_PROMOTE_PARTIAL
                && elapsed_since_improvement > stagnation_window / 2)
    }
}

pub struct CoordinatorConfig {
    pub max_seconds_without_improvement: f64,
    pub comparator: Comparator,
}

/// Runs one inner search to completion, returning the best real-pool member
/// once the stagnation window elapses without a strict improvement. Any
/// sequences still held in the challenger pool at that point are appended
/// into the real pool, tolerating a transient overshoot of the pool's
/// capacity at this one boundary.
#[allow(clippy::too_many_arguments)]
pub fn run_inner_search(
    pool: &SharedPool,
    strategies: &[StrategyWorker],
    stats: &Arc<ImprovementStats>,
    random: &Random,
    config: &CoordinatorConfig,
    mut fitness: impl FnMut(&str) -> i64,
    mut on_diagnostic: impl FnMut(DiagnosticEvent),
) -> Sequence {
    let mut start = Instant::now();
    let stagnation_window = Duration::from_secs_f64(config.max_seconds_without_improvement);

    let seed = pool.with_state(|s| s.best().sequence.clone());
    let capacity = pool.with_state(|s| s.capacity());
    let mut children = ChallengerPool::seeded_with(seed, capacity, config.comparator);

    let mut max_strategy_success: usize = 1;
    let mut empty_sweeps: usize = 0;

    loop {
        let min_strategy_success = if empty_sweeps >= UNBIASED_FALLBACK_AFTER_SWEEPS {
            0
        } else {
            random.draw(max_strategy_success.max(1))
        };

        let mut sweep_found_eligible_strategy = false;
        for worker in strategies {
            if worker.record.success_count() < min_strategy_success {
                continue;
            }
            sweep_found_eligible_strategy = true;

            match crate::domain::try_recv_timeout(&worker.receiver, POLL_INTERVAL) {
                Some(proposal) => {
                    empty_sweeps = 0;
                    if pool.contains(&proposal.genes) {
                        continue;
                    }
                    let child_fitness = fitness(&proposal.genes);
                    let weakest_fitness = pool.with_state(|s| s.weakest().sequence.fitness());
                    if !config
                        .comparator
                        .is_same_or_better(child_fitness, weakest_fitness)
                    {
                        continue;
                    }

                    let child = Sequence::new(
                        proposal.genes.clone(),
                        child_fitness,
                        Provenance::Strategy {
                            strategy: proposal.strategy,
                            parent: proposal.parent,
                        },
                    );

                    if child_fitness == weakest_fitness {
                        pool.with_state(|s| {
                            let _ = s.force_replace_weakest(child);
                        });
                        continue;
                    }

                    children.add(child.clone());
                    on_diagnostic(DiagnosticEvent::ChildAccumulated);

                    let current_best = pool.with_state(|s| s.best().clone());
                    if !config
                        .comparator
                        .is_better(child_fitness, current_best.sequence.fitness())
                    {
                        continue;
                    }

                    stats.record_improvement();
                    if current_best.id == proposal.parent {
                        stats.record_best_parent_success();
                    }

                    pool.with_state(|s| {
                        let _ = s.force_replace_weakest(child.clone());
                    });

                    let child_parent = pool.with_state(|s| s.arena().get(proposal.parent).clone());
                    if !children.contains(child_parent.genes()) {
                        children.add(child_parent);
                    }

                    let success_count = worker.record.record_success();
                    if success_count > max_strategy_success {
                        max_strategy_success = success_count;
                    }
                    start = Instant::now();

                    info!(
                        strategy = worker.record.name(),
                        fitness = child_fitness,
                        "improvement"
                    );

                    on_diagnostic(DiagnosticEvent::Improvement {
                        genes: proposal.genes.as_str(),
                        strategy_name: worker.record.name(),
                    });
                }
                None => {
                    if start.elapsed().as_secs_f64() >= config.max_seconds_without_improvement {
                        let mut result = pool.with_state(|s| s.best().sequence.clone());
                        drain_children_into_pool(pool, &mut children);
                        let refreshed_best = pool.with_state(|s| s.best().sequence.clone());
                        if config
                            .comparator
                            .is_better(refreshed_best.fitness(), result.fitness())
                        {
                            result = refreshed_best;
                        }
                        return result;
                    }
                    if children.should_promote(start.elapsed(), stagnation_window) {
                        promote(pool, &mut children, config.comparator, &mut on_diagnostic);
                    }
                }
            }
        }
        if !sweep_found_eligible_strategy {
            empty_sweeps += 1;
        }
    }
}

fn promote(
    pool: &SharedPool,
    children: &mut ChallengerPool,
    comparator: Comparator,
    on_diagnostic: &mut impl FnMut(DiagnosticEvent),
) {
    let promoted: Vec<Sequence> = children.members.drain(..).collect();
    debug!(count = promoted.len(), "promoting challenger pool");
    let capacity = pool.with_state(|s| s.capacity());
    pool.with_state(|s| s.replace_all(promoted));
    let new_best = pool.with_state(|s| s.best().sequence.clone());
    *children = ChallengerPool::seeded_with(new_best, capacity, comparator);
    on_diagnostic(DiagnosticEvent::Promotion);
}

/// Appends any sequences still held in the challenger pool into the real
/// pool at inner-search termination. The real pool's bound is tolerated as
/// transiently exceeded here; the next stage (hill-climbing's grow step,
/// or the façade's return) re-bounds it.
fn drain_children_into_pool(pool: &SharedPool, children: &mut ChallengerPool) {
    pool.with_state(|s| {
        for child in children.members.drain(..) {
            if !s.contains(child.genes()) {
                let _ = s.force_replace_weakest(child);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn challenger_pool_appends_while_fitness_diversity_is_low() {
        let mut children =
            ChallengerPool::seeded_with(Sequence::seeded("aaa", 1), 10, Comparator::HigherIsBetter);
        children.add(Sequence::seeded("bbb", 2));
        children.add(Sequence::seeded("ccc", 3));
        assert_eq!(children.members.len(), 3);
        assert_eq!(children.members[0].genes(), "ccc");
    }

    #[test]
    fn challenger_pool_stops_appending_past_capacity() {
        let mut children =
            ChallengerPool::seeded_with(Sequence::seeded("aaa", 1), 2, Comparator::HigherIsBetter);
        children.add(Sequence::seeded("bbb", 2));
        assert!(children.is_full());
        children.add(Sequence::seeded("ccc", 3));
        assert_eq!(children.members.len(), 2);
        assert_eq!(children.members[0].genes(), "ccc");
    }

    #[test]
    fn should_promote_on_size_threshold() {
        let mut children =
            ChallengerPool::seeded_with(Sequence::seeded("aaa", 1), 50, Comparator::HigherIsBetter);
        for i in 0..25 {
            children.add(Sequence::seeded(format!("s{i}"), i as i64));
        }
        assert!(children.should_promote(Duration::from_secs(0), Duration::from_secs(20)));
    }

    #[test]
    fn run_inner_search_returns_best_on_immediate_stagnation() {
        use crate::parent_sampler::ParentSampler;
        use crate::strategy::Substitution;

        let pool = SharedPool::new(4, Comparator::HigherIsBetter);
        pool.admit(Sequence::seeded("aaa", 0));

        let stats = ImprovementStats::new();
        let random = Random::new(1);
        let shutdown = crate::domain::Shutdown::new();

        let sampler_receiver =
            ParentSampler::spawn(pool.clone(), stats.clone(), random.clone(), shutdown.clone());
        let sampler = Arc::new(ParentSampler::from_receiver(sampler_receiver));

        let (chromosome_tx, chromosome_rx) = std::sync::mpsc::sync_channel::<String>(1);
        std::mem::forget(chromosome_tx);
        let chromosome_rx = Arc::new(std::sync::Mutex::new(chromosome_rx));

        let worker = StrategyWorker::spawn(
            crate::sequence::StrategyId(0),
            Substitution::new(vec!["a".to_string()]),
            sampler,
            chromosome_rx,
            random.clone(),
            shutdown.clone(),
            4,
        );

        let config = CoordinatorConfig {
            max_seconds_without_improvement: 0.01,
            comparator: Comparator::HigherIsBetter,
        };

        let result = run_inner_search(
            &pool,
            std::slice::from_ref(&worker),
            &stats,
            &random,
            &config,
            |_| 0,
            |_| {},
        );

        assert_eq!(result.genes(), "aaa");
        shutdown.signal();
        worker.join();
    }
}
