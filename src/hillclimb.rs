//! Hill-climbing outer loop: grows the target sequence's chromosome count
//! in stages, restarting the inner search with a longer target after each
//! stage's growth step.

use std::sync::Arc;
use std::time::Duration;

use crate::comparator::Comparator;
use crate::coordinator::{run_inner_search, CoordinatorConfig, DiagnosticEvent};
use crate::domain::Random;
use crate::parent_sampler::ImprovementStats;
use crate::pool::SharedPool;
use crate::sequence::Sequence;
use crate::strategy::StrategyWorker;
use tracing::info;

const GROW_ATTEMPTS: usize = 100;

pub struct HillClimbConfig {
    pub max_generations: usize,
    pub length: usize,
    pub best_possible_fitness: i64,
    pub max_rounds_without_improvement: usize,
    pub max_seconds_without_improvement: f64,
    pub comparator: Comparator,
}

/// Runs the staged outer loop, calling `run_inner_search` once per stage and
/// growing every pool member by one fresh chromosome between stages.
/// `chromosome_source` supplies one freshly drawn chromosome of
/// `config.length` genes per call.
#[allow(clippy::too_many_arguments)]
pub fn run_hill_climbing(
    pool: &SharedPool,
    strategies: &[StrategyWorker],
    stats: &Arc<ImprovementStats>,
    random: &Random,
    config: &HillClimbConfig,
    mut fitness: impl FnMut(&str) -> i64,
    mut chromosome_source: impl FnMut() -> String,
    mut on_improvement: impl FnMut(&str),
    mut on_diagnostic: impl FnMut(DiagnosticEvent),
) -> Sequence {
    let mut generation = 1usize;
    let mut rounds_since_improvement = 0usize;
    let mut best_ever = pool.with_state(|s| s.best().sequence.clone());
    on_improvement(best_ever.genes());

    loop {
        let coordinator_config = CoordinatorConfig {
            max_seconds_without_improvement: config.max_seconds_without_improvement,
            comparator: config.comparator,
        };
        let result = run_inner_search(
            pool,
            strategies,
            stats,
            random,
            &coordinator_config,
            &mut fitness,
            &mut on_diagnostic,
        );

        if config.comparator.is_better(result.fitness(), best_ever.fitness()) {
            rounds_since_improvement = 0;
            best_ever = result;
            on_improvement(best_ever.genes());
            if config
                .comparator
                .has_reached(best_ever.fitness(), config.best_possible_fitness)
            {
                return best_ever;
            }
        } else {
            rounds_since_improvement += 1;
            if rounds_since_improvement >= config.max_rounds_without_improvement {
                return best_ever;
            }
        }

        info!(
            generation,
            fitness = best_ever.fitness(),
            length = best_ever.genes().len(),
            "stage complete"
        );

        generation += 1;
        if generation > config.max_generations {
            return best_ever;
        }

        grow_pool(
            pool,
            config,
            &mut best_ever,
            &mut rounds_since_improvement,
            &mut fitness,
            &mut chromosome_source,
            &mut on_improvement,
        );
    }
}

/// For each current pool entry, appends a freshly drawn chromosome,
/// skipping duplicates and keeping up to the pool's capacity; stops early
/// the moment any concatenated sequence strictly beats `best_ever`. Retries
/// the whole attempt up to `GROW_ATTEMPTS` times or until one improvement
/// is recorded.
fn grow_pool(
    pool: &SharedPool,
    config: &HillClimbConfig,
    best_ever: &mut Sequence,
    rounds_since_improvement: &mut usize,
    fitness: &mut impl FnMut(&str) -> i64,
    chromosome_source: &mut impl FnMut() -> String,
    on_improvement: &mut impl FnMut(&str),
) {
    let capacity = pool.with_state(|s| s.capacity());
    let parents = pool.snapshot();

    for _ in 0..GROW_ATTEMPTS {
        let mut new_pool = SharedPool::new(capacity, config.comparator);
        let mut improved = false;

        for parent in &parents {
            let mut genes = parent.sequence.genes().to_string();
            genes.push_str(&chromosome_source());
            if new_pool.contains(&genes) {
                continue;
            }
            let score = fitness(&genes);
            new_pool.admit(Sequence::seeded(genes.clone(), score));

            if config.comparator.is_better(score, best_ever.fitness()) {
                *rounds_since_improvement = 0;
                *best_ever = Sequence::seeded(genes, score);
                on_improvement(best_ever.genes());
                improved = true;
                break;
            }
        }

        let snapshot = new_pool.snapshot();
        pool.with_state(|s| {
            s.replace_all(snapshot.into_iter().map(|m| m.sequence).collect());
        });

        if improved {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grow_pool_extends_every_member_by_one_chromosome() {
        let pool = SharedPool::new(4, Comparator::HigherIsBetter);
        pool.admit(Sequence::seeded("aa", 0));

        let config = HillClimbConfig {
            max_generations: 4,
            length: 1,
            best_possible_fitness: 100,
            max_rounds_without_improvement: 2,
            max_seconds_without_improvement: 1.0,
            comparator: Comparator::HigherIsBetter,
        };

        let mut best_ever = Sequence::seeded("aa", 0);
        let mut rounds = 0usize;
        let mut calls = 0usize;

        grow_pool(
            &pool,
            &config,
            &mut best_ever,
            &mut rounds,
            &mut |genes| genes.len() as i64,
            &mut || {
                calls += 1;
                "b".to_string()
            },
            &mut |_| {},
        );

        let snap = pool.snapshot();
        assert!(snap.iter().any(|m| m.sequence.genes() == "aab"));
    }
}
