//! The public façade: two entry points, `get_best` (fixed-length search)
//! and `get_best_using_hill_climbing` (the growing-length outer loop), that
//! own the lifecycle of every producer thread, channel, and pool the rest
//! of the crate defines. Neither entry point keeps state between calls — a
//! [`Solver`] is just its [`SolverConfig`]; everything a search needs is
//! created fresh on entry and torn down before return.

use std::cell::RefCell;
use std::io::Write;
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::{SolverConfig, SolverConfigBuilder};
use crate::coordinator::{run_inner_search, CoordinatorConfig, DiagnosticEvent};
use crate::domain::{Random, Shutdown};
use crate::error::SolverResult;
use crate::gene::{ChromosomeStream, GeneSet, GeneStream};
use crate::hillclimb::{run_hill_climbing, HillClimbConfig};
use crate::parent_sampler::{ImprovementStats, ParentSampler};
use crate::pool::{max_pool_size, SharedPool};
use crate::sequence::{Sequence, StrategyId};
use crate::strategy::{Crossover, StrategyWorker, Substitution};

/// Capacity of each strategy worker's outbound queue. Bounded so a fast
/// strategy can't race arbitrarily far ahead of the coordinator's
/// consumption.
const STRATEGY_QUEUE_CAPACITY: usize = 8;

/// The timeout used whenever the façade itself pulls a chromosome directly
/// off the chromosome stream (initial-parent assembly, hill-climbing's grow
/// step) rather than through a strategy worker.
const CHROMOSOME_POLL: Duration = Duration::from_millis(5);

/// The core search engine. Stateless between calls: holds only its
/// configuration, and constructs a fresh pool, strategy pool, and
/// coordinator for each call to either entry point.
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        Solver { config }
    }

    /// Shorthand for `SolverConfig::builder()`, so callers can write
    /// `Solver::new(Solver::builder().lower_fitnesses_are_better(true).build())`.
    pub fn builder() -> SolverConfigBuilder {
        SolverConfig::builder()
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Fixed-length search, a single coordinator call. `gene_set` is the
    /// alphabet, `chromosome_count` is `k`, `length` is `L`. Returns the
    /// best gene-string found once the stagnation window
    /// (`max_seconds_without_improvement`) elapses without improvement.
    pub fn get_best(
        &self,
        gene_set: Vec<String>,
        chromosome_count: usize,
        length: usize,
        mut fitness: impl FnMut(&str) -> i64,
        mut display: impl FnMut(&str),
    ) -> SolverResult<String> {
        SolverConfig::validate_shape(gene_set.len(), chromosome_count, length)?;

        let runtime = Runtime::start(&self.config, gene_set, chromosome_count, length)?;
        let Runtime {
            shutdown,
            random,
            chromosome_receiver,
            pool,
            stats,
            strategies,
            gene_handle,
            chromosome_handle,
            gene_symbols,
        } = runtime;

        let initial_genes: String = (0..chromosome_count)
            .map(|_| recv_chromosome(&chromosome_receiver))
            .collect();
        let initial_fitness = fitness(&initial_genes);
        let max_attempts = pool.with_state(|s| s.capacity()).saturating_mul(20).max(100);
        pool.seed(
            Sequence::seeded(initial_genes, initial_fitness),
            &gene_symbols,
            chromosome_count,
            &random,
            || recv_chromosome(&chromosome_receiver),
            &mut fitness,
            max_attempts,
        )?;

        display(pool.best().sequence.genes());

        let coordinator_config = CoordinatorConfig {
            max_seconds_without_improvement: self.config.max_seconds_without_improvement(),
            comparator: self.config.comparator(),
        };
        let print_diagnostic_info = self.config.print_diagnostic_info();
        let print_strategy_usage = self.config.print_strategy_usage();

        let result = run_inner_search(
            &pool,
            &strategies,
            &stats,
            &random,
            &coordinator_config,
            &mut fitness,
            |event| render_diagnostic(event, print_diagnostic_info, print_strategy_usage, &mut display),
        );

        print_strategy_usage_summary(&self.config, &strategies, &stats);
        teardown(shutdown, strategies, chromosome_receiver, gene_handle, chromosome_handle);

        Ok(result.genes().to_string())
    }

    /// The staged outer loop: growing the chromosome count by one stage at
    /// a time (starting at `k = 1`) until `max_generations` is exhausted,
    /// `best_possible_fitness` is reached, or `max_rounds_without_improvement`
    /// stages pass without a strict improvement.
    pub fn get_best_using_hill_climbing(
        &self,
        gene_set: Vec<String>,
        length: usize,
        max_generations: usize,
        best_possible_fitness: i64,
        mut fitness: impl FnMut(&str) -> i64,
        mut display: impl FnMut(&str),
    ) -> SolverResult<String> {
        SolverConfig::validate_shape(gene_set.len(), 1, length)?;

        let runtime = Runtime::start(&self.config, gene_set, 1, length)?;
        let Runtime {
            shutdown,
            random,
            chromosome_receiver,
            pool,
            stats,
            strategies,
            gene_handle,
            chromosome_handle,
            gene_symbols,
        } = runtime;

        let initial_genes = recv_chromosome(&chromosome_receiver);
        let initial_fitness = fitness(&initial_genes);
        let max_attempts = pool.with_state(|s| s.capacity()).saturating_mul(20).max(100);
        pool.seed(
            Sequence::seeded(initial_genes, initial_fitness),
            &gene_symbols,
            1,
            &random,
            || recv_chromosome(&chromosome_receiver),
            &mut fitness,
            max_attempts,
        )?;

        let hill_climb_config = HillClimbConfig {
            max_generations,
            length,
            best_possible_fitness,
            max_rounds_without_improvement: self.config.max_rounds_without_improvement(),
            max_seconds_without_improvement: self.config.max_seconds_without_improvement(),
            comparator: self.config.comparator(),
        };
        let print_diagnostic_info = self.config.print_diagnostic_info();
        let print_strategy_usage = self.config.print_strategy_usage();

        // `on_improvement` and `on_diagnostic` both ultimately call into the
        // caller's `display` sink, but are two independent `FnMut` slots on
        // `run_hill_climbing`'s signature — both alive for the whole call.
        // A `RefCell` lets each hold only a shared reference to `display`
        // and borrow it mutably at the moment it actually fires, since the
        // two are never called concurrently (single-threaded facade).
        let display_cell = RefCell::new(&mut display);

        let result = run_hill_climbing(
            &pool,
            &strategies,
            &stats,
            &random,
            &hill_climb_config,
            &mut fitness,
            || recv_chromosome(&chromosome_receiver),
            |genes| (*display_cell.borrow_mut())(genes),
            |event| {
                render_diagnostic(event, print_diagnostic_info, print_strategy_usage, &mut |genes| {
                    (*display_cell.borrow_mut())(genes)
                })
            },
        );

        print_strategy_usage_summary(&self.config, &strategies, &stats);
        teardown(shutdown, strategies, chromosome_receiver, gene_handle, chromosome_handle);

        Ok(result.genes().to_string())
    }
}

/// Everything a single solver call needs: its random source, shutdown
/// broadcast, gene/chromosome streams, pool, and running strategy workers.
/// A plain data bag rather than a type with methods, so the façade can
/// destructure it into independent locals and avoid the borrow conflicts
/// that come from calling back into `self` while other fields are
/// separately borrowed.
struct Runtime {
    shutdown: Shutdown,
    random: Random,
    chromosome_receiver: Arc<Mutex<Receiver<String>>>,
    pool: SharedPool,
    stats: Arc<ImprovementStats>,
    strategies: Vec<StrategyWorker>,
    gene_handle: JoinHandle<()>,
    chromosome_handle: JoinHandle<()>,
    gene_symbols: Vec<String>,
}

impl Runtime {
    fn start(
        config: &SolverConfig,
        gene_symbols: Vec<String>,
        chromosome_count: usize,
        length: usize,
    ) -> SolverResult<Self> {
        let gene_set = GeneSet::new(gene_symbols.clone())?;
        let random = Random::new(config.rand_seed());
        let shutdown = Shutdown::new();

        let gene_stream = GeneStream::spawn(gene_set, random.clone(), shutdown.clone(), length);
        let (gene_receiver, gene_handle) = gene_stream.into_parts();
        let chromosome_stream = ChromosomeStream::spawn(gene_receiver, shutdown.clone(), length);
        let (chromosome_receiver, chromosome_handle) = chromosome_stream.into_parts();
        let chromosome_receiver = Arc::new(Mutex::new(chromosome_receiver));

        let capacity = max_pool_size(gene_symbols.len(), chromosome_count, length);
        let pool = SharedPool::new(capacity, config.comparator());

        let stats = ImprovementStats::new();
        let sampler_receiver = ParentSampler::spawn(
            pool.clone(),
            Arc::clone(&stats),
            random.clone(),
            shutdown.clone(),
        );
        let sampler = Arc::new(ParentSampler::from_receiver(sampler_receiver));

        let strategies = vec![
            StrategyWorker::spawn(
                StrategyId(0),
                Substitution::new(gene_symbols.clone()),
                Arc::clone(&sampler),
                Arc::clone(&chromosome_receiver),
                random.clone(),
                shutdown.clone(),
                STRATEGY_QUEUE_CAPACITY,
            ),
            StrategyWorker::spawn(
                StrategyId(1),
                Crossover,
                Arc::clone(&sampler),
                Arc::clone(&chromosome_receiver),
                random.clone(),
                shutdown.clone(),
                STRATEGY_QUEUE_CAPACITY,
            ),
        ];

        Ok(Runtime {
            shutdown,
            random,
            chromosome_receiver,
            pool,
            stats,
            strategies,
            gene_handle,
            chromosome_handle,
            gene_symbols,
        })
    }
}

/// Pulls one chromosome off the shared stream, polling rather than blocking
/// indefinitely so a caller can never wedge on a producer that has already
/// observed shutdown.
fn recv_chromosome(receiver: &Mutex<Receiver<String>>) -> String {
    loop {
        let next = receiver.lock().unwrap().recv_timeout(CHROMOSOME_POLL);
        if let Ok(chromosome) = next {
            return chromosome;
        }
    }
}

/// Renders one coordinator diagnostic event: the `.`/`+`/`>` progress
/// markers, the strategy-name prefix printed ahead of an improvement line,
/// and the display-sink call every strict improvement triggers.
fn render_diagnostic(
    event: DiagnosticEvent,
    print_diagnostic_info: bool,
    print_strategy_usage: bool,
    display: &mut impl FnMut(&str),
) {
    match event {
        DiagnosticEvent::ChildAccumulated => {
            if print_diagnostic_info {
                print_marker('.');
            }
        }
        DiagnosticEvent::Promotion => {
            if print_diagnostic_info {
                print_marker('>');
            }
        }
        DiagnosticEvent::Improvement { genes, strategy_name } => {
            if print_diagnostic_info {
                print_marker('+');
            }
            if print_strategy_usage {
                print!("{strategy_name} ");
                let _ = std::io::stdout().flush();
            }
            display(genes);
        }
    }
}

fn print_marker(marker: char) {
    print!("{marker}");
    let _ = std::io::stdout().flush();
}

/// Per-strategy success count and percentage of all improvements, plus the
/// percentage of improvements whose parent was the reigning champion.
fn print_strategy_usage_summary(
    config: &SolverConfig,
    strategies: &[StrategyWorker],
    stats: &ImprovementStats,
) {
    if !config.print_strategy_usage() {
        return;
    }
    let total = stats.number_of_improvements();
    println!();
    println!("strategy usage ({total} improvements):");
    for worker in strategies {
        let successes = worker.record.success_count();
        let percentage = if total == 0 {
            0.0
        } else {
            successes as f64 / total as f64 * 100.0
        };
        println!(
            "  {:<16} {:>6} successes ({:.1}%)",
            worker.record.name(),
            successes,
            percentage
        );
    }
    let best_parent_percentage = if total == 0 {
        0.0
    } else {
        stats.success_parent_is_best_count() as f64 / total as f64 * 100.0
    };
    println!("  children of reigning champion: {:.1}%", best_parent_percentage);
}

/// Tears every long-lived producer down: raise the shutdown broadcast, let
/// the coordinator's own strategy workers drain and join, then drain the
/// one shared chromosome slot (unblocking its producer if it is mid-send)
/// before joining the chromosome and gene threads in that order, since the
/// gene thread's exit depends on the chromosome thread having already
/// dropped its receiver.
fn teardown(
    shutdown: Shutdown,
    strategies: Vec<StrategyWorker>,
    chromosome_receiver: Arc<Mutex<Receiver<String>>>,
    gene_handle: JoinHandle<()>,
    chromosome_handle: JoinHandle<()>,
) {
    shutdown.signal();
    for worker in strategies {
        worker.join();
    }
    let _ = chromosome_receiver.lock().unwrap().try_recv();
    crate::domain::join_all(vec![chromosome_handle, gene_handle]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(target: &str) -> impl FnMut(&str) -> i64 + '_ {
        move |candidate: &str| {
            candidate
                .chars()
                .zip(target.chars())
                .filter(|(a, b)| a == b)
                .count() as i64
        }
    }

    fn alphabet() -> Vec<String> {
        "abcdefghijklmnopqrstuvwxyz "
            .chars()
            .map(|c| c.to_string())
            .collect()
    }

    #[test]
    fn get_best_finds_a_short_target() {
        let config = Solver::builder()
            .rand_seed(1)
            .max_seconds_without_improvement(5.0)
            .build();
        let solver = Solver::new(config);
        let mut seen = Vec::new();
        let result = solver
            .get_best(alphabet(), 1, 5, matches("hello"), |genes| {
                seen.push(genes.to_string());
            })
            .unwrap();
        assert_eq!(result, "hello");
        assert_eq!(seen.last().map(String::as_str), Some("hello"));
    }

    #[test]
    fn get_best_rejects_empty_gene_set() {
        let solver = Solver::new(SolverConfig::default());
        let result = solver.get_best(Vec::new(), 1, 5, |_| 0, |_| {});
        assert!(result.is_err());
    }

    #[test]
    fn get_best_rejects_zero_length() {
        let solver = Solver::new(SolverConfig::default());
        let result = solver.get_best(alphabet(), 1, 0, |_| 0, |_| {});
        assert!(result.is_err());
    }

    #[test]
    fn uniqueness_under_duplicate_pressure_does_not_livelock() {
        let config = Solver::builder()
            .rand_seed(1)
            .max_seconds_without_improvement(1.0)
            .build();
        let solver = Solver::new(config);
        let result = solver
            .get_best(vec!["a".to_string()], 1, 3, |genes| genes.len() as i64, |_| {})
            .unwrap();
        assert_eq!(result, "aaa");
    }

    #[test]
    fn lower_is_better_direction_is_honored() {
        let config = Solver::builder()
            .rand_seed(4)
            .lower_fitnesses_are_better(true)
            .max_seconds_without_improvement(5.0)
            .build();
        let solver = Solver::new(config);
        let gene_set = vec!["0".to_string(), "1".to_string()];
        let result = solver
            .get_best(
                gene_set,
                1,
                8,
                |genes| genes.chars().filter(|c| *c == '0').count() as i64,
                |_| {},
            )
            .unwrap();
        assert_eq!(result, "11111111");
    }

    #[test]
    fn hill_climbing_reaches_a_longer_target_in_one_generation() {
        let config = Solver::builder()
            .rand_seed(2)
            .max_seconds_without_improvement(5.0)
            .build();
        let solver = Solver::new(config);
        let result = solver
            .get_best_using_hill_climbing(alphabet(), 11, 1, 11, matches("hello world"), |_| {})
            .unwrap();
        assert_eq!(result, "hello world");
    }
}
