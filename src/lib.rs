//! Core concurrent search engine for domain-agnostic genetic string
//! solvers: a bounded fitness-sorted parent pool, a pool of independently
//! running strategy workers, a single coordinator, and an optional
//! hill-climbing outer loop that grows the target length in stages.
//!
//! Concrete mutation/crossover operators beyond the two built-ins, the
//! fitness function, and the display sink are supplied by the caller; this
//! crate owns the scheduling, the pool, and the admission rules around them.

pub mod comparator;
pub mod config;
pub mod coordinator;
pub mod domain;
pub mod error;
pub mod gene;
pub mod hillclimb;
pub mod parent_sampler;
pub mod pool;
pub mod sequence;
pub mod solver;
pub mod strategy;

pub use comparator::Comparator;
pub use config::{SolverConfig, SolverConfigBuilder};
pub use error::{SolverError, SolverResult};
pub use gene::GeneSet;
pub use sequence::{Provenance, Sequence, StrategyId};
pub use solver::Solver;
pub use strategy::{Crossover, Propose, Substitution};

/// Initializes the crate's `tracing` subscriber once per process. Safe to
/// call more than once; only the first call installs a subscriber. Callers
/// embedding this crate in their own application with its own subscriber
/// may skip this and configure `tracing` themselves.
pub fn init_logging() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
        std::panic::set_hook(Box::new(|info| {
            tracing::error!("panic: {info}");
        }));
    });
}
