//! Solver configuration options, collected into a struct with a fluent,
//! consuming-`self` builder covering the six options the core recognizes.

use crate::comparator::Comparator;
use crate::error::{SolverError, SolverResult};

const DEFAULT_MAX_SECONDS_WITHOUT_IMPROVEMENT: f64 = 20.0;
const DEFAULT_MAX_ROUNDS_WITHOUT_IMPROVEMENT: usize = 2;

#[derive(Clone, Debug)]
pub struct SolverConfig {
    max_seconds_without_improvement: f64,
    max_rounds_without_improvement: usize,
    lower_fitnesses_are_better: bool,
    print_strategy_usage: bool,
    print_diagnostic_info: bool,
    rand_seed: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            max_seconds_without_improvement: DEFAULT_MAX_SECONDS_WITHOUT_IMPROVEMENT,
            max_rounds_without_improvement: DEFAULT_MAX_ROUNDS_WITHOUT_IMPROVEMENT,
            lower_fitnesses_are_better: false,
            print_strategy_usage: false,
            print_diagnostic_info: false,
            rand_seed: 0,
        }
    }
}

impl SolverConfig {
    pub fn builder() -> SolverConfigBuilder {
        SolverConfigBuilder::default()
    }

    pub fn max_seconds_without_improvement(&self) -> f64 {
        self.max_seconds_without_improvement
    }

    pub fn max_rounds_without_improvement(&self) -> usize {
        self.max_rounds_without_improvement
    }

    pub fn comparator(&self) -> Comparator {
        if self.lower_fitnesses_are_better {
            Comparator::LowerIsBetter
        } else {
            Comparator::HigherIsBetter
        }
    }

    pub fn print_strategy_usage(&self) -> bool {
        self.print_strategy_usage
    }

    pub fn print_diagnostic_info(&self) -> bool {
        self.print_diagnostic_info
    }

    pub fn rand_seed(&self) -> u64 {
        self.rand_seed
    }

    /// Validates configuration shared by both entry points: non-positive
    /// chromosome length or count, an empty gene set. `bestPossibleFitness`
    /// reachability is not independently validated — the core has no way to
    /// learn the caller's fitness function's range, so an unreachable target
    /// simply degrades to ordinary `MaxRoundsWithoutImprovement`-bounded
    /// completion in the hill-climbing loop rather than a validation error
    /// (see DESIGN.md).
    pub fn validate_shape(gene_set_len: usize, chromosome_count: usize, length: usize) -> SolverResult<()> {
        if gene_set_len == 0 {
            return Err(SolverError::invalid_configuration("gene set must not be empty"));
        }
        if length == 0 {
            return Err(SolverError::invalid_configuration(
                "chromosome length L must be positive",
            ));
        }
        if chromosome_count == 0 {
            return Err(SolverError::invalid_configuration(
                "number of chromosomes k must be positive",
            ));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct SolverConfigBuilder {
    config: SolverConfig,
}

impl SolverConfigBuilder {
    pub fn max_seconds_without_improvement(mut self, value: f64) -> Self {
        self.config.max_seconds_without_improvement = value;
        self
    }

    pub fn max_rounds_without_improvement(mut self, value: usize) -> Self {
        self.config.max_rounds_without_improvement = value;
        self
    }

    pub fn lower_fitnesses_are_better(mut self, value: bool) -> Self {
        self.config.lower_fitnesses_are_better = value;
        self
    }

    pub fn print_strategy_usage(mut self, value: bool) -> Self {
        self.config.print_strategy_usage = value;
        self
    }

    pub fn print_diagnostic_info(mut self, value: bool) -> Self {
        self.config.print_diagnostic_info = value;
        self
    }

    pub fn rand_seed(mut self, value: u64) -> Self {
        self.config.rand_seed = value;
        self
    }

    pub fn build(self) -> SolverConfig {
        self.config
    }
}
