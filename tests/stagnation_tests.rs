//! A fitness function that always returns the same value can never produce
//! a strict improvement, so the display sink must fire exactly once (the
//! initial parent) before the stagnation window forces termination.

mod utils;

#[cfg(test)]
mod tests {
    use super::utils::*;
    use gene_search::Solver;

    #[test]
    fn display_fires_exactly_once_when_fitness_never_improves() {
        let config = Solver::builder()
            .rand_seed(3)
            .max_seconds_without_improvement(0.2)
            .build();
        let solver = Solver::new(config);

        let mut display_calls = 0usize;
        let result = solver
            .get_best(lowercase_alphabet(), 1, 6, |_| 0, |_| {
                display_calls += 1;
            })
            .expect("valid configuration");

        assert_eq!(display_calls, 1);
        assert_eq!(result.chars().count(), 6);
    }
}
