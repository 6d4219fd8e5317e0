//! A short fixed-length target found directly through `get_best`, with no
//! hill-climbing growth needed.

mod utils;

#[cfg(test)]
mod tests {
    use super::utils::*;
    use gene_search::Solver;

    #[test]
    fn finds_hello_with_a_single_chromosome() {
        let config = Solver::builder()
            .rand_seed(11)
            .max_seconds_without_improvement(5.0)
            .build();
        let solver = Solver::new(config);

        let mut displayed = Vec::new();
        let result = solver
            .get_best(lowercase_alphabet(), 1, 5, matches("hello"), |genes| {
                displayed.push(genes.to_string());
            })
            .expect("valid configuration");

        assert_eq!(result, "hello");
        // the display sink must have fired at least once (the initial
        // parent) and its final call must match the returned best.
        assert_eq!(displayed.last().map(String::as_str), Some("hello"));
    }

    #[test]
    fn invalid_configuration_is_rejected_before_any_thread_spawns() {
        let solver = Solver::new(gene_search::SolverConfig::default());
        let err = solver
            .get_best(Vec::new(), 1, 5, |_| 0, |_| {})
            .unwrap_err();
        assert!(matches!(
            err,
            gene_search::SolverError::InvalidConfiguration { .. }
        ));
    }
}
