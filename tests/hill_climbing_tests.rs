//! The hill-climbing outer loop reaching a longer target in one stage, and
//! growing the chromosome count across several stages when one stage alone
//! isn't enough.

mod utils;

#[cfg(test)]
mod tests {
    use super::utils::*;
    use gene_search::Solver;

    #[test]
    fn reaches_hello_world_in_a_single_generation() {
        let config = Solver::builder()
            .rand_seed(2)
            .max_seconds_without_improvement(5.0)
            .build();
        let solver = Solver::new(config);

        let result = solver
            .get_best_using_hill_climbing(
                lowercase_alphabet(),
                11,
                1,
                11,
                matches("hello world"),
                |_| {},
            )
            .expect("valid configuration");

        assert_eq!(result, "hello world");
    }

    #[test]
    fn grows_the_pool_across_generations_to_reach_a_repeated_target() {
        // Target is twenty repetitions of a single gene: a single
        // one-gene-long chromosome can't reach it, so the outer loop must
        // grow the pool across more than one stage.
        const TARGET: &str = "aaaaaaaaaaaaaaaaaaaa";
        let config = Solver::builder()
            .rand_seed(5)
            .max_seconds_without_improvement(2.0)
            .build();
        let solver = Solver::new(config);

        let gene_set = vec!["a".to_string(), "b".to_string()];
        let result = solver
            .get_best_using_hill_climbing(gene_set, 1, 25, TARGET.len() as i64, matches(TARGET), |_| {})
            .expect("valid configuration");

        assert_eq!(result, TARGET);
    }
}
