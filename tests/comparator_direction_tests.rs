//! With `lower_fitnesses_are_better` set, the search must converge toward
//! the fewest possible occurrences of the "bad" gene rather than the most.

mod utils;

#[cfg(test)]
mod tests {
    use super::utils::*;
    use gene_search::Solver;

    #[test]
    fn lower_is_better_minimizes_zero_count() {
        let config = Solver::builder()
            .rand_seed(6)
            .lower_fitnesses_are_better(true)
            .max_seconds_without_improvement(5.0)
            .build();
        let solver = Solver::new(config);

        let result = solver
            .get_best(
                binary_alphabet(),
                1,
                10,
                |candidate| candidate.chars().filter(|c| *c == '0').count() as i64,
                |_| {},
            )
            .expect("valid configuration");

        assert_eq!(result, "1".repeat(10));
    }
}
