//! A single-symbol gene set can only ever produce one distinct gene-string,
//! so the pool's uniqueness constraint must not cause the search to livelock
//! waiting for a variety that can never exist.

#[cfg(test)]
mod tests {
    use gene_search::Solver;

    #[test]
    fn single_symbol_alphabet_terminates_without_livelock() {
        let config = Solver::builder()
            .rand_seed(7)
            .max_seconds_without_improvement(1.0)
            .build();
        let solver = Solver::new(config);

        let result = solver
            .get_best(
                vec!["x".to_string()],
                1,
                4,
                |candidate| candidate.len() as i64,
                |_| {},
            )
            .expect("valid configuration");

        assert_eq!(result, "xxxx");
    }
}
