//! Growing-length search via `Solver::get_best_using_hill_climbing`: starts
//! at one chromosome and grows toward a full sentence, one chromosome per
//! stage, at a human-readable target instead of a single repeated gene.

use gene_search::Solver;

fn alphabet() -> Vec<String> {
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ, !"
        .chars()
        .map(|c| c.to_string())
        .collect()
}

fn main() {
    gene_search::init_logging();

    let target = "Hello world, this is a genetic algorithm!";
    let config = Solver::builder()
        .print_diagnostic_info(true)
        .print_strategy_usage(true)
        .max_seconds_without_improvement(10.0)
        .build();
    let solver = Solver::new(config);

    let chromosome_length = 6;
    let max_generations = (target.chars().count() / chromosome_length) + 2;

    let result = solver
        .get_best_using_hill_climbing(
            alphabet(),
            chromosome_length,
            max_generations,
            target.chars().count() as i64,
            |candidate| {
                candidate
                    .chars()
                    .zip(target.chars())
                    .filter(|(a, b)| a == b)
                    .count() as i64
            },
            |genes| println!("{genes}"),
        )
        .expect("valid configuration");

    println!("\nresult: {result}");
}
