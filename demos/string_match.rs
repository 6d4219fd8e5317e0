//! Fixed-length string match run through `Solver::get_best` rather than
//! hill-climbing.

use gene_search::Solver;

fn alphabet() -> Vec<String> {
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ, !"
        .chars()
        .map(|c| c.to_string())
        .collect()
}

fn main() {
    gene_search::init_logging();

    let target = "Hello, World!";
    let config = Solver::builder()
        .print_diagnostic_info(true)
        .print_strategy_usage(true)
        .build();
    let solver = Solver::new(config);

    let result = solver
        .get_best(
            alphabet(),
            1,
            target.chars().count(),
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
