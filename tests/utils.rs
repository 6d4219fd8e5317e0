//! Shared fixtures for the integration suite, factoring out the setup every
//! test file otherwise repeats.

pub fn lowercase_alphabet() -> Vec<String> {
    "abcdefghijklmnopqrstuvwxyz "
        .chars()
        .map(|c| c.to_string())
        .collect()
}

pub fn binary_alphabet() -> Vec<String> {
    vec!["0".to_string(), "1".to_string()]
}

/// Counts matching positions between `candidate` and `target`, the fitness
/// function most of these tests are built on.
pub fn matches(target: &'static str) -> impl FnMut(&str) -> i64 {
    move |candidate: &str| {
        candidate
            .chars()
            .zip(target.chars())
            .filter(|(a, b)| a == b)
            .count() as i64
    }
}
