//! Label alphabet and generation.
//!
//! A label is a concatenation of `length` symbols drawn uniformly from a
//! fixed 16-symbol alphabet. Generation is driven by an explicit seeded RNG
//! passed in by the caller so that a whole planning run is reproducible from
//! a single seed. Uniqueness is not guaranteed per call; the table builder
//! deduplicates within a batch.

use rand::rngs::StdRng;
use rand::Rng;
use regex::Regex;
use std::sync::LazyLock;

/// The 16 recordable symbols, indexed 0-15. Each symbol starts with a
/// capital letter, which is what lets [`component_count`] split a label
/// back into its parts.
pub const ALPHABET: [&str; 16] = [
    "Abi", "Sabz", "Saal", "Ruz", "Faramush", "Ast", "Kheili", "Tabestun", "Bakht", "Diruz",
    "Omidvar", "Maman", "Baba", "Khosh", "Like", "Dislike",
];

static COMPONENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[A-Z][^A-Z]*").expect("component regex"));

/// Generate one label of `length` symbols from `rng`.
pub fn generate_label(rng: &mut StdRng, length: usize) -> String {
    let mut label = String::new();
    for _ in 0..length {
        label.push_str(ALPHABET[rng.gen_range(0..ALPHABET.len())]);
    }
    label
}

/// Number of alphabet components embedded in a label string.
///
/// This is the label's structural length (symbol count), not its character
/// length: each component is a capital-initiated run.
pub fn component_count(label: &str) -> usize {
    COMPONENT.find_iter(label).count()
}
