//! Feature hashing of text into fixed-size vectors
//!
//! Words and their character trigrams are hashed to vector positions.
//! Deterministic for a given dimension; no model files required.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

/// Weight of a whole-word hit relative to a trigram hit
const WORD_WEIGHT: f32 = 2.0;

/// Lowercase word tokens, split on whitespace and punctuation
///
/// Single-character tokens are dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
        .map(|s| s.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
        .filter(|s| s.chars().count() > 1)
        .collect()
}

/// Generate character trigrams from a word, padded with two spaces per side
pub fn generate_trigrams(s: &str) -> HashSet<String> {
    let padded = format!("  {}  ", s);
    let chars: Vec<char> = padded.chars().collect();

    if chars.len() < 3 {
        return HashSet::new();
    }

    chars.windows(3)
        .map(|w| w.iter().collect::<String>())
        .collect()
}

fn bucket<T: Hash + ?Sized>(value: &T, dim: usize) -> usize {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    (hasher.finish() % dim as u64) as usize
}

/// Hash a text to a unit vector of `dim` components
///
/// Text without any token maps to the zero vector.
pub fn hash_text_to_vector(text: &str, dim: usize) -> Vec<f32> {
    let mut vector = vec![0.0f32; dim];
    if dim == 0 {
        return vector;
    }

    for word in tokenize(text) {
        vector[bucket(word.as_str(), dim)] += WORD_WEIGHT;
        for trigram in generate_trigrams(&word) {
            vector[bucket(trigram.as_str(), dim)] += 1.0;
        }
    }

    let magnitude: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if magnitude > 0.0 {
        for v in &mut vector {
            *v /= magnitude;
        }
    }

    vector
}
