//! Default accuracy and coherence metrics.
//!
//! Accuracy is a fuzzy token-set similarity, so "Final: Paris" matches the
//! reference "Paris" perfectly. Coherence rewards varied, reasonably long
//! output.

use std::collections::BTreeSet;

use crate::domain::ports::{AccuracyMetric, CoherenceMetric};

/// Output length (in tokens) at which the coherence length bonus saturates.
const COHERENCE_FULL_LENGTH: f64 = 50.0;

/// Token-set fuzzy match between prediction and reference.
#[derive(Debug, Clone, Copy, Default)]
pub struct FuzzyAccuracy;

impl AccuracyMetric for FuzzyAccuracy {
    fn accuracy(&self, prediction: &str, reference: &str) -> f64 {
        token_set_similarity(prediction, reference)
    }
}

/// Lexical diversity plus length bonus.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleCoherence;

impl CoherenceMetric for SimpleCoherence {
    fn coherence(&self, prediction: &str) -> f64 {
        let tokens: Vec<&str> = prediction.split_whitespace().collect();
        if tokens.is_empty() {
            return 0.0;
        }
        let unique: BTreeSet<&str> = tokens.iter().copied().collect();
        let uniq_ratio = unique.len() as f64 / tokens.len() as f64;
        let length_bonus = (tokens.len() as f64 / COHERENCE_FULL_LENGTH).min(1.0);
        (0.5 * uniq_ratio + 0.5 * length_bonus).clamp(0.0, 1.0)
    }
}

/// Similarity in [0, 1] of two strings compared as whitespace token sets.
///
/// Shared tokens are factored out; the remainder of each side is sorted and
/// joined, and the best of three Indel similarities wins: difference vs
/// difference, and shared vs shared+difference for each side.
pub fn token_set_similarity(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let shared: Vec<&str> = tokens_a.intersection(&tokens_b).copied().collect();
    let only_a: Vec<&str> = tokens_a.difference(&tokens_b).copied().collect();
    let only_b: Vec<&str> = tokens_b.difference(&tokens_a).copied().collect();

    if !shared.is_empty() && (only_a.is_empty() || only_b.is_empty()) {
        return 1.0;
    }

    // BTreeSet iteration is already sorted.
    let diff_a = only_a.join(" ");
    let diff_b = only_b.join(" ");
    let len_a = diff_a.chars().count();
    let len_b = diff_b.chars().count();
    let shared_len = shared.join(" ").chars().count();
    let sep = usize::from(shared_len != 0);

    let shared_a_len = shared_len + sep + len_a;
    let shared_b_len = shared_len + sep + len_b;

    let dist = indel_distance(&diff_a, &diff_b);
    let mut best = normalized_similarity(dist, shared_a_len + shared_b_len);
    if shared_len == 0 {
        return best;
    }

    // shared+diff vs shared differ only by the appended difference.
    best = best.max(normalized_similarity(sep + len_a, shared_len + shared_a_len));
    best.max(normalized_similarity(sep + len_b, shared_len + shared_b_len))
}

fn normalized_similarity(dist: usize, len_sum: usize) -> f64 {
    if len_sum == 0 {
        1.0
    } else {
        1.0 - dist as f64 / len_sum as f64
    }
}

/// Insertions plus deletions needed to turn `a` into `b`.
fn indel_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    a.len() + b.len() - 2 * lcs_len(&a, &b)
}

fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_prefixed_answer_matches_reference() {
        assert!(approx(token_set_similarity("Final: Paris", "Paris"), 1.0));
        assert!(approx(token_set_similarity("Final: J.K. Rowling", "J.K. Rowling"), 1.0));
    }

    #[test]
    fn test_wrong_answer_scores_low() {
        // LCS("Final: Not sure", "Paris") = 2 -> 1 - 16/20
        assert!(approx(token_set_similarity("Final: Not sure", "Paris"), 0.2));
        assert!(approx(token_set_similarity("London", "Paris"), 0.0));
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(token_set_similarity("", "Paris"), 0.0);
        assert_eq!(token_set_similarity("Paris", "   "), 0.0);
    }

    #[test]
    fn test_partial_overlap_uses_shared_tokens() {
        // shared "Final:" (6), diffs "44" and "45" (2 each)
        // diff vs diff: dist 2 over 18 -> 0.888..; shared vs shared+diff: 3 over 15 -> 0.8
        let sim = token_set_similarity("Final: 44", "Final: 45");
        assert!(approx(sim, 1.0 - 2.0 / 18.0));
    }

    #[test]
    fn test_case_sensitive() {
        assert!(token_set_similarity("paris", "Paris") < 1.0);
    }

    #[test]
    fn test_coherence() {
        let c = SimpleCoherence;
        assert_eq!(c.coherence(""), 0.0);
        assert!(approx(c.coherence("Paris"), 0.51));
        // 2 unique of 4 tokens
        assert!(approx(c.coherence("a a b b"), 0.5 * 0.5 + 0.5 * 0.08));

        let long: String = (0..60).map(|i| format!("w{i} ")).collect();
        assert!(approx(c.coherence(&long), 1.0));
    }
}
