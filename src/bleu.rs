//! BLEU scoring over whitespace-separated word tokens.
//!
//! The scorer is independent of the subword pipeline: both strings are split
//! into word-level tokens and compared through clipped n-gram precision. No
//! brevity penalty is applied, so a candidate that is a clean prefix of the
//! reference can still score 1.0.

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::error::{Result, SubtokError};

/// Highest n-gram order used by the scorer when callers have no reason to
/// choose otherwise.
pub const DEFAULT_MAX_ORDER: usize = 3;

/// Returns every contiguous n-gram of `order` tokens, in sequence order.
///
/// Sequences shorter than `order`, and an order of zero, produce no n-grams.
#[must_use]
pub fn collect_ngrams<T>(tokens: &[T], order: usize) -> Vec<&[T]> {
    if order == 0 || tokens.len() < order {
        return Vec::new();
    }
    tokens.windows(order).collect()
}

/// Computes clipped n-gram precision of `actual_ngrams` against
/// `reference_ngrams`.
///
/// An n-gram occurring `k` times in the candidate contributes at most
/// `min(k, reference occurrences)` matches; the total is divided by the
/// candidate's n-gram count. An empty candidate scores 0.0.
#[must_use]
pub fn calculate_precision<T>(actual_ngrams: &[&[T]], reference_ngrams: &[&[T]]) -> f64
where
    T: Eq + Hash,
{
    if actual_ngrams.is_empty() {
        return 0.0;
    }

    let mut reference_counts: FxHashMap<&[T], usize> = FxHashMap::default();
    for ngram in reference_ngrams {
        *reference_counts.entry(ngram).or_insert(0) += 1;
    }
    let mut actual_counts: FxHashMap<&[T], usize> = FxHashMap::default();
    for ngram in actual_ngrams {
        *actual_counts.entry(ngram).or_insert(0) += 1;
    }

    let matched: usize = actual_counts
        .iter()
        .map(|(ngram, &count)| count.min(reference_counts.get(ngram).copied().unwrap_or(0)))
        .sum();
    matched as f64 / actual_ngrams.len() as f64
}

/// Geometric mean of per-order precisions, dividing by `max_order`.
///
/// Any non-positive precision collapses the mean to 0.0; no smoothing is
/// applied.
#[must_use]
pub fn geo_mean(precisions: &[f64], max_order: usize) -> f64 {
    if max_order == 0 || precisions.is_empty() {
        return 0.0;
    }
    let mut log_sum = 0.0;
    for &precision in precisions {
        if precision <= 0.0 {
            return 0.0;
        }
        log_sum += precision.ln();
    }
    (log_sum / max_order as f64).exp()
}

/// Scores `actual` against `reference` with BLEU over orders `1..=max_order`.
///
/// Both strings are whitespace-tokenized at the word level; subword
/// vocabularies play no part here. There is no brevity penalty.
///
/// # Errors
///
/// Returns [`SubtokError::InvalidConfig`] when `max_order` is zero.
pub fn calculate_bleu(actual: &str, reference: &str, max_order: usize) -> Result<f64> {
    if max_order == 0 {
        return Err(SubtokError::InvalidConfig(
            "max_order must be greater than zero".into(),
        ));
    }

    let actual_tokens: Vec<&str> = actual.split_whitespace().collect();
    let reference_tokens: Vec<&str> = reference.split_whitespace().collect();

    let precisions: Vec<f64> = (1..=max_order)
        .map(|order| {
            let actual_ngrams = collect_ngrams(&actual_tokens, order);
            let reference_ngrams = collect_ngrams(&reference_tokens, order);
            calculate_precision(&actual_ngrams, &reference_ngrams)
        })
        .collect();

    Ok(geo_mean(&precisions, max_order))
}
