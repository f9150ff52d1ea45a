//! Core training loop: pair counting, merging, and merge selection.

mod word;

use std::path::Path;
use std::time::Instant;

use log::info;
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::config::{IngestConfig, TrainerBuilder, TrainerConfig};
use crate::corpus::load_text_corpus;
use crate::error::{Result, SubtokError};
use crate::metrics::{IterationMetrics, StopReason, TrainingMetrics};
use crate::model::{TokenPair, Vocabulary};
use crate::preprocess::{collect_frequencies, WordFrequencies};

use self::word::{for_each_adjacent_pair, merge_first_occurrence};

/// Aggregated adjacent-pair counts derived from a word-frequency table.
pub type PairCounts = FxHashMap<TokenPair, usize>;

/// Counts adjacent token pairs across all words of the table.
///
/// Every adjacent position inside a word contributes that word's full
/// frequency to its pair. Counting runs in parallel across words; summation
/// is commutative, so the aggregate matches a sequential pass exactly.
#[must_use]
pub fn count_token_pairs(word_frequencies: &WordFrequencies) -> PairCounts {
    word_frequencies
        .par_iter()
        .map(|(word, &frequency)| {
            let mut local = PairCounts::default();
            for_each_adjacent_pair(word, |left, right| {
                *local.entry((left.clone(), right.clone())).or_insert(0) += frequency;
            });
            local
        })
        .reduce(PairCounts::default, |mut acc, local| {
            for (pair, count) in local {
                *acc.entry(pair).or_insert(0) += count;
            }
            acc
        })
}

/// Rewrites the table, collapsing the first adjacent occurrence of `pair` in
/// every word that has one.
///
/// Words without an adjacent occurrence carry over untouched. When two
/// distinct words collapse onto the same sequence their frequencies are
/// summed, keeping the table's keys distinct and its total mass unchanged.
#[must_use]
pub fn merge_pair(word_frequencies: &WordFrequencies, pair: &TokenPair) -> WordFrequencies {
    let mut merged = WordFrequencies::default();
    merged.reserve(word_frequencies.len());
    for (tokens, &frequency) in word_frequencies {
        match merge_first_occurrence(tokens, pair) {
            Some(rewritten) => *merged.entry(rewritten).or_insert(0) += frequency,
            None => *merged.entry(tokens.clone()).or_insert(0) += frequency,
        }
    }
    merged
}

/// Runs up to `num_merges` merge iterations over the table.
///
/// The budget is clamped once, against the number of distinct pairs present
/// before the first merge, and pair counts are recomputed from scratch after
/// every merge. A budget of zero returns the table unchanged.
#[must_use]
pub fn train(word_frequencies: WordFrequencies, num_merges: usize) -> WordFrequencies {
    let mut table = word_frequencies;
    let mut pair_counts = count_token_pairs(&table);
    let budget = num_merges.min(pair_counts.len());

    for _ in 0..budget {
        let Some((pair, _)) = select_best_pair(&pair_counts) else {
            break;
        };
        table = merge_pair(&table, &pair);
        pair_counts = count_token_pairs(&table);
    }
    table
}

fn merged_char_len(pair: &TokenPair) -> usize {
    pair.0.chars().count() + pair.1.chars().count()
}

/// Picks the next pair to merge: highest count first, then the pair whose
/// concatenation is longest (in characters), then the lexicographically
/// smallest pair. The ordering is total over distinct pairs, so the choice
/// does not depend on map iteration order.
fn select_best_pair(pair_counts: &PairCounts) -> Option<(TokenPair, usize)> {
    pair_counts
        .iter()
        .max_by(|(pair_a, count_a), (pair_b, count_b)| {
            count_a
                .cmp(count_b)
                .then_with(|| merged_char_len(pair_a).cmp(&merged_char_len(pair_b)))
                .then_with(|| pair_b.cmp(pair_a))
        })
        .map(|(pair, &count)| (pair.clone(), count))
}

/// High-level façade configuring and executing training runs.
#[derive(Debug, Clone)]
pub struct Trainer {
    cfg: TrainerConfig,
}

/// Artifacts returned after a training session completes.
#[must_use]
#[derive(Debug, Clone)]
pub struct TrainerArtifacts {
    /// Fully merged word-frequency table.
    pub word_frequencies: WordFrequencies,
    /// Vocabulary built from the merged table plus the unknown token.
    pub vocabulary: Vocabulary,
    /// Detailed metrics captured during training.
    pub metrics: TrainingMetrics,
}

impl Trainer {
    /// Creates a new trainer for the supplied configuration.
    #[must_use]
    pub fn new(cfg: TrainerConfig) -> Self {
        Self { cfg }
    }

    /// Returns a [`TrainerBuilder`] with default settings.
    #[must_use]
    pub fn builder() -> TrainerBuilder {
        TrainerConfig::builder()
    }

    /// Returns an immutable reference to the underlying configuration.
    #[must_use]
    pub fn config(&self) -> &TrainerConfig {
        &self.cfg
    }

    /// Trains a vocabulary from text files loaded according to [`IngestConfig`].
    pub fn train_from_paths<P: AsRef<Path>>(
        &self,
        inputs: &[P],
        ingest: &IngestConfig,
    ) -> Result<TrainerArtifacts> {
        let corpus = load_text_corpus(inputs, ingest)?;
        self.train_from_text(&corpus)
    }

    /// Collects word frequencies from `text` and trains on them.
    pub fn train_from_text(&self, text: &str) -> Result<TrainerArtifacts> {
        self.cfg.validate()?;
        let table = collect_frequencies(
            text,
            self.cfg.start_of_word.as_deref(),
            &self.cfg.end_of_word,
        );
        self.train_from_frequencies(table)
    }

    /// Runs the merge loop over an existing word-frequency table, recording
    /// telemetry and building the final vocabulary.
    pub fn train_from_frequencies(
        &self,
        word_frequencies: WordFrequencies,
    ) -> Result<TrainerArtifacts> {
        self.cfg.validate()?;
        if word_frequencies.is_empty() {
            return Err(SubtokError::InvalidConfig(
                "training corpus contains no words".into(),
            ));
        }

        let training_start = Instant::now();
        let mut table = word_frequencies;
        let mut pair_counts = count_token_pairs(&table);
        let budget = self.cfg.num_merges.min(pair_counts.len());
        let mut iterations = Vec::with_capacity(budget);
        let mut stop_reason = if pair_counts.is_empty() {
            StopReason::NoPairsRemaining
        } else {
            StopReason::MergeBudgetExhausted
        };

        for iteration in 1..=budget {
            let iteration_start = Instant::now();
            let Some((pair, frequency)) = select_best_pair(&pair_counts) else {
                stop_reason = StopReason::NoPairsRemaining;
                break;
            };
            table = merge_pair(&table, &pair);
            pair_counts = count_token_pairs(&table);

            let mut merged_token = pair.0.clone();
            merged_token.push_str(&pair.1);
            if self.cfg.show_progress {
                info!(
                    "iter {:>4} freq {:>8} merged {:?} distinct_pairs {:>6}",
                    iteration,
                    frequency,
                    merged_token.as_str(),
                    pair_counts.len()
                );
            }
            iterations.push(IterationMetrics {
                iteration,
                pair,
                merged_token,
                frequency,
                distinct_pairs: pair_counts.len(),
                iteration_duration: iteration_start.elapsed(),
                total_elapsed: training_start.elapsed(),
            });

            if pair_counts.is_empty() {
                stop_reason = StopReason::NoPairsRemaining;
                break;
            }
        }

        let vocabulary = Vocabulary::from_frequencies(&table, &self.cfg.unknown_token);
        let metrics = TrainingMetrics {
            iterations,
            total_duration: training_start.elapsed(),
            stop_reason,
        };
        Ok(TrainerArtifacts {
            word_frequencies: table,
            vocabulary,
            metrics,
        })
    }
}
