//! Metrics describing the evolution of the training process.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::model::{Token, TokenPair};

/// Reason a training run terminated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum StopReason {
    /// Every requested merge iteration was performed.
    MergeBudgetExhausted,
    /// The table ran out of adjacent pairs before the budget did.
    NoPairsRemaining,
}

/// Metrics captured for each merge iteration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IterationMetrics {
    /// Sequential iteration number (1-indexed).
    pub iteration: usize,
    /// Pair selected for merging during the iteration.
    pub pair: TokenPair,
    /// Token produced by concatenating the selected pair.
    pub merged_token: Token,
    /// Aggregate frequency of the selected pair at selection time.
    pub frequency: usize,
    /// Count of distinct pairs remaining after the merge.
    pub distinct_pairs: usize,
    /// Execution time for the iteration.
    pub iteration_duration: Duration,
    /// Total time elapsed since training started.
    pub total_elapsed: Duration,
}

/// Aggregate metrics produced by a training session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainingMetrics {
    /// Per-iteration snapshots accrued during training.
    pub iterations: Vec<IterationMetrics>,
    /// Total duration of the training session.
    pub total_duration: Duration,
    /// Reason training terminated.
    pub stop_reason: StopReason,
}

impl TrainingMetrics {
    /// Number of merges actually performed.
    #[must_use]
    pub fn merge_count(&self) -> usize {
        self.iterations.len()
    }
}
