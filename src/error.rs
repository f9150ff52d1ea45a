//! Error handling utilities shared across the crate.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::TokenId;

/// Convenient result type used throughout the crate.
pub type Result<T, E = SubtokError> = std::result::Result<T, E>;

/// Domain-specific error describing failures during configuration, IO, or
/// tokenizer operations.
#[derive(Debug, Error)]
pub enum SubtokError {
    /// Configuration or argument failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Filesystem IO error with optional context path.
    #[error("io error while processing {path:?}: {source}")]
    Io {
        /// Underlying IO error returned by the standard library.
        source: std::io::Error,
        /// Target path associated with the IO failure if available.
        path: Option<PathBuf>,
    },
    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// Vocabulary data violates its invariants.
    #[error("invalid vocabulary: {0}")]
    Vocabulary(String),
    /// Decoding encountered an identifier with no vocabulary entry.
    #[error("unknown token id {0}")]
    UnknownTokenId(TokenId),
}

impl From<serde_json::Error> for SubtokError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl SubtokError {
    /// Helper constructor that attaches an optional path when wrapping IO errors.
    pub fn io(source: std::io::Error, path: Option<PathBuf>) -> Self {
        Self::Io { source, path }
    }
}
