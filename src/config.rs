//! Configuration builders controlling training and corpus ingestion.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SubtokError};

/// Default number of merge iterations requested by [`TrainerConfig::default`].
pub const DEFAULT_NUM_MERGES: usize = 100;
/// Default end-of-word marker appended to every prepared word.
pub const DEFAULT_END_OF_WORD: &str = "</s>";
/// Default unknown token appended to trained vocabularies.
pub const DEFAULT_UNKNOWN_TOKEN: &str = "<unk>";

/// Configuration for subword vocabulary training.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainerConfig {
    /// Requested number of merge iterations; clamped to the number of
    /// distinct pairs present before the first merge.
    pub num_merges: usize,
    /// Optional marker prepended to every word; `None` disables it.
    pub start_of_word: Option<String>,
    /// Marker appended to every word so word boundaries survive merging.
    pub end_of_word: String,
    /// Token appended to trained vocabularies as the unknown fallback.
    pub unknown_token: String,
    /// Enables per-iteration logging through the `log` facade.
    pub show_progress: bool,
}

impl TrainerConfig {
    /// Returns a builder initialised with [`TrainerConfig::default`].
    #[must_use]
    pub fn builder() -> TrainerBuilder {
        TrainerBuilder::default()
    }

    /// Validates the invariants required for training.
    pub fn validate(&self) -> Result<()> {
        if self.end_of_word.is_empty() {
            return Err(SubtokError::InvalidConfig(
                "end_of_word marker must not be empty".into(),
            ));
        }
        if self.unknown_token.is_empty() {
            return Err(SubtokError::InvalidConfig(
                "unknown_token must not be empty".into(),
            ));
        }
        if matches!(self.start_of_word.as_deref(), Some("")) {
            return Err(SubtokError::InvalidConfig(
                "start_of_word marker must not be empty when set".into(),
            ));
        }
        Ok(())
    }
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            num_merges: DEFAULT_NUM_MERGES,
            start_of_word: None,
            end_of_word: DEFAULT_END_OF_WORD.into(),
            unknown_token: DEFAULT_UNKNOWN_TOKEN.into(),
            show_progress: true,
        }
    }
}

/// Builder for [`TrainerConfig`].
#[derive(Debug, Default, Clone)]
pub struct TrainerBuilder {
    cfg: TrainerConfig,
}

impl TrainerBuilder {
    /// Creates a builder with [`TrainerConfig::default`] settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the requested number of merge iterations.
    #[must_use]
    pub fn num_merges(mut self, value: usize) -> Self {
        self.cfg.num_merges = value;
        self
    }

    /// Sets or clears the start-of-word marker.
    #[must_use]
    pub fn start_of_word<S>(mut self, marker: Option<S>) -> Self
    where
        S: Into<String>,
    {
        self.cfg.start_of_word = marker.map(Into::into);
        self
    }

    /// Overrides the end-of-word marker.
    #[must_use]
    pub fn end_of_word<S: Into<String>>(mut self, marker: S) -> Self {
        self.cfg.end_of_word = marker.into();
        self
    }

    /// Overrides the unknown token appended to trained vocabularies.
    #[must_use]
    pub fn unknown_token<S: Into<String>>(mut self, token: S) -> Self {
        self.cfg.unknown_token = token.into();
        self
    }

    /// Enables or disables per-iteration logging.
    #[must_use]
    pub fn show_progress(mut self, enabled: bool) -> Self {
        self.cfg.show_progress = enabled;
        self
    }

    /// Finalises the builder, returning a validated [`TrainerConfig`].
    pub fn build(self) -> Result<TrainerConfig> {
        self.cfg.validate()?;
        Ok(self.cfg)
    }
}

/// Configuration controlling how text corpora are read from disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngestConfig {
    /// Enables recursive directory traversal.
    pub recursive: bool,
    /// Follows symlinks encountered during traversal.
    pub follow_symlinks: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            recursive: true,
            follow_symlinks: false,
        }
    }
}

impl IngestConfig {
    /// Returns a builder initialised with [`IngestConfig::default`].
    #[must_use]
    pub fn builder() -> IngestBuilder {
        IngestBuilder::default()
    }
}

/// Builder for [`IngestConfig`].
#[derive(Debug, Default, Clone)]
pub struct IngestBuilder {
    cfg: IngestConfig,
}

impl IngestBuilder {
    /// Creates a new builder with [`IngestConfig::default`] settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables recursive directory traversal.
    #[must_use]
    pub fn recursive(mut self, enabled: bool) -> Self {
        self.cfg.recursive = enabled;
        self
    }

    /// Enables or disables following of symlinks when traversing directories.
    #[must_use]
    pub fn follow_symlinks(mut self, enabled: bool) -> Self {
        self.cfg.follow_symlinks = enabled;
        self
    }

    /// Finalises the builder, returning the [`IngestConfig`].
    pub fn build(self) -> IngestConfig {
        self.cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_passes_validation() {
        TrainerConfig::default()
            .validate()
            .expect("defaults should be valid");
    }

    #[test]
    fn builder_overrides_defaults() {
        let cfg = TrainerConfig::builder()
            .num_merges(16)
            .start_of_word(Some("<w>"))
            .end_of_word("_")
            .unknown_token("<oov>")
            .show_progress(false)
            .build()
            .expect("config should be valid");

        assert_eq!(cfg.num_merges, 16);
        assert_eq!(cfg.start_of_word.as_deref(), Some("<w>"));
        assert_eq!(cfg.end_of_word, "_");
        assert_eq!(cfg.unknown_token, "<oov>");
        assert!(!cfg.show_progress);
    }

    #[test]
    fn validate_rejects_empty_end_marker() {
        let cfg = TrainerConfig {
            end_of_word: String::new(),
            ..TrainerConfig::default()
        };
        let err = cfg.validate().expect_err("validation should fail");
        assert!(matches!(
            err,
            SubtokError::InvalidConfig(message) if message.contains("end_of_word")
        ));
    }

    #[test]
    fn validate_rejects_empty_start_marker_when_set() {
        let cfg = TrainerConfig {
            start_of_word: Some(String::new()),
            ..TrainerConfig::default()
        };
        let err = cfg.validate().expect_err("validation should fail");
        assert!(matches!(
            err,
            SubtokError::InvalidConfig(message) if message.contains("start_of_word")
        ));
    }

    #[test]
    fn validate_rejects_empty_unknown_token() {
        let cfg = TrainerConfig {
            unknown_token: String::new(),
            ..TrainerConfig::default()
        };
        let err = cfg.validate().expect_err("validation should fail");
        assert!(matches!(
            err,
            SubtokError::InvalidConfig(message) if message.contains("unknown_token")
        ));
    }

    #[test]
    fn ingest_builder_overrides_defaults() {
        let cfg = IngestConfig::builder()
            .recursive(false)
            .follow_symlinks(true)
            .build();
        assert!(!cfg.recursive);
        assert!(cfg.follow_symlinks);
    }
}
