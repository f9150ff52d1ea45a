//! Subword byte pair encoding (BPE) tokenizer library and CLI.
//!
//! The crate learns merge-based subword vocabularies from whitespace-separated
//! text, encodes text into token identifier sequences, decodes them back, and
//! scores translation output with BLEU. Typical usage collects a corpus,
//! trains a [`Vocabulary`], persists it as JSON, and encodes through it.
//!
//! ```
//! use subtok::{Trainer, TrainerConfig};
//!
//! # fn main() -> subtok::Result<()> {
//! let cfg = TrainerConfig::builder()
//!     .num_merges(50)
//!     .show_progress(false)
//!     .build()?;
//! let artifacts = Trainer::new(cfg).train_from_text("low lower lowest")?;
//!
//! let ids = subtok::encode("low lower", &artifacts.vocabulary, None, "</s>", "<unk>")?;
//! let text = subtok::decode(&ids, &artifacts.vocabulary, "</s>")?;
//! assert_eq!(text, "low lower");
//! # Ok(())
//! # }
//! ```
//!
//! The CLI is enabled by default through the `cli` feature.  Users targeting
//! the library portion only can disable default features to avoid the CLI
//! dependencies: `subtok = { version = "...", default-features = false }`.

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    clippy::all,
    rust_2018_idioms,
    future_incompatible,
    unused_lifetimes,
    unreachable_pub
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::doc_markdown,
    clippy::multiple_crate_versions
)]

pub mod bleu;
pub mod config;
pub mod corpus;
pub mod encoder;
pub mod error;
pub mod metrics;
pub mod model;
pub mod preprocess;
pub mod serialization;
pub mod trainer;

pub use bleu::{calculate_bleu, DEFAULT_MAX_ORDER};
pub use config::{IngestConfig, TrainerBuilder, TrainerConfig};
pub use encoder::{decode, encode, tokenize_word};
pub use error::{Result, SubtokError};
pub use metrics::{IterationMetrics, StopReason, TrainingMetrics};
pub use model::{Token, TokenId, TokenPair, Vocabulary};
pub use preprocess::{collect_frequencies, prepare_word, PreparedWord, WordFrequencies};
pub use serialization::{load_vocabulary, save_vocabulary};
pub use trainer::{count_token_pairs, merge_pair, train, PairCounts, Trainer, TrainerArtifacts};
