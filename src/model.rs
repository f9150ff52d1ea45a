//! Vocabulary model shared by training, encoding, and persistence.

use std::collections::BTreeSet;

use ahash::AHashMap;
use compact_str::CompactString;

use crate::error::{Result, SubtokError};
use crate::preprocess::WordFrequencies;

/// Token identifier used throughout the crate.
pub type TokenId = u32;
/// Atomic string unit produced by preprocessing and grown by merges.
pub type Token = CompactString;
/// Adjacent token pair considered for merging, in left-to-right order.
pub type TokenPair = (Token, Token);

/// Read-only token/identifier mapping produced by training or loaded from disk.
///
/// Both directions are kept so encoding and decoding are single lookups.
/// Built once, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    ids: AHashMap<Token, TokenId>,
    tokens: AHashMap<TokenId, Token>,
    max_token_chars: usize,
}

impl Vocabulary {
    /// Builds a vocabulary from a merged word-frequency table.
    ///
    /// Every distinct token appearing in any word receives an identifier,
    /// assigned from 0 in sorted token order; the unknown token is appended
    /// with the next identifier when it is not already a corpus token.
    /// Identifiers are contiguous and never reused.
    #[must_use]
    pub fn from_frequencies(word_frequencies: &WordFrequencies, unknown_token: &str) -> Self {
        let mut distinct: BTreeSet<&Token> = BTreeSet::new();
        for word in word_frequencies.keys() {
            distinct.extend(word.iter());
        }

        let mut ids = AHashMap::with_capacity(distinct.len() + 1);
        let mut tokens = AHashMap::with_capacity(distinct.len() + 1);
        let mut next_id: TokenId = 0;
        for token in distinct {
            ids.insert(token.clone(), next_id);
            tokens.insert(next_id, token.clone());
            next_id += 1;
        }
        if !ids.contains_key(unknown_token) {
            let unknown = Token::from(unknown_token);
            ids.insert(unknown.clone(), next_id);
            tokens.insert(next_id, unknown);
        }

        let max_token_chars = max_chars(&ids);
        Self {
            ids,
            tokens,
            max_token_chars,
        }
    }

    /// Assembles a vocabulary from explicit `(token, identifier)` entries.
    ///
    /// Used when loading persisted vocabularies. Identifiers may be sparse
    /// but must be unique, as must token strings.
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Token, TokenId)>,
    {
        let mut ids = AHashMap::new();
        let mut tokens = AHashMap::new();
        for (token, id) in entries {
            if tokens.contains_key(&id) {
                return Err(SubtokError::Vocabulary(format!(
                    "identifier {id} is assigned to more than one token"
                )));
            }
            if ids.insert(token.clone(), id).is_some() {
                return Err(SubtokError::Vocabulary(format!(
                    "token {token:?} appears more than once"
                )));
            }
            tokens.insert(id, token);
        }

        let max_token_chars = max_chars(&ids);
        Ok(Self {
            ids,
            tokens,
            max_token_chars,
        })
    }

    /// Identifier assigned to `token`, when present.
    #[must_use]
    pub fn token_id(&self, token: &str) -> Option<TokenId> {
        self.ids.get(token).copied()
    }

    /// Token string behind `id`, when present.
    #[must_use]
    pub fn token(&self, id: TokenId) -> Option<&str> {
        self.tokens.get(&id).map(CompactString::as_str)
    }

    /// Whether `token` has an identifier.
    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.ids.contains_key(token)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the vocabulary holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Character length of the longest token; bounds longest-match scans.
    #[must_use]
    pub fn max_token_chars(&self) -> usize {
        self.max_token_chars
    }

    /// Iterates `(token, identifier)` entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&Token, TokenId)> {
        self.ids.iter().map(|(token, id)| (token, *id))
    }
}

fn max_chars(ids: &AHashMap<Token, TokenId>) -> usize {
    ids.keys()
        .map(|token| token.chars().count())
        .max()
        .unwrap_or(0)
}
