//! Persistence of vocabularies as token-to-identifier JSON mappings.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{Result, SubtokError};
use crate::model::{Token, TokenId, Vocabulary};

/// Renders the vocabulary as a JSON object mapping token → identifier.
///
/// Keys are emitted in sorted order so repeated runs produce byte-identical
/// output for the same vocabulary.
pub fn vocabulary_json(vocabulary: &Vocabulary, pretty: bool) -> Result<String> {
    let sorted: BTreeMap<&str, TokenId> = vocabulary
        .iter()
        .map(|(token, id)| (token.as_str(), id))
        .collect();
    let json = if pretty {
        serde_json::to_string_pretty(&sorted)?
    } else {
        serde_json::to_string(&sorted)?
    };
    Ok(json)
}

/// Persists the vocabulary to `path` as JSON.
pub fn save_vocabulary<P: AsRef<Path>>(
    vocabulary: &Vocabulary,
    path: P,
    pretty: bool,
) -> Result<()> {
    let mut json = vocabulary_json(vocabulary, pretty)?;
    json.push('\n');
    fs::write(path.as_ref(), json)
        .map_err(|err| SubtokError::io(err, Some(path.as_ref().to_path_buf())))
}

/// Loads a vocabulary previously written by [`save_vocabulary`].
///
/// The file must contain a single JSON object of token → identifier;
/// identifiers must be unique.
pub fn load_vocabulary<P: AsRef<Path>>(path: P) -> Result<Vocabulary> {
    let contents = fs::read_to_string(path.as_ref())
        .map_err(|err| SubtokError::io(err, Some(path.as_ref().to_path_buf())))?;
    let entries: BTreeMap<String, TokenId> = serde_json::from_str(&contents)?;
    Vocabulary::from_entries(entries.into_iter().map(|(token, id)| (Token::from(token), id)))
}
