//! Encoding and decoding between raw text and token identifier sequences.

use crate::error::{Result, SubtokError};
use crate::model::{Token, TokenId, Vocabulary};
use crate::preprocess::prepare_word;

/// Tokenizes one prepared word against the vocabulary.
///
/// Matching is greedy: at each position the longest run of tokens whose
/// concatenation is a vocabulary entry is consumed as one identifier. When no
/// prefix matches at all, the unknown-token identifier is emitted and the scan
/// advances by a single token. The scan never extends a candidate beyond the
/// longest token in the vocabulary.
///
/// # Errors
///
/// Returns [`SubtokError::Vocabulary`] when `unknown_token` itself is missing
/// from the vocabulary, since the fallback would then be unrepresentable.
pub fn tokenize_word(
    word: &[Token],
    vocabulary: &Vocabulary,
    unknown_token: &str,
) -> Result<Vec<TokenId>> {
    let unknown_id = vocabulary.token_id(unknown_token).ok_or_else(|| {
        SubtokError::Vocabulary(format!(
            "unknown token {unknown_token:?} is not in the vocabulary"
        ))
    })?;

    let mut ids = Vec::with_capacity(word.len());
    let mut position = 0;
    while position < word.len() {
        let mut candidate = Token::default();
        let mut candidate_chars = 0;
        let mut best: Option<(TokenId, usize)> = None;
        for (offset, token) in word[position..].iter().enumerate() {
            candidate_chars += token.chars().count();
            if candidate_chars > vocabulary.max_token_chars() {
                break;
            }
            candidate.push_str(token);
            if let Some(id) = vocabulary.token_id(&candidate) {
                best = Some((id, offset + 1));
            }
        }
        match best {
            Some((id, consumed)) => {
                ids.push(id);
                position += consumed;
            }
            None => {
                ids.push(unknown_id);
                position += 1;
            }
        }
    }
    Ok(ids)
}

/// Encodes whitespace-separated text into a flat identifier sequence.
///
/// Each word is prepared with the supplied markers and tokenized via
/// [`tokenize_word`]; the per-word sequences are concatenated in order. Empty
/// or all-whitespace text encodes to an empty sequence.
pub fn encode(
    text: &str,
    vocabulary: &Vocabulary,
    start_of_word: Option<&str>,
    end_of_word: &str,
    unknown_token: &str,
) -> Result<Vec<TokenId>> {
    let mut ids = Vec::new();
    for word in text.split_whitespace() {
        let prepared = prepare_word(word, start_of_word, Some(end_of_word));
        ids.extend(tokenize_word(&prepared, vocabulary, unknown_token)?);
    }
    Ok(ids)
}

/// Decodes an identifier sequence back into text.
///
/// Identifiers are mapped through the inverted vocabulary and concatenated;
/// each occurrence of the end-of-word marker then becomes a single space, and
/// one trailing boundary space is stripped.
///
/// # Errors
///
/// Returns [`SubtokError::UnknownTokenId`] for any identifier absent from the
/// vocabulary; decoding never substitutes a fallback token.
pub fn decode(ids: &[TokenId], vocabulary: &Vocabulary, end_of_word: &str) -> Result<String> {
    let mut concatenated = String::new();
    for &id in ids {
        let token = vocabulary
            .token(id)
            .ok_or(SubtokError::UnknownTokenId(id))?;
        concatenated.push_str(token);
    }
    if end_of_word.is_empty() {
        return Ok(concatenated);
    }

    let mut decoded = concatenated.replace(end_of_word, " ");
    if decoded.ends_with(' ') {
        decoded.pop();
    }
    Ok(decoded)
}
