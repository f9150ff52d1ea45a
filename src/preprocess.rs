//! Word preprocessing and corpus frequency collection.
//!
//! Raw text enters the pipeline here: it is split on runs of whitespace, each
//! word is exploded into single-character tokens bracketed by the configured
//! marker tokens, and the resulting sequences are counted into the
//! word-frequency table the trainer consumes.

use compact_str::ToCompactString;
use rustc_hash::FxHashMap;

use crate::model::Token;

/// Ordered token sequence for one preprocessed word.
pub type PreparedWord = Vec<Token>;

/// Mapping from preprocessed word to its occurrence count in the corpus.
pub type WordFrequencies = FxHashMap<PreparedWord, usize>;

/// Explodes a raw word into single-character tokens bracketed by markers.
///
/// The sequence is, in order: the start marker (when given), one token per
/// character of `raw_word`, and the end marker (when given). An empty raw
/// word still yields the marker tokens, so the result is never empty when a
/// marker is supplied.
#[must_use]
pub fn prepare_word(
    raw_word: &str,
    start_of_word: Option<&str>,
    end_of_word: Option<&str>,
) -> PreparedWord {
    let capacity = raw_word.chars().count()
        + usize::from(start_of_word.is_some())
        + usize::from(end_of_word.is_some());
    let mut tokens = PreparedWord::with_capacity(capacity);

    if let Some(start) = start_of_word {
        tokens.push(Token::from(start));
    }
    tokens.extend(raw_word.chars().map(|ch| ch.to_compact_string()));
    if let Some(end) = end_of_word {
        tokens.push(Token::from(end));
    }
    tokens
}

/// Splits `text` on runs of whitespace and counts each distinct preprocessed
/// word.
///
/// Empty or all-whitespace text yields an empty table.
#[must_use]
pub fn collect_frequencies(
    text: &str,
    start_of_word: Option<&str>,
    end_of_word: &str,
) -> WordFrequencies {
    let mut frequencies = WordFrequencies::default();
    for raw_word in text.split_whitespace() {
        let word = prepare_word(raw_word, start_of_word, Some(end_of_word));
        *frequencies.entry(word).or_insert(0) += 1;
    }
    frequencies
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepare_word_brackets_characters_with_markers() {
        let word = prepare_word("cat", Some("<s>"), Some("</s>"));
        let expected: PreparedWord = ["<s>", "c", "a", "t", "</s>"]
            .iter()
            .map(|token| Token::from(*token))
            .collect();
        assert_eq!(word, expected);
    }

    #[test]
    fn prepare_word_length_matches_chars_plus_markers() {
        for (raw, start, end) in [
            ("cat", None, None),
            ("cat", Some("<s>"), None),
            ("cat", None, Some("</s>")),
            ("cat", Some("<s>"), Some("</s>")),
            ("", Some("<s>"), Some("</s>")),
            ("über", None, Some("_")),
        ] {
            let word = prepare_word(raw, start, end);
            let expected = raw.chars().count()
                + usize::from(start.is_some())
                + usize::from(end.is_some());
            assert_eq!(word.len(), expected, "raw={raw:?}");
        }
    }

    #[test]
    fn prepare_word_splits_multibyte_characters_per_char() {
        let word = prepare_word("über", None, None);
        assert_eq!(word.len(), 4);
        assert_eq!(word[0].as_str(), "ü");
    }

    #[test]
    fn collect_frequencies_counts_distinct_words() {
        let frequencies = collect_frequencies("ab ab ba", None, "</s>");
        assert_eq!(frequencies.len(), 2);

        let ab = prepare_word("ab", None, Some("</s>"));
        let ba = prepare_word("ba", None, Some("</s>"));
        assert_eq!(frequencies.get(&ab), Some(&2));
        assert_eq!(frequencies.get(&ba), Some(&1));
    }

    #[test]
    fn collect_frequencies_splits_on_whitespace_runs() {
        let frequencies = collect_frequencies("a\t a\n\na  a", None, "_");
        let a = prepare_word("a", None, Some("_"));
        assert_eq!(frequencies.len(), 1);
        assert_eq!(frequencies.get(&a), Some(&4));
    }

    #[test]
    fn collect_frequencies_of_blank_text_is_empty() {
        assert!(collect_frequencies("", None, "</s>").is_empty());
        assert!(collect_frequencies(" \t\n ", None, "</s>").is_empty());
    }
}
