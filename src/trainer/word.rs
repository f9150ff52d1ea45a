use crate::model::{Token, TokenPair};
use crate::preprocess::PreparedWord;

/// Invokes `visit` for each adjacent token pair in the word, left to right.
pub(crate) fn for_each_adjacent_pair<F>(word: &[Token], mut visit: F)
where
    F: FnMut(&Token, &Token),
{
    for window in word.windows(2) {
        visit(&window[0], &window[1]);
    }
}

/// Collapses the first left-to-right adjacent occurrence of `pair` in `word`
/// into the concatenation of the two token strings.
///
/// Returns `None` when the pair never occurs adjacently. Only a single
/// occurrence is collapsed per call; repeated occurrences within one word are
/// picked up by later training iterations.
pub(crate) fn merge_first_occurrence(word: &[Token], pair: &TokenPair) -> Option<PreparedWord> {
    let position = word
        .windows(2)
        .position(|window| window[0] == pair.0 && window[1] == pair.1)?;

    let mut merged_token = pair.0.clone();
    merged_token.push_str(&pair.1);

    let mut rewritten = PreparedWord::with_capacity(word.len() - 1);
    rewritten.extend_from_slice(&word[..position]);
    rewritten.push(merged_token);
    rewritten.extend_from_slice(&word[position + 2..]);
    Some(rewritten)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(tokens: &[&str]) -> PreparedWord {
        tokens.iter().map(|token| Token::from(*token)).collect()
    }

    fn pair(left: &str, right: &str) -> TokenPair {
        (Token::from(left), Token::from(right))
    }

    #[test]
    fn visits_every_adjacent_pair_in_order() {
        let tokens = word(&["a", "b", "c"]);
        let mut seen = Vec::new();
        for_each_adjacent_pair(&tokens, |left, right| {
            seen.push((left.clone(), right.clone()));
        });
        assert_eq!(seen, vec![pair("a", "b"), pair("b", "c")]);
    }

    #[test]
    fn single_token_word_has_no_pairs() {
        let tokens = word(&["a"]);
        let mut count = 0;
        for_each_adjacent_pair(&tokens, |_, _| count += 1);
        assert_eq!(count, 0);
    }

    #[test]
    fn merges_only_the_first_occurrence() {
        let tokens = word(&["a", "b", "a", "b"]);
        let merged = merge_first_occurrence(&tokens, &pair("a", "b")).expect("pair present");
        assert_eq!(merged, word(&["ab", "a", "b"]));
    }

    #[test]
    fn merges_overlapping_pair_at_leftmost_position() {
        let tokens = word(&["a", "a", "a"]);
        let merged = merge_first_occurrence(&tokens, &pair("a", "a")).expect("pair present");
        assert_eq!(merged, word(&["aa", "a"]));
    }

    #[test]
    fn merges_pair_at_word_end() {
        let tokens = word(&["x", "y", "_"]);
        let merged = merge_first_occurrence(&tokens, &pair("y", "_")).expect("pair present");
        assert_eq!(merged, word(&["x", "y_"]));
    }

    #[test]
    fn absent_pair_leaves_word_untouched() {
        let tokens = word(&["a", "b"]);
        assert!(merge_first_occurrence(&tokens, &pair("b", "a")).is_none());
    }

    #[test]
    fn non_adjacent_tokens_do_not_merge() {
        let tokens = word(&["a", "x", "b"]);
        assert!(merge_first_occurrence(&tokens, &pair("a", "b")).is_none());
    }
}
