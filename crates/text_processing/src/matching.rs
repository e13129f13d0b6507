//! Whole-word and whole-phrase term lookup
//!
//! Dialogue classification and subsystem resolution both ask "does this
//! text mention term X" where X may be a multi-word phrase. Matching is on
//! word boundaries only: `me` never matches inside `temperature`.
//! Polarity-joined tokens count as their parts, so `not_good` mentions
//! "not good".

use unicode_segmentation::UnicodeSegmentation;

/// Lowercased words of `text`, with `_`-joined tokens split apart
pub fn words(text: &str) -> Vec<String> {
    text.unicode_words()
        .flat_map(|w| w.split('_'))
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// `phrase` occurs as a contiguous run of whole words
pub fn contains_phrase<S: AsRef<str>>(words: &[S], phrase: &str) -> bool {
    let needle: Vec<String> = self::words(phrase);
    if needle.is_empty() || needle.len() > words.len() {
        return false;
    }
    words
        .windows(needle.len())
        .any(|window| window.iter().zip(&needle).all(|(w, n)| w.as_ref() == n))
}

/// Any of `terms` occurs in `words`
pub fn contains_any<S: AsRef<str>>(words: &[S], terms: &[String]) -> bool {
    terms.iter().any(|term| contains_phrase(words, term))
}

/// The terms that occur in `words`, in the order of `terms`
pub fn matched_terms<'a, S: AsRef<str>>(words: &[S], terms: &'a [String]) -> Vec<&'a str> {
    terms
        .iter()
        .filter(|term| contains_phrase(words, term))
        .map(String::as_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_word_only() {
        let w = words("main engine temperature too high");
        assert!(contains_phrase(&w, "main"));
        assert!(!contains_phrase(&w, "me"));
        assert!(!contains_phrase(&w, "temp"));
        assert!(contains_phrase(&w, "temperature too"));
    }

    #[test]
    fn test_joined_tokens_match_their_parts() {
        let w = words("engine not_good");
        assert!(contains_phrase(&w, "not good"));
        assert!(contains_phrase(&w, "good"));
    }

    #[test]
    fn test_matched_terms_keeps_term_order() {
        let terms = vec!["smoke".to_string(), "noise".to_string(), "oil".to_string()];
        let w = words("noise and black smoke");
        assert_eq!(matched_terms(&w, &terms), vec!["smoke", "noise"]);
        assert!(contains_any(&w, &terms));
        assert!(!contains_phrase(&w, ""));
    }
}
