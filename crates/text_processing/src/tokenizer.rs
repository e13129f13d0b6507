//! Query tokenizer
//!
//! Keeps numbers with decimals, ranges (`10-15`), slashed abbreviations
//! (`t/c`) and polarity-joined tokens (`not_leaking`) intact, and splits the
//! `n't` clitic off its verb. Everything else that is not a letter or digit
//! is dropped.

use once_cell::sync::Lazy;
use regex::Regex;

static CLITIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\S)n't\b").expect("valid clitic pattern"));

static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"n't|\d+(?:\.\d+)+|[\p{L}\p{N}]+(?:[/_\-][\p{L}\p{N}]+)*")
        .expect("valid token pattern")
});

/// Split normalized text into tokens
pub fn tokenize(text: &str) -> Vec<String> {
    let separated = CLITIC.replace_all(text, "$1 n't");
    TOKEN
        .find_iter(&separated)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_clitic() {
        assert_eq!(tokenize("pump doesn't work"), vec!["pump", "does", "n't", "work"]);
    }

    #[test]
    fn test_keeps_compound_tokens() {
        assert_eq!(
            tokenize("t/c at 10-15 bar, not_leaking 2.5"),
            vec!["t/c", "at", "10-15", "bar", "not_leaking", "2.5"]
        );
    }

    #[test]
    fn test_drops_punctuation() {
        assert_eq!(tokenize("smoke!! (black)?"), vec!["smoke", "black"]);
        assert!(tokenize("  ...  ").is_empty());
    }
}
