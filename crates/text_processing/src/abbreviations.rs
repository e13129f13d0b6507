//! Abbreviation expansion
//!
//! Expands marine shorthand tokens (`me`, `t/c`, `temp`, ...) into their full
//! phrase. Multi-word expansions are inserted in place as separate tokens.

use std::collections::HashMap;

pub struct AbbreviationExpander {
    abbreviations: HashMap<String, Vec<String>>,
}

impl AbbreviationExpander {
    pub fn new(abbreviations: &HashMap<String, String>) -> Self {
        let abbreviations = abbreviations
            .iter()
            .map(|(abbrev, expansion)| {
                (
                    abbrev.to_lowercase(),
                    expansion.split_whitespace().map(str::to_string).collect(),
                )
            })
            .collect();
        Self { abbreviations }
    }

    /// Expand abbreviation tokens
    pub fn expand(&self, tokens: Vec<String>) -> Vec<String> {
        let mut expanded = Vec::with_capacity(tokens.len());
        for token in tokens {
            match self.abbreviations.get(&token) {
                Some(words) => expanded.extend(words.iter().cloned()),
                None => expanded.push(token),
            }
        }
        expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_multi_word_expansion_in_place() {
        let mut map = HashMap::new();
        map.insert("me".to_string(), "main engine".to_string());
        map.insert("t/c".to_string(), "turbocharger".to_string());
        let expander = AbbreviationExpander::new(&map);

        assert_eq!(
            expander.expand(tokens("me t/c surging")),
            tokens("main engine turbocharger surging")
        );
    }

    #[test]
    fn test_lexicon_keys_lowercased() {
        let mut map = HashMap::new();
        map.insert("OWS".to_string(), "oily water separator".to_string());
        let expander = AbbreviationExpander::new(&map);
        assert_eq!(expander.expand(tokens("ows")), tokens("oily water separator"));
        assert_eq!(expander.expand(tokens("owners")), tokens("owners"));
    }
}
