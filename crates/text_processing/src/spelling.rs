//! Domain-aware spelling correction
//!
//! Uses, in order:
//! 1. Skip rules (domain terms, short tokens, numbers, joined or punctuated tokens)
//! 2. Direct expansions of apostrophe-less contractions (`wont`, `cant`, ...)
//! 3. The fixed marine correction list (`exaust` -> `exhaust`)
//! 4. SymSpell against the lexicon vocabulary, optionally extended with an
//!    English frequency dictionary
//!
//! Corrections are deterministic: the same token always yields the same output.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use marine_diag_config::constants::normalizer::{BUILTIN_FREQUENCY, MIN_CORRECTABLE_LEN};
use marine_diag_config::{DomainLexicon, NormalizerConfig};
use symspell::{SymSpell, SymSpellBuilder, UnicodeStringStrategy, Verbosity};

use crate::lemmatizer::Lemmatizer;
use crate::{Result, TextProcessingError};

/// Record of a correction made
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
    pub original: String,
    pub corrected: String,
    pub rule: &'static str,
}

/// Token-level spelling corrector
pub struct SpellCorrector {
    symspell: SymSpell<UnicodeStringStrategy>,
    /// Words that are already correct
    known: HashSet<String>,
    /// Tokens never touched
    protected: HashSet<String>,
    direct_expansions: HashMap<String, String>,
    corrections: HashMap<String, String>,
    max_edit_distance: i64,
}

impl SpellCorrector {
    /// Build the corrector from the lexicon vocabulary
    pub fn new(lexicon: &DomainLexicon, config: &NormalizerConfig) -> Result<Self> {
        let mut symspell: SymSpell<UnicodeStringStrategy> = SymSpellBuilder::default()
            .max_dictionary_edit_distance(config.max_edit_distance)
            .prefix_length(config.prefix_length)
            .build()
            .map_err(|e| TextProcessingError::Dictionary(e.to_string()))?;

        if let Some(path) = &config.frequency_dictionary {
            load_frequency_dictionary(&mut symspell, Path::new(path))?;
        }

        // Lemmas go in too, so processed output re-corrects to itself
        let lemmatizer = Lemmatizer::new(&lexicon.normalization.lemma_exceptions);
        let mut known = HashSet::new();
        for word in lexicon.known_words() {
            let lemma = lemmatizer.lemmatize(&word);
            known.insert(word);
            known.insert(lemma);
        }
        for word in &known {
            symspell.load_dictionary_line(&format!("{},{}", word, BUILTIN_FREQUENCY), 0, 1, ",");
        }

        let normalization = &lexicon.normalization;
        let protected = normalization
            .domain_terms
            .iter()
            .chain(normalization.abbreviations.keys())
            .chain(normalization.negators.keys())
            .cloned()
            .collect();

        tracing::debug!(
            vocabulary = known.len(),
            frequency_dictionary = config.frequency_dictionary.is_some(),
            "Built spelling dictionary"
        );

        Ok(Self {
            symspell,
            known,
            protected,
            direct_expansions: normalization.direct_expansions.clone(),
            corrections: normalization.corrections.clone(),
            max_edit_distance: config.max_edit_distance,
        })
    }

    fn is_skipped(&self, token: &str) -> bool {
        token.chars().count() < MIN_CORRECTABLE_LEN
            || self.protected.contains(token)
            || token.chars().any(|c| c.is_ascii_digit())
            || !token.chars().all(char::is_alphabetic)
    }

    /// Correct one lowercased token
    ///
    /// The result may hold several words (`wont` -> `will not`).
    pub fn correct_token(&self, token: &str) -> Option<Correction> {
        if self.is_skipped(token) {
            return None;
        }

        if let Some(expansion) = self.direct_expansions.get(token) {
            return Some(Correction {
                original: token.to_string(),
                corrected: expansion.clone(),
                rule: "contraction",
            });
        }

        if let Some(fixed) = self.corrections.get(token) {
            return Some(Correction {
                original: token.to_string(),
                corrected: fixed.clone(),
                rule: "marine",
            });
        }

        if self.known.contains(token) {
            return None;
        }

        let suggestions = self
            .symspell
            .lookup(token, Verbosity::Top, self.max_edit_distance);

        suggestions
            .first()
            .filter(|s| s.term != token && s.distance <= self.max_edit_distance)
            .map(|s| Correction {
                original: token.to_string(),
                corrected: s.term.clone(),
                rule: "symspell",
            })
    }

    /// Correct every token, splitting multi-word corrections
    pub fn correct_tokens(&self, tokens: Vec<String>) -> (Vec<String>, Vec<Correction>) {
        let mut output = Vec::with_capacity(tokens.len());
        let mut corrections = Vec::new();

        for token in tokens {
            match self.correct_token(&token) {
                Some(correction) => {
                    output.extend(correction.corrected.split_whitespace().map(str::to_string));
                    corrections.push(correction);
                },
                None => output.push(token),
            }
        }

        (output, corrections)
    }
}

fn load_frequency_dictionary(
    symspell: &mut SymSpell<UnicodeStringStrategy>,
    path: &Path,
) -> Result<()> {
    let content = std::fs::read_to_string(path)?;
    let mut loaded = 0usize;
    for line in content.lines().filter(|l| !l.trim().is_empty()) {
        if symspell.load_dictionary_line(line, 0, 1, " ") {
            loaded += 1;
        }
    }
    if loaded == 0 {
        return Err(TextProcessingError::Dictionary(format!(
            "no entries in frequency dictionary {}",
            path.display()
        )));
    }
    tracing::info!(path = %path.display(), entries = loaded, "Loaded frequency dictionary");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_fixture() -> SpellCorrector {
        SpellCorrector::new(&DomainLexicon::builtin(), &NormalizerConfig::default()).unwrap()
    }

    #[test]
    fn test_marine_correction() {
        let corrector = test_fixture();
        let correction = corrector.correct_token("exaust").unwrap();
        assert_eq!(correction.corrected, "exhaust");
        assert_eq!(correction.rule, "marine");
    }

    #[test]
    fn test_domain_terms_untouched() {
        let corrector = test_fixture();
        for term in ["turbocharger", "hfo", "wartsila", "crankcase", "scavenge", "t/c"] {
            assert!(corrector.correct_token(term).is_none(), "{}", term);
        }
    }

    #[test]
    fn test_skip_rules() {
        let corrector = test_fixture();
        assert!(corrector.correct_token("me").is_none());
        assert!(corrector.correct_token("10").is_none());
        assert!(corrector.correct_token("4stroke").is_none());
        assert!(corrector.correct_token("not_leaking").is_none());
    }

    #[test]
    fn test_direct_expansion_splits() {
        let corrector = test_fixture();
        let (tokens, corrections) =
            corrector.correct_tokens(vec!["engine".to_string(), "wont".to_string()]);
        assert_eq!(tokens, vec!["engine", "will", "not"]);
        assert_eq!(corrections.len(), 1);
    }

    #[test]
    fn test_symspell_fixes_typo() {
        let corrector = test_fixture();
        let correction = corrector.correct_token("presure").unwrap();
        assert_eq!(correction.corrected, "pressure");
        assert_eq!(correction.rule, "symspell");
    }

    #[test]
    fn test_common_words_not_miscorrected() {
        let corrector = test_fixture();
        for word in ["hot", "high", "low", "pump", "leaking", "seawater"] {
            assert!(corrector.correct_token(word).is_none(), "{}", word);
        }
    }

    #[test]
    fn test_frequency_dictionary_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("freq.txt");
        std::fs::write(&path, "gasket 5000\nrocket 4000\n").unwrap();

        let config = NormalizerConfig {
            frequency_dictionary: Some(path.display().to_string()),
            ..NormalizerConfig::default()
        };
        let corrector = SpellCorrector::new(&DomainLexicon::builtin(), &config).unwrap();
        assert_eq!(corrector.correct_token("rockett").unwrap().corrected, "rocket");
    }

    #[test]
    fn test_missing_frequency_dictionary_is_error() {
        let config = NormalizerConfig {
            frequency_dictionary: Some("/nonexistent/freq.txt".to_string()),
            ..NormalizerConfig::default()
        };
        assert!(SpellCorrector::new(&DomainLexicon::builtin(), &config).is_err());
    }
}
