//! Query normalizer
//!
//! Pure function of the input text and the domain lexicon:
//!
//! 1. lowercase
//! 2. split digit+unit (`10bar` -> `10 bar`) and range+unit (`10-15bar` -> `10-15 bar`)
//! 3. collapse whitespace
//! 4. expand contractions (`can't` -> `cannot`)
//! 5. tokenize
//! 6. spell-correct
//! 7. expand abbreviations
//! 8. remove stopwords, keeping negations, intensifiers and direction words
//! 9. lemmatize
//! 10. join negations to the next token (`not leaking` -> `not_leaking`)
//!
//! `normalized` is the text after step 4, `processed` after step 10.
//! Normalizing a processed query returns it unchanged.

use std::collections::HashMap;
use std::sync::Arc;

use marine_diag_config::{DomainLexicon, NormalizationLexicon, NormalizerConfig};
use marine_diag_core::PreprocessedQuery;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::abbreviations::AbbreviationExpander;
use crate::lemmatizer::Lemmatizer;
use crate::spelling::SpellCorrector;
use crate::tokenizer::tokenize;
use crate::Result;

static UNIT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)([a-z]+)").expect("valid unit pattern"));

static RANGE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)-(\d+)([a-z]+)").expect("valid range pattern"));

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

pub struct QueryNormalizer {
    lexicon: Arc<DomainLexicon>,
    speller: SpellCorrector,
    expander: AbbreviationExpander,
    lemmatizer: Lemmatizer,
}

impl QueryNormalizer {
    pub fn new(lexicon: Arc<DomainLexicon>, config: &NormalizerConfig) -> Result<Self> {
        let normalization = &lexicon.normalization;
        let speller = SpellCorrector::new(&lexicon, config)?;
        let expander = AbbreviationExpander::new(&normalization.abbreviations);
        let lemmatizer = Lemmatizer::new(&normalization.lemma_exceptions);

        Ok(Self {
            lexicon,
            speller,
            expander,
            lemmatizer,
        })
    }

    /// Normalizer over the built-in lexicon and default settings
    pub fn builtin() -> Result<Self> {
        Self::new(Arc::new(DomainLexicon::builtin()), &NormalizerConfig::default())
    }

    pub fn lexicon(&self) -> &Arc<DomainLexicon> {
        &self.lexicon
    }

    pub fn normalize(&self, raw: &str) -> PreprocessedQuery {
        let normalized = self.normalize_text(raw);
        let processed = self.process(&normalized);

        tracing::trace!(raw, normalized = %normalized, processed = %processed, "Normalized query");

        PreprocessedQuery {
            raw: raw.to_string(),
            normalized,
            processed,
        }
    }

    /// Steps 1-4
    pub fn normalize_text(&self, raw: &str) -> String {
        let text = raw.to_lowercase();
        let text = UNIT_PATTERN.replace_all(&text, "$1 $2");
        let text = RANGE_PATTERN.replace_all(&text, "$1-$2 $3");
        let mut text = WHITESPACE.replace_all(&text, " ").trim().to_string();

        for (contraction, expansion) in &self.lexicon.normalization.contractions {
            if text.contains(contraction.as_str()) {
                text = text.replace(contraction.as_str(), expansion);
            }
        }

        text
    }

    /// Steps 5-10
    fn process(&self, normalized: &str) -> String {
        let normalization = &self.lexicon.normalization;

        let tokens = tokenize(normalized);
        let (tokens, corrections) = self.speller.correct_tokens(tokens);
        if !corrections.is_empty() {
            tracing::debug!(?corrections, "Spelling corrections applied");
        }

        let tokens = self.expander.expand(tokens);

        let tokens: Vec<String> = tokens
            .into_iter()
            .filter(|t| !normalization.is_removable_stopword(t))
            .map(|t| self.lemmatize_token(normalization, t))
            .collect();

        join_negations(tokens, &normalization.negators).join(" ")
    }

    fn lemmatize_token(&self, normalization: &NormalizationLexicon, token: String) -> String {
        if token.contains('_') || normalization.domain_terms.contains(&token) {
            token
        } else {
            self.lemmatizer.lemmatize(&token)
        }
    }
}

/// Join each run of negators onto the token that follows it
///
/// `not leaking` -> `not_leaking`, `not no pressure` -> `not_no_pressure`.
/// A trailing run with nothing to attach to is kept as is.
fn join_negations(tokens: Vec<String>, negators: &HashMap<String, String>) -> Vec<String> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut prefix: Vec<&str> = Vec::new();

    for token in &tokens {
        if let Some(canonical) = negators.get(token) {
            prefix.push(canonical);
            continue;
        }
        if prefix.is_empty() {
            output.push(token.clone());
        } else {
            output.push(format!("{}_{}", prefix.join("_"), token));
            prefix.clear();
        }
    }

    if !prefix.is_empty() {
        output.push(prefix.join("_"));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_fixture() -> QueryNormalizer {
        QueryNormalizer::builtin().unwrap()
    }

    #[test]
    fn test_unit_split() {
        let normalizer = test_fixture();
        assert_eq!(normalizer.normalize("pressure 10bar").normalized, "pressure 10 bar");
        assert_eq!(
            normalizer.normalize("pressure 10-15bar").normalized,
            "pressure 10-15 bar"
        );
        assert_eq!(normalizer.normalize("10bar").processed, "10 bar");
    }

    #[test]
    fn test_contractions_and_whitespace() {
        let normalizer = test_fixture();
        let query = normalizer.normalize("  Engine   WON'T   start ");
        assert_eq!(query.normalized, "engine will not start");
        assert_eq!(query.processed, "engine not_start");
    }

    #[test]
    fn test_negation_joined() {
        let normalizer = test_fixture();
        assert_eq!(normalizer.normalize("not leaking").processed, "not_leaking");
        assert_eq!(
            normalizer.normalize("pump doesn't work").processed,
            "pump not_work"
        );
        assert_eq!(normalizer.normalize("no pressure").processed, "no_pressure");
    }

    #[test]
    fn test_full_pipeline() {
        let normalizer = test_fixture();
        let query = normalizer.normalize("ME exaust temp too high");
        assert_eq!(query.raw, "ME exaust temp too high");
        assert_eq!(query.processed, "main engine exhaust temperature too high");
    }

    #[test]
    fn test_stopwords_and_lemmas() {
        let normalizer = test_fixture();
        let query = normalizer.normalize("the pistons of the engine are very hot");
        assert_eq!(query.processed, "piston engine very hot");
    }

    #[test]
    fn test_domain_terms_unchanged() {
        let normalizer = test_fixture();
        let query = normalizer.normalize("wartsila turbocharger crankcase scavenge cummins");
        assert_eq!(
            query.processed,
            "wartsila turbocharger crankcase scavenge cummins"
        );
    }

    #[test]
    fn test_idempotent() {
        let normalizer = test_fixture();
        for raw in [
            "ME exaust temp too high",
            "aux engine not starting",
            "black smoke from t/c at 10-15bar",
            "cylinders running hot, lube oil pressure dropping",
            "seawater pump leaking",
            "problem",
            "the generator doesn't work",
            "",
        ] {
            let once = normalizer.normalize(raw).processed;
            let twice = normalizer.normalize(&once).processed;
            assert_eq!(once, twice, "not idempotent for {:?}", raw);
        }
    }

    #[test]
    fn test_empty_input() {
        let normalizer = test_fixture();
        let query = normalizer.normalize("   ");
        assert!(query.is_empty());
        assert_eq!(query.normalized, "");
    }

    #[test]
    fn test_trailing_negation_kept() {
        let mut negators = HashMap::new();
        negators.insert("not".to_string(), "not".to_string());
        negators.insert("no".to_string(), "no".to_string());
        let tokens = ["not", "no", "pressure", "ok", "not"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            join_negations(tokens, &negators),
            vec!["not_no_pressure", "ok", "not"]
        );
    }
}
