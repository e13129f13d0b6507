//! Domain lexicon
//!
//! Every vocabulary and weight table the pipeline consults lives in one
//! immutable [`DomainLexicon`] value. Engines receive it as an
//! `Arc<DomainLexicon>`; nothing reads module-level tables directly.
//!
//! The built-in tables cover marine diesel engines. A YAML file can replace
//! any section; sections it omits keep their built-in defaults.

mod dialogue;
mod normalization;
mod scoring;
mod unknown;

pub use dialogue::DialogueLexicon;
pub use normalization::NormalizationLexicon;
pub use scoring::{FileCategory, PhraseWeight, ScoringLexicon};
pub use unknown::UnknownQueryLexicon;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

use crate::ConfigError;

pub(crate) fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// All vocabularies used by normalization, dialogue, scoring and fusion
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DomainLexicon {
    #[serde(default)]
    pub normalization: NormalizationLexicon,

    #[serde(default)]
    pub dialogue: DialogueLexicon,

    #[serde(default)]
    pub scoring: ScoringLexicon,

    #[serde(default)]
    pub unknown: UnknownQueryLexicon,
}

impl DomainLexicon {
    /// Built-in marine engine lexicon
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Parse a YAML override; missing sections fall back to built-ins
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let lexicon: Self = serde_yaml::from_str(yaml)?;
        lexicon.validate()?;
        Ok(lexicon)
    }

    /// Load a YAML override from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;
        let lexicon = Self::from_yaml(&content)?;
        tracing::info!(
            path = %path.display(),
            phrases = lexicon.scoring.phrase_weights.len(),
            "Loaded domain lexicon override"
        );
        Ok(lexicon)
    }

    /// Load the configured override, or the built-ins when none is set
    pub fn from_path(path: Option<&str>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::builtin()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for phrase in &self.scoring.phrase_weights {
            if phrase.phrase.trim().is_empty() || phrase.weight <= 0.0 {
                return Err(ConfigError::InvalidValue {
                    field: "scoring.phrase_weights".to_string(),
                    message: format!("Invalid entry '{}' ({})", phrase.phrase, phrase.weight),
                });
            }
        }

        for (category, spec) in &self.scoring.file_categories {
            if spec.patterns.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("scoring.file_categories.{}", category),
                    message: "At least one file pattern is required".to_string(),
                });
            }
        }

        if self.dialogue.main_engine_terms.is_empty()
            || self.dialogue.auxiliary_engine_terms.is_empty()
        {
            return Err(ConfigError::InvalidValue {
                field: "dialogue".to_string(),
                message: "Engine terms cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Every single word the lexicon knows, for the spelling dictionary
    ///
    /// Multi-word phrases contribute each of their words.
    pub fn known_words(&self) -> BTreeSet<String> {
        let mut words = BTreeSet::new();
        let mut add = |text: &str| {
            for word in text.split_whitespace() {
                words.insert(word.to_lowercase());
            }
        };

        let n = &self.normalization;
        n.domain_terms.iter().for_each(|t| add(t));
        n.vocabulary.iter().for_each(|t| add(t));
        n.stopwords.iter().for_each(|t| add(t));
        n.important_stopwords.iter().for_each(|t| add(t));
        n.abbreviations.values().for_each(|t| add(t));
        n.corrections.values().for_each(|t| add(t));
        n.lemma_exceptions.values().for_each(|t| add(t));

        let d = &self.dialogue;
        for list in [
            &d.engine_terms,
            &d.main_engine_terms,
            &d.auxiliary_engine_terms,
            &d.generic_engine_terms,
            &d.component_terms,
            &d.problem_terms,
            &d.action_terms,
            &d.vague_terms,
            &d.function_terms,
        ] {
            list.iter().for_each(|t| add(t));
        }

        let s = &self.scoring;
        s.phrase_weights.iter().for_each(|p| add(&p.phrase));
        s.symptom_categories
            .values()
            .flatten()
            .for_each(|t| add(t));
        s.file_categories
            .values()
            .flat_map(|c| c.terms.iter())
            .for_each(|t| add(t));
        for list in [
            &s.up_terms,
            &s.down_terms,
            &s.cylinder_terms,
            &s.single_scope_terms,
            &s.all_scope_terms,
        ] {
            list.iter().for_each(|t| add(t));
        }

        let u = &self.unknown;
        u.specific_equipment.iter().for_each(|t| add(t));
        u.non_engine_indicators.iter().for_each(|t| add(t));

        words.retain(|w| w.chars().all(|c| c.is_ascii_alphabetic()));
        words
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lexicon_is_valid() {
        let lexicon = DomainLexicon::builtin();
        assert!(lexicon.validate().is_ok());
        assert!(lexicon.normalization.domain_terms.contains("turbocharger"));
        assert_eq!(
            lexicon.normalization.abbreviations.get("temp").map(String::as_str),
            Some("temperature")
        );
    }

    fn weight(lexicon: &DomainLexicon, phrase: &str) -> Option<f32> {
        lexicon
            .scoring
            .phrase_weights
            .iter()
            .find(|p| p.phrase == phrase)
            .map(|p| p.weight)
    }

    #[test]
    fn test_phrase_weights_cover_pressure_and_temperature() {
        let lexicon = DomainLexicon::builtin();
        assert_eq!(weight(&lexicon, "no pressure"), Some(15.0));
        assert_eq!(weight(&lexicon, "high temperature"), Some(12.0));
        for phrase in &lexicon.scoring.phrase_weights {
            assert!((5.0..=15.0).contains(&phrase.weight), "{}", phrase.phrase);
        }
    }

    #[test]
    fn test_yaml_override_keeps_missing_sections() {
        let yaml = r#"
scoring:
  phrase_weights:
    - phrase: "no pressure"
      weight: 10
"#;
        let lexicon = DomainLexicon::from_yaml(yaml).unwrap();
        assert_eq!(weight(&lexicon, "no pressure"), Some(10.0));
        assert_eq!(weight(&lexicon, "high temperature"), None);
        // untouched sections stay built-in
        assert!(!lexicon.dialogue.vague_terms.is_empty());
        assert!(!lexicon.scoring.symptom_categories.is_empty());
    }

    #[test]
    fn test_invalid_override_rejected() {
        let yaml = "scoring:\n  phrase_weights:\n    - phrase: \"\"\n      weight: 3\n";
        assert!(DomainLexicon::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lexicon.yaml");
        std::fs::write(&path, "dialogue:\n  vague_terms: [\"problem\"]\n").unwrap();

        let lexicon = DomainLexicon::load(&path).unwrap();
        assert_eq!(lexicon.dialogue.vague_terms, vec!["problem".to_string()]);
        assert!(DomainLexicon::load(dir.path().join("missing.yaml")).is_err());
    }

    #[test]
    fn test_known_words_split_phrases() {
        let words = DomainLexicon::builtin().known_words();
        assert!(words.contains("seawater"));
        assert!(words.contains("exchanger"));
        assert!(words.contains("hot"));
        assert!(!words.contains("t/c"));
    }
}
