//! Target subsystem resolution
//!
//! Precedence: engine clarified by the dialogue, then a whole-word phrase in
//! the enhanced query, then in the raw query. Unresolved means every
//! subsystem is searched.

use marine_diag_config::DialogueLexicon;
use marine_diag_core::Subsystem;
use marine_diag_text_processing::matching::{contains_any, words};

#[derive(Debug, Clone)]
pub struct SubsystemResolver {
    main_terms: Vec<String>,
    auxiliary_terms: Vec<String>,
}

impl SubsystemResolver {
    pub fn new(dialogue: &DialogueLexicon) -> Self {
        Self {
            main_terms: dialogue.main_engine_terms.clone(),
            auxiliary_terms: dialogue.auxiliary_engine_terms.clone(),
        }
    }

    pub fn resolve(
        &self,
        clarified: Option<Subsystem>,
        enhanced: &str,
        raw: &str,
    ) -> Option<Subsystem> {
        clarified
            .or_else(|| self.detect(enhanced))
            .or_else(|| self.detect(raw))
    }

    /// Subsystem named in `text`, main engine winning when both are
    pub fn detect(&self, text: &str) -> Option<Subsystem> {
        let words = words(text);
        if contains_any(&words, &self.main_terms) {
            Some(Subsystem::MainEngine)
        } else if contains_any(&words, &self.auxiliary_terms) {
            Some(Subsystem::AuxiliaryEngine)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> SubsystemResolver {
        SubsystemResolver::new(&DialogueLexicon::default())
    }

    #[test]
    fn test_clarified_engine_wins() {
        let resolved = resolver().resolve(
            Some(Subsystem::AuxiliaryEngine),
            "main engine temperature high",
            "ME temp high",
        );
        assert_eq!(resolved, Some(Subsystem::AuxiliaryEngine));
    }

    #[test]
    fn test_enhanced_then_raw() {
        let r = resolver();
        assert_eq!(
            r.resolve(None, "diesel generator overspeed", "main"),
            Some(Subsystem::AuxiliaryEngine)
        );
        assert_eq!(
            r.resolve(None, "black smoke", "black smoke from the genset"),
            Some(Subsystem::AuxiliaryEngine)
        );
        assert_eq!(r.resolve(None, "black smoke", "black smoke"), None);
    }

    #[test]
    fn test_whole_words_only() {
        let r = resolver();
        // "me" inside "temperature", "gen" inside "emergency"
        assert_eq!(r.detect("temperature emergency"), None);
        assert_eq!(r.detect("ME overheating"), Some(Subsystem::MainEngine));
    }
}
