//! Rule-based noun lemmatizer
//!
//! Strips plural suffixes from nouns. Irregular plurals and words the rules
//! would damage come from the lexicon's exception list. Lemmatizing a lemma
//! returns it unchanged.

use std::collections::HashMap;

/// Endings of singular words that look plural
const SINGULAR_ENDINGS: &[&str] = &["ss", "us", "is", "ous"];

/// Plural endings that drop `es` rather than `s`
const ES_ENDINGS: &[&str] = &["sses", "xes", "ches", "shes", "zes"];

#[derive(Debug, Clone, Default)]
pub struct Lemmatizer {
    exceptions: HashMap<String, String>,
}

impl Lemmatizer {
    pub fn new(exceptions: &HashMap<String, String>) -> Self {
        Self {
            exceptions: exceptions.clone(),
        }
    }

    pub fn lemmatize(&self, word: &str) -> String {
        if let Some(lemma) = self.exceptions.get(word) {
            return lemma.clone();
        }

        if word.chars().count() <= 3
            || !word.ends_with('s')
            || SINGULAR_ENDINGS.iter().any(|e| word.ends_with(e))
            || !word.chars().all(char::is_alphabetic)
        {
            return word.to_string();
        }

        if let Some(stem) = word.strip_suffix("ies") {
            if stem.chars().count() >= 2 {
                return format!("{}y", stem);
            }
        }

        if ES_ENDINGS.iter().any(|e| word.ends_with(e)) {
            return word[..word.len() - 2].to_string();
        }

        word[..word.len() - 1].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_fixture() -> Lemmatizer {
        let mut exceptions = HashMap::new();
        exceptions.insert("gases".to_string(), "gas".to_string());
        exceptions.insert("series".to_string(), "series".to_string());
        Lemmatizer::new(&exceptions)
    }

    #[test]
    fn test_regular_plurals() {
        let lemmatizer = test_fixture();
        assert_eq!(lemmatizer.lemmatize("pistons"), "piston");
        assert_eq!(lemmatizer.lemmatize("valves"), "valve");
        assert_eq!(lemmatizer.lemmatize("batteries"), "battery");
        assert_eq!(lemmatizer.lemmatize("switches"), "switch");
        assert_eq!(lemmatizer.lemmatize("losses"), "loss");
        assert_eq!(lemmatizer.lemmatize("temperatures"), "temperature");
    }

    #[test]
    fn test_singulars_untouched() {
        let lemmatizer = test_fixture();
        for word in ["pressure", "loss", "bus", "axis", "various", "has", "gas", "leaking"] {
            assert_eq!(lemmatizer.lemmatize(word), word);
        }
    }

    #[test]
    fn test_exceptions() {
        let lemmatizer = test_fixture();
        assert_eq!(lemmatizer.lemmatize("gases"), "gas");
        assert_eq!(lemmatizer.lemmatize("series"), "series");
    }

    #[test]
    fn test_idempotent() {
        let lemmatizer = test_fixture();
        for word in ["cylinders", "batteries", "boxes", "causes", "classes", "gases"] {
            let once = lemmatizer.lemmatize(word);
            assert_eq!(lemmatizer.lemmatize(&once), once);
        }
    }
}
