//! Match results produced by the rule and semantic engines

use serde::{Deserialize, Serialize};

use crate::fault::{Cause, FaultRecord};

/// Which engine produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchSource {
    Rule,
    Neural,
    /// Both engines returned the fault
    Both,
}

/// A candidate diagnosis
///
/// `confidence` is engine-native until fusion normalizes it: unbounded
/// (~0..20+) for the rule engine, cosine similarity for the neural engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub fault_name: String,
    pub confidence: f32,
    pub source: MatchSource,
    pub causes: Vec<Cause>,
    pub symptoms: Vec<String>,
    pub subsystem: String,
    pub source_file: String,
    pub fault_number: u32,
}

impl MatchResult {
    pub fn from_fault(fault: &FaultRecord, confidence: f32, source: MatchSource) -> Self {
        Self {
            fault_name: fault.name.clone(),
            confidence,
            source,
            causes: fault.causes.clone(),
            symptoms: fault.symptoms.clone(),
            subsystem: fault.subsystem.clone(),
            source_file: fault.source_file.clone(),
            fault_number: fault.fault_number,
        }
    }

    /// Name, causes and symptoms lowercased, for relevance checks
    pub fn searchable_text(&self) -> String {
        let mut text = self.fault_name.to_lowercase();
        for cause in &self.causes {
            text.push(' ');
            text.push_str(&cause.searchable_text());
        }
        for symptom in &self.symptoms {
            text.push(' ');
            text.push_str(&symptom.to_lowercase());
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Subsystem;

    #[test]
    fn test_source_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&MatchSource::Both).unwrap(), "\"both\"");
    }

    #[test]
    fn test_searchable_text_covers_causes_and_symptoms() {
        let fault = FaultRecord::new("Low lube oil pressure", Subsystem::MainEngine)
            .with_symptoms(["Pressure Alarm"])
            .with_causes(["Clogged Filter"]);
        let result = MatchResult::from_fault(&fault, 3.0, MatchSource::Rule);
        let text = result.searchable_text();
        assert!(text.contains("pressure alarm"));
        assert!(text.contains("clogged filter"));
    }
}
