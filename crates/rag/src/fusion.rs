//! Score fusion
//!
//! Engine scores live on different scales: the rule engine is unbounded
//! (~0..20+), the semantic engine is a cosine similarity. Each has one
//! normalization function onto [0, 1]; merging and ranking only ever see
//! normalized values.

use std::collections::HashMap;

use marine_diag_config::{FusionConfig, UnknownQueryLexicon};
use marine_diag_core::{MatchResult, MatchSource};
use serde::{Deserialize, Serialize};

use crate::unknown::{UnknownQueryDetector, SUGGESTION};

/// Map a raw rule score onto [0, 1]: `score / scale`, clamped
pub fn rule_to_unit(score: f32, scale: f32) -> f32 {
    if scale <= 0.0 {
        return 0.0;
    }
    (score / scale).clamp(0.0, 1.0)
}

/// Map a cosine similarity onto [0, 1] by clamping
pub fn neural_to_unit(similarity: f32) -> f32 {
    similarity.clamp(0.0, 1.0)
}

/// Ranked results flagged as probably outside the fault database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnknownQueryReport {
    pub results: Vec<MatchResult>,
    pub is_unknown_query: bool,
    pub unknown_message: String,
    pub missing_terms: Vec<String>,
    pub suggestion: String,
}

/// Final answer of a diagnosis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FusionOutcome {
    Unknown(UnknownQueryReport),
    Ranked(Vec<MatchResult>),
}

impl FusionOutcome {
    pub fn results(&self) -> &[MatchResult] {
        match self {
            Self::Unknown(report) => &report.results,
            Self::Ranked(results) => results,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }
}

pub struct Fuser {
    detector: UnknownQueryDetector,
    config: FusionConfig,
}

impl Fuser {
    pub fn new(lexicon: &UnknownQueryLexicon, config: FusionConfig) -> Self {
        Self {
            detector: UnknownQueryDetector::new(lexicon, config.clone()),
            config,
        }
    }

    /// Merge both engines' raw results into at most `top_k` unique faults
    pub fn fuse(
        &self,
        raw_query: &str,
        rule: Vec<MatchResult>,
        neural: Vec<MatchResult>,
    ) -> FusionOutcome {
        let verdict = self.detector.assess(raw_query, &rule, &neural);
        let penalty = verdict.as_ref().map_or(1.0, |v| v.penalty);

        let normalized_rule = rule.into_iter().map(|mut r| {
            r.confidence = rule_to_unit(r.confidence * penalty, self.config.rule_scale);
            r.source = MatchSource::Rule;
            r
        });
        let normalized_neural = neural.into_iter().map(|mut r| {
            r.confidence = neural_to_unit(r.confidence * penalty);
            r.source = MatchSource::Neural;
            r
        });

        let mut merged: Vec<MatchResult> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for result in normalized_rule {
            if !index.contains_key(&result.fault_name) {
                index.insert(result.fault_name.clone(), merged.len());
                merged.push(result);
            }
        }

        for result in normalized_neural {
            match index.get(&result.fault_name) {
                Some(&i) => {
                    let existing = &mut merged[i];
                    if existing.source == MatchSource::Both {
                        continue;
                    }
                    let best = existing.confidence.max(result.confidence);
                    if result.confidence > existing.confidence {
                        *existing = result;
                    }
                    existing.confidence = (best * self.config.agreement_boost).min(1.0);
                    existing.source = MatchSource::Both;
                },
                None => {
                    index.insert(result.fault_name.clone(), merged.len());
                    merged.push(result);
                },
            }
        }

        merged.sort_by(|a, b| {
            b.confidence
                .total_cmp(&a.confidence)
                .then_with(|| a.fault_name.cmp(&b.fault_name))
        });
        merged.truncate(self.config.top_k);

        match verdict {
            Some(verdict) => {
                tracing::info!(
                    penalty = verdict.penalty,
                    missing_terms = ?verdict.missing_terms,
                    results = merged.len(),
                    "Query flagged as unknown"
                );
                FusionOutcome::Unknown(UnknownQueryReport {
                    results: merged,
                    is_unknown_query: true,
                    unknown_message: verdict.message,
                    missing_terms: verdict.missing_terms,
                    suggestion: SUGGESTION.to_string(),
                })
            },
            None => FusionOutcome::Ranked(merged),
        }
    }
}
