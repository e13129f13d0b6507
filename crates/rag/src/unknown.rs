//! Unknown-query detection
//!
//! Flags queries about equipment the fault database does not cover, or
//! queries every engine is unsure about. The verdict carries a penalty that
//! fusion multiplies into every raw confidence before ranking.

use marine_diag_config::{FusionConfig, UnknownQueryLexicon};
use marine_diag_core::MatchResult;
use regex::Regex;

use crate::fusion::{neural_to_unit, rule_to_unit};

/// Advice attached to every unknown-query report
pub const SUGGESTION: &str =
    "Try rephrasing your query or check if the equipment/system is covered in the fault database.";

/// Why a query was judged unknown
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownAssessment {
    /// Multiplier applied to raw confidences
    pub penalty: f32,
    pub message: String,
    /// Out-of-scope terms found in the query
    pub missing_terms: Vec<String>,
}

struct TermPattern {
    term: String,
    pattern: Regex,
}

pub struct UnknownQueryDetector {
    terms: Vec<TermPattern>,
    config: FusionConfig,
}

impl UnknownQueryDetector {
    pub fn new(lexicon: &UnknownQueryLexicon, config: FusionConfig) -> Self {
        let mut terms: Vec<TermPattern> = Vec::new();
        for term in lexicon
            .specific_equipment
            .iter()
            .chain(&lexicon.non_engine_indicators)
        {
            let term = term.trim().to_lowercase();
            if term.is_empty()
                || lexicon.excluded_indicators.contains(&term)
                || terms.iter().any(|t| t.term == term)
            {
                continue;
            }
            // word start only, so "leak" finds "leaking" but "fire" skips "misfire"
            match Regex::new(&format!(r"(?i)\b{}", regex::escape(&term))) {
                Ok(pattern) => terms.push(TermPattern { term, pattern }),
                Err(e) => tracing::warn!(term = %term, error = %e, "Skipping unknown-query term"),
            }
        }

        Self { terms, config }
    }

    /// Out-of-scope terms present in the raw query
    pub fn scan(&self, raw_query: &str) -> Vec<String> {
        self.terms
            .iter()
            .filter(|t| t.pattern.is_match(raw_query))
            .map(|t| t.term.clone())
            .collect()
    }

    /// Judge the query given both engines' raw results
    ///
    /// `None` means the query is in scope.
    pub fn assess(
        &self,
        raw_query: &str,
        rule: &[MatchResult],
        neural: &[MatchResult],
    ) -> Option<UnknownAssessment> {
        let missing_terms = self.scan(raw_query);
        let total = rule.len() + neural.len();

        if missing_terms.is_empty() {
            return if total > 0 {
                self.confidence_floor(rule, neural)
            } else {
                None
            };
        }

        let terms = missing_terms.join(", ");

        if total == 0 {
            return Some(UnknownAssessment {
                penalty: self.config.penalty_no_results,
                message: format!(
                    "No faults found related to '{}'. This equipment/system may not be covered in the engine fault database.",
                    terms
                ),
                missing_terms,
            });
        }

        let window = total.min(self.config.relevance_window);
        let relevant = rule
            .iter()
            .chain(neural)
            .take(window)
            .filter(|result| {
                let text = result.searchable_text();
                missing_terms.iter().any(|term| text.contains(term.as_str()))
            })
            .count();
        let ratio = relevant as f32 / window as f32;

        tracing::debug!(
            terms = %terms,
            relevant,
            window,
            ratio,
            "Unknown-query relevance"
        );

        let (penalty, message) = if relevant == 0 {
            (
                self.config.penalty_irrelevant,
                format!(
                    "No engine faults found related to '{}'. The returned results are general engine issues that may not be relevant to your specific query.",
                    terms
                ),
            )
        } else if ratio < self.config.sparse_ratio {
            (
                self.config.penalty_sparse,
                format!(
                    "Limited engine fault information available for '{}'. Showing general engine faults that may be indirectly related.",
                    terms
                ),
            )
        } else if ratio < self.config.partial_ratio {
            (
                self.config.penalty_partial,
                format!(
                    "Some engine faults found related to '{}', but coverage may be limited.",
                    terms
                ),
            )
        } else {
            return None;
        };

        Some(UnknownAssessment {
            penalty,
            message,
            missing_terms,
        })
    }

    fn confidence_floor(
        &self,
        rule: &[MatchResult],
        neural: &[MatchResult],
    ) -> Option<UnknownAssessment> {
        let scores: Vec<f32> = rule
            .iter()
            .map(|r| rule_to_unit(r.confidence, self.config.rule_scale))
            .chain(neural.iter().map(|r| neural_to_unit(r.confidence)))
            .collect();

        let average = scores.iter().sum::<f32>() / scores.len() as f32;
        let max = scores.iter().copied().fold(0.0f32, f32::max);

        if average < self.config.floor_average && max < self.config.floor_max {
            tracing::debug!(average, max, "All matches below the confidence floor");
            Some(UnknownAssessment {
                penalty: self.config.penalty_low_confidence,
                message: "Low confidence in all matches. Your query might be about equipment or issues not well covered in the engine fault database.".to_string(),
                missing_terms: Vec::new(),
            })
        } else {
            None
        }
    }
}
