//! Lexical rule engine
//!
//! Scores every candidate fault against the query with a fixed sequence of
//! stages, then applies guards:
//!
//! | stage | contribution |
//! |-------|--------------|
//! | phrase table | weight of each curated phrase present in both texts |
//! | categories | +5 per shared symptom category |
//! | containment | +8 query text within fault name, +6 fault name within query text |
//! | name overlap | +4 x shared / name tokens |
//! | symptom overlap | +3 x best symptom ratio, needs 2+ shared tokens |
//!
//! Guards: a directional mismatch (query "up", fault name "down" or the
//! reverse) caps the score at 0.1; a single/all cylinder mismatch halves it;
//! a weak score (< 8) with no category or overlap support is scaled by 0.3.
//!
//! Scores are unbounded (~0..20+). Fusion maps them onto [0, 1].

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use marine_diag_config::constants::rule_engine as weights;
use marine_diag_config::{DomainLexicon, RuleEngineConfig, ScoringLexicon};
use marine_diag_core::{CorpusFilter, FaultCorpus, FaultRecord, MatchResult, MatchSource};
use marine_diag_text_processing::matching::{contains_phrase, words};
use marine_diag_text_processing::Lemmatizer;
use serde::Serialize;

use crate::query::SearchQuery;
use crate::subsystem::SubsystemResolver;

/// Guard applied after the scoring stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Guard {
    DirectionMismatch,
    SpecificityMismatch,
    NoiseSuppressed,
}

/// Per-stage contributions to a fault's score
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub phrase: f32,
    pub matched_phrases: Vec<String>,
    pub category: f32,
    pub shared_categories: Vec<String>,
    pub containment: f32,
    pub name_overlap: f32,
    pub symptom_overlap: f32,
    /// Sum of the stages, before guards
    pub base: f32,
    pub guards: Vec<Guard>,
    pub total: f32,
}

/// A scored fault
#[derive(Debug, Clone)]
pub struct RuleMatch {
    pub result: MatchResult,
    pub breakdown: ScoreBreakdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Single,
    All,
}

/// Tokenized view of one text
struct TextFeatures {
    /// Lemmatized words, `_`-joined tokens split
    words: Vec<String>,
    word_set: HashSet<String>,
    /// Words minus stopwords and engine designations
    content: HashSet<String>,
}

pub struct RuleEngine {
    lexicon: Arc<DomainLexicon>,
    corpus: Arc<dyn FaultCorpus>,
    resolver: SubsystemResolver,
    lemmatizer: Lemmatizer,
    /// Words ignored by overlap stages
    ignored: HashSet<String>,
    config: RuleEngineConfig,
}

impl RuleEngine {
    pub fn new(
        lexicon: Arc<DomainLexicon>,
        corpus: Arc<dyn FaultCorpus>,
        config: RuleEngineConfig,
    ) -> Self {
        let normalization = &lexicon.normalization;
        let dialogue = &lexicon.dialogue;

        let ignored = normalization
            .stopwords
            .iter()
            .chain(&normalization.important_stopwords)
            .chain(&dialogue.engine_terms)
            .chain(&dialogue.generic_engine_terms)
            .cloned()
            .collect();

        Self {
            resolver: SubsystemResolver::new(dialogue),
            lemmatizer: Lemmatizer::new(&normalization.lemma_exceptions),
            ignored,
            lexicon,
            corpus,
            config,
        }
    }

    fn scoring(&self) -> &ScoringLexicon {
        &self.lexicon.scoring
    }

    fn features(&self, text: &str) -> TextFeatures {
        let words: Vec<String> = words(text)
            .into_iter()
            .map(|w| self.lemmatizer.lemmatize(&w))
            .collect();
        let word_set: HashSet<String> = words.iter().cloned().collect();
        let content = word_set
            .iter()
            .filter(|w| !self.ignored.contains(*w))
            .cloned()
            .collect();
        TextFeatures {
            words,
            word_set,
            content,
        }
    }

    /// Candidate faults for the query, narrowed by subsystem and file category
    fn candidates(&self, query: &SearchQuery, query_words: &HashSet<String>) -> Vec<FaultRecord> {
        let subsystem = self
            .resolver
            .resolve(query.clarified_engine, &query.text, &query.raw);

        let mut patterns: Vec<String> = Vec::new();
        for (category, spec) in &self.scoring().file_categories {
            if spec.terms.iter().any(|t| query_words.contains(t)) {
                tracing::debug!(category = %category, "File category matched");
                patterns.extend(spec.patterns.iter().cloned());
            }
        }

        let filter = match subsystem {
            Some(subsystem) => CorpusFilter::for_subsystem(subsystem),
            None => CorpusFilter::all(),
        }
        .with_file_patterns(patterns);

        let faults = match self.corpus.faults(&filter) {
            Ok(faults) if faults.is_empty() && !filter.file_patterns.is_empty() => {
                tracing::debug!("No faults in matched file categories, using full subsystem");
                self.corpus.faults(&filter.without_file_patterns())
            },
            other => other,
        };

        match faults {
            Ok(faults) => {
                tracing::debug!(
                    subsystem = ?subsystem,
                    candidates = faults.len(),
                    "Rule engine candidates"
                );
                faults
            },
            Err(e) => {
                tracing::warn!(error = %e, "Fault corpus unavailable, rule engine returns nothing");
                Vec::new()
            },
        }
    }

    /// Score all candidates; results with score above `min_score`, best first
    pub fn search(&self, query: &SearchQuery) -> Vec<RuleMatch> {
        let query_features = self.features(&query.text);
        if query_features.words.is_empty() {
            return Vec::new();
        }
        let query_scope = self.scope(&words(&format!("{} {}", query.raw, query.text)));

        let mut matches: Vec<RuleMatch> = self
            .candidates(query, &query_features.word_set)
            .iter()
            .filter_map(|fault| {
                let breakdown = self.score_with(&query_features, query_scope, fault);
                if breakdown.total > self.config.min_score {
                    if self.config.explain {
                        tracing::debug!(fault = %fault.name, ?breakdown, "Rule score");
                    }
                    Some(RuleMatch {
                        result: MatchResult::from_fault(fault, breakdown.total, MatchSource::Rule),
                        breakdown,
                    })
                } else {
                    None
                }
            })
            .collect();

        matches.sort_by(|a, b| {
            b.result
                .confidence
                .total_cmp(&a.result.confidence)
                .then_with(|| a.result.fault_name.cmp(&b.result.fault_name))
        });

        tracing::debug!(
            query = %query.text,
            results = matches.len(),
            top = matches.first().map(|m| m.result.confidence).unwrap_or(0.0),
            "Rule engine search complete"
        );
        matches
    }

    /// Score a single fault against query text
    pub fn score(&self, query_text: &str, fault: &FaultRecord) -> ScoreBreakdown {
        let features = self.features(query_text);
        let scope = self.scope(&words(query_text));
        self.score_with(&features, scope, fault)
    }

    fn score_with(
        &self,
        query: &TextFeatures,
        query_scope: Option<Scope>,
        fault: &FaultRecord,
    ) -> ScoreBreakdown {
        let scoring = self.scoring();
        let fault_text = self.features(&fault.match_text());
        let name = self.features(&fault.name);
        let mut breakdown = ScoreBreakdown::default();

        // phrase table
        for phrase in &scoring.phrase_weights {
            if phrase_present(query, &phrase.phrase) && phrase_present(&fault_text, &phrase.phrase)
            {
                breakdown.phrase += phrase.weight;
                breakdown.matched_phrases.push(phrase.phrase.clone());
            }
        }

        // symptom categories
        let query_categories = self.categories(&query.word_set);
        let fault_categories = self.categories(&fault_text.word_set);
        breakdown.shared_categories = query_categories
            .intersection(&fault_categories)
            .cloned()
            .collect();
        breakdown.category = weights::CATEGORY_BONUS * breakdown.shared_categories.len() as f32;

        // containment, exact substring each way
        let query_text = query.words.join(" ");
        let name_text = name.words.join(" ");
        if !query_text.is_empty() && !name_text.is_empty() {
            if name_text.contains(&query_text) {
                breakdown.containment += weights::QUERY_IN_NAME_BONUS;
            }
            if query_text.contains(&name_text) {
                breakdown.containment += weights::NAME_IN_QUERY_BONUS;
            }
        }

        // name overlap
        if !name.content.is_empty() {
            let shared = name.content.intersection(&query.content).count();
            breakdown.name_overlap =
                weights::NAME_OVERLAP_WEIGHT * shared as f32 / name.content.len() as f32;
        }

        // best symptom overlap
        let best_symptom = fault
            .symptoms
            .iter()
            .filter_map(|symptom| {
                let symptom = self.features(symptom);
                let shared = symptom.content.intersection(&query.content).count();
                (shared >= weights::SYMPTOM_MIN_SHARED)
                    .then(|| shared as f32 / symptom.content.len() as f32)
            })
            .fold(0.0f32, f32::max);
        breakdown.symptom_overlap = weights::SYMPTOM_OVERLAP_WEIGHT * best_symptom;

        breakdown.base = breakdown.phrase
            + breakdown.category
            + breakdown.containment
            + breakdown.name_overlap
            + breakdown.symptom_overlap;
        let mut total = breakdown.base;

        tracing::trace!(
            fault = %fault.name,
            phrase = breakdown.phrase,
            category = breakdown.category,
            containment = breakdown.containment,
            name_overlap = breakdown.name_overlap,
            symptom_overlap = breakdown.symptom_overlap,
            "Rule stages"
        );

        if total > 0.0 {
            let fault_words = words(&fault.match_text());
            let query_direction = self.direction(&query.word_set);
            let fault_direction = self.direction(&name.word_set);

            if matches!(
                (query_direction, fault_direction),
                (Some(Direction::Up), Some(Direction::Down))
                    | (Some(Direction::Down), Some(Direction::Up))
            ) {
                total = total.min(weights::DIRECTION_MISMATCH_SCORE);
                breakdown.guards.push(Guard::DirectionMismatch);
            } else {
                let cylinder_mentioned = scoring
                    .cylinder_terms
                    .iter()
                    .any(|t| query.word_set.contains(t) || fault_words.contains(t));
                if cylinder_mentioned {
                    let fault_scope = self.scope(&fault_words);
                    if matches!(
                        (query_scope, fault_scope),
                        (Some(Scope::Single), Some(Scope::All))
                            | (Some(Scope::All), Some(Scope::Single))
                    ) {
                        total *= weights::SPECIFICITY_PENALTY;
                        breakdown.guards.push(Guard::SpecificityMismatch);
                    }
                }

                if breakdown.category == 0.0
                    && breakdown.name_overlap == 0.0
                    && breakdown.symptom_overlap == 0.0
                    && total < weights::NOISE_CEILING
                {
                    total *= weights::NOISE_PENALTY;
                    breakdown.guards.push(Guard::NoiseSuppressed);
                }
            }
        }

        breakdown.total = total;
        breakdown
    }

    fn categories(&self, words: &HashSet<String>) -> BTreeSet<String> {
        self.scoring()
            .symptom_categories
            .iter()
            .filter(|(_, terms)| terms.iter().any(|t| words.contains(t)))
            .map(|(category, _)| category.clone())
            .collect()
    }

    fn direction(&self, words: &HashSet<String>) -> Option<Direction> {
        let scoring = self.scoring();
        let up = scoring.up_terms.iter().any(|t| words.contains(t));
        let down = scoring.down_terms.iter().any(|t| words.contains(t));
        match (up, down) {
            (true, false) => Some(Direction::Up),
            (false, true) => Some(Direction::Down),
            _ => None,
        }
    }

    /// Single or all cylinders, from unlemmatized words
    fn scope(&self, words: &[String]) -> Option<Scope> {
        let scoring = self.scoring();
        let has = |terms: &[String]| terms.iter().any(|t| words.contains(t));
        match (has(&scoring.single_scope_terms), has(&scoring.all_scope_terms)) {
            (true, false) => Some(Scope::Single),
            (false, true) => Some(Scope::All),
            _ => None,
        }
    }
}

/// Phrase occurs contiguously, or every word of it occurs
fn phrase_present(text: &TextFeatures, phrase: &str) -> bool {
    contains_phrase(&text.words, phrase)
        || phrase
            .split_whitespace()
            .all(|word| text.word_set.contains(word))
}
