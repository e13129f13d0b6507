//! Hybrid fault retriever
//!
//! Runs the rule engine and the semantic engine concurrently and fuses their
//! results. Either engine failing only empties its own list.

use std::sync::Arc;

use marine_diag_core::MatchResult;

use crate::fusion::{Fuser, FusionOutcome};
use crate::query::SearchQuery;
use crate::rule_engine::{RuleEngine, RuleMatch};
use crate::semantic::SemanticEngine;

/// Raw output of both engines, before fusion
#[derive(Debug, Clone, Default)]
pub struct EngineResults {
    pub rule: Vec<RuleMatch>,
    pub neural: Vec<MatchResult>,
}

pub struct HybridRetriever {
    rule_engine: Arc<RuleEngine>,
    semantic: Arc<SemanticEngine>,
    fuser: Fuser,
}

impl HybridRetriever {
    pub fn new(rule_engine: Arc<RuleEngine>, semantic: Arc<SemanticEngine>, fuser: Fuser) -> Self {
        Self {
            rule_engine,
            semantic,
            fuser,
        }
    }

    /// Run both engines in parallel
    ///
    /// Rule scoring is CPU-bound and runs in `spawn_blocking`.
    pub async fn search_engines(&self, query: &SearchQuery) -> EngineResults {
        let rule_engine = self.rule_engine.clone();
        let rule_query = query.clone();

        let rule_future = async move {
            tokio::task::spawn_blocking(move || rule_engine.search(&rule_query))
                .await
                .unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "Rule engine task failed, returning no results");
                    Vec::new()
                })
        };
        let semantic_future = self.semantic.search(query);

        let (rule, neural) = tokio::join!(rule_future, semantic_future);

        tracing::debug!(
            rule_results = rule.len(),
            neural_results = neural.len(),
            "Engines complete"
        );
        EngineResults { rule, neural }
    }

    /// Search both engines and fuse into the final answer
    pub async fn retrieve(&self, query: &SearchQuery) -> FusionOutcome {
        let EngineResults { rule, neural } = self.search_engines(query).await;
        let rule = rule.into_iter().map(|m| m.result).collect();
        self.fuser.fuse(&query.raw, rule, neural)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::InMemoryCorpus;
    use crate::embeddings::{EmbeddingTable, HashingOracle};
    use marine_diag_config::{DomainLexicon, FusionConfig, RuleEngineConfig, SemanticConfig};
    use marine_diag_core::{FaultRecord, MatchSource, Subsystem};
    use marine_diag_text_processing::QueryNormalizer;

    async fn retriever() -> HybridRetriever {
        let lexicon = Arc::new(DomainLexicon::builtin());
        let corpus = Arc::new(InMemoryCorpus::new(vec![
            FaultRecord::new("High exhaust temperature", Subsystem::MainEngine)
                .with_source("temperature.yaml", 1)
                .with_symptoms(["Exhaust gas temperature high on all units"]),
            FaultRecord::new("Low lube oil pressure", Subsystem::MainEngine)
                .with_source("pressure.yaml", 1),
        ]));

        let oracle = HashingOracle::new(384);
        let normalizer = QueryNormalizer::builtin().unwrap();
        let table = EmbeddingTable::build(corpus.as_ref(), &normalizer, &oracle)
            .await
            .unwrap();

        let rule_engine = RuleEngine::new(lexicon.clone(), corpus, RuleEngineConfig::default());
        let semantic = SemanticEngine::new(
            Arc::new(oracle),
            Some(Arc::new(table)),
            &lexicon.dialogue,
            SemanticConfig::default(),
        );
        let fuser = Fuser::new(&lexicon.unknown, FusionConfig::default());
        HybridRetriever::new(Arc::new(rule_engine), Arc::new(semantic), fuser)
    }

    #[tokio::test]
    async fn test_both_engines_agree() {
        let retriever = retriever().await;
        let query = SearchQuery::new(
            "main engine exhaust temperature high",
            "ME exhaust temp high",
        );

        let engines = retriever.search_engines(&query).await;
        assert!(!engines.rule.is_empty());
        assert!(!engines.neural.is_empty());

        let outcome = retriever.retrieve(&query).await;
        assert!(!outcome.is_unknown());
        let top = &outcome.results()[0];
        assert_eq!(top.fault_name, "High exhaust temperature");
        assert_eq!(top.source, MatchSource::Both);
        assert!(top.confidence <= 1.0);
    }

    #[tokio::test]
    async fn test_unknown_query_with_no_results() {
        let retriever = retriever().await;
        let query = SearchQuery::new("seawater pump leaking", "seawater pump leaking");
        let outcome = retriever.retrieve(&query).await;
        assert!(outcome.is_unknown());
    }
}
