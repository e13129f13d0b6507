//! Semantic retrieval over the embedding table
//!
//! Fails closed: a missing table, a table built with another model, an
//! oracle error or a timeout all yield an empty result list.

use std::sync::Arc;
use std::time::Duration;

use marine_diag_config::{DialogueLexicon, SemanticConfig};
use marine_diag_core::{EmbeddingOracle, MatchResult, MatchSource};

use crate::embeddings::EmbeddingTable;
use crate::query::SearchQuery;
use crate::subsystem::SubsystemResolver;
use crate::RagError;

pub struct SemanticEngine {
    oracle: Arc<dyn EmbeddingOracle>,
    table: Option<Arc<EmbeddingTable>>,
    resolver: SubsystemResolver,
    config: SemanticConfig,
}

impl SemanticEngine {
    pub fn new(
        oracle: Arc<dyn EmbeddingOracle>,
        table: Option<Arc<EmbeddingTable>>,
        dialogue: &DialogueLexicon,
        config: SemanticConfig,
    ) -> Self {
        if let Some(table) = &table {
            if table.model != oracle.model() {
                tracing::warn!(
                    table_model = %table.model,
                    oracle_model = oracle.model(),
                    "Embedding table was built with a different model, semantic search disabled"
                );
            }
        } else {
            tracing::warn!("No embedding table, semantic search disabled");
        }

        Self {
            oracle,
            table,
            resolver: SubsystemResolver::new(dialogue),
            config,
        }
    }

    /// Table usable with the configured oracle
    pub fn is_available(&self) -> bool {
        self.table
            .as_ref()
            .is_some_and(|t| !t.is_empty() && t.model == self.oracle.model())
    }

    /// Faults with cosine similarity above the threshold, best first
    pub async fn search(&self, query: &SearchQuery) -> Vec<MatchResult> {
        match self.try_search(query).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!(error = %e, "Semantic search failed, returning no results");
                Vec::new()
            },
        }
    }

    async fn try_search(&self, query: &SearchQuery) -> Result<Vec<MatchResult>, RagError> {
        let Some(table) = self.table.as_ref().filter(|_| self.is_available()) else {
            return Ok(Vec::new());
        };
        if query.text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let subsystem = self
            .resolver
            .resolve(query.clarified_engine, &query.text, &query.raw);

        let timeout_ms = self.config.embed_timeout_ms;
        let embedding = tokio::time::timeout(
            Duration::from_millis(timeout_ms),
            self.oracle.embed(&query.text),
        )
        .await
        .map_err(|_| RagError::Timeout(timeout_ms))?
        .map_err(|e| RagError::Embedding(e.to_string()))?;

        if embedding.len() != table.dimension {
            return Err(RagError::Table(format!(
                "Query embedding has dimension {}, table has {}",
                embedding.len(),
                table.dimension
            )));
        }

        let mut results: Vec<MatchResult> = table
            .entries
            .iter()
            .filter(|entry| subsystem.map_or(true, |s| entry.subsystem == s.as_str()))
            .filter_map(|entry| {
                let similarity = self.oracle.cosine_similarity(&embedding, &entry.embedding);
                (similarity > self.config.similarity_threshold)
                    .then(|| MatchResult::from_fault(&entry.fault, similarity, MatchSource::Neural))
            })
            .collect();

        results.sort_by(|a, b| {
            b.confidence
                .total_cmp(&a.confidence)
                .then_with(|| a.fault_name.cmp(&b.fault_name))
        });

        tracing::debug!(
            query = %query.text,
            subsystem = ?subsystem,
            results = results.len(),
            "Semantic search complete"
        );
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::InMemoryCorpus;
    use crate::embeddings::HashingOracle;
    use async_trait::async_trait;
    use marine_diag_core::{CoreError, FaultRecord, Subsystem};
    use marine_diag_text_processing::QueryNormalizer;

    async fn table(oracle: &HashingOracle) -> Arc<EmbeddingTable> {
        let corpus = InMemoryCorpus::new(vec![
            FaultRecord::new("High exhaust temperature", Subsystem::MainEngine)
                .with_symptoms(["Exhaust gas temperature alarm"]),
            FaultRecord::new("Low lube oil pressure", Subsystem::MainEngine),
            FaultRecord::new("High exhaust temperature", Subsystem::AuxiliaryEngine),
        ]);
        let normalizer = QueryNormalizer::builtin().unwrap();
        Arc::new(
            EmbeddingTable::build(&corpus, &normalizer, oracle)
                .await
                .unwrap(),
        )
    }

    async fn engine() -> SemanticEngine {
        let oracle = HashingOracle::new(384);
        let table = table(&oracle).await;
        SemanticEngine::new(
            Arc::new(oracle),
            Some(table),
            &DialogueLexicon::default(),
            SemanticConfig::default(),
        )
    }

    struct FailingOracle;

    #[async_trait]
    impl EmbeddingOracle for FailingOracle {
        async fn embed(&self, _text: &str) -> marine_diag_core::Result<Vec<f32>> {
            Err(CoreError::EngineUnavailable("down".to_string()))
        }

        fn model(&self) -> &str {
            "hashing-384"
        }
    }

    struct SlowOracle;

    #[async_trait]
    impl EmbeddingOracle for SlowOracle {
        async fn embed(&self, _text: &str) -> marine_diag_core::Result<Vec<f32>> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(vec![0.0; 384])
        }

        fn model(&self) -> &str {
            "hashing-384"
        }
    }

    #[tokio::test]
    async fn test_search_ranks_and_thresholds() {
        let engine = engine().await;
        let results = engine
            .search(&SearchQuery::new("exhaust temperature high", "exhaust temp high"))
            .await;

        assert!(!results.is_empty());
        assert_eq!(results[0].fault_name, "High exhaust temperature");
        assert!(results.iter().all(|r| r.confidence > 0.3));
        assert!(results.iter().all(|r| r.source == MatchSource::Neural));
        for pair in results.windows(2) {
            assert!(pair[0].confidence >= pair[1].confidence);
        }
    }

    #[tokio::test]
    async fn test_search_filters_subsystem() {
        let engine = engine().await;
        let query = SearchQuery::new("exhaust temperature high", "")
            .with_engine(Some(Subsystem::AuxiliaryEngine));
        let results = engine.search(&query).await;
        assert!(!results.is_empty());
        assert!(results.iter().all(|r| r.subsystem == "auxiliary_engine"));
    }

    #[tokio::test]
    async fn test_fails_closed() {
        let oracle = HashingOracle::new(384);
        let table = table(&oracle).await;
        let query = SearchQuery::new("exhaust temperature high", "");

        let missing = SemanticEngine::new(
            Arc::new(oracle.clone()),
            None,
            &DialogueLexicon::default(),
            SemanticConfig::default(),
        );
        assert!(missing.search(&query).await.is_empty());

        let failing = SemanticEngine::new(
            Arc::new(FailingOracle),
            Some(table.clone()),
            &DialogueLexicon::default(),
            SemanticConfig::default(),
        );
        assert!(failing.search(&query).await.is_empty());

        let other_model = SemanticEngine::new(
            Arc::new(HashingOracle::new(128)),
            Some(table),
            &DialogueLexicon::default(),
            SemanticConfig::default(),
        );
        assert!(!other_model.is_available());
        assert!(other_model.search(&query).await.is_empty());
    }

    #[tokio::test]
    async fn test_timeout_fails_closed() {
        let oracle = HashingOracle::new(384);
        let table = table(&oracle).await;
        let config = SemanticConfig {
            embed_timeout_ms: 20,
            ..SemanticConfig::default()
        };
        let slow = SemanticEngine::new(
            Arc::new(SlowOracle),
            Some(table),
            &DialogueLexicon::default(),
            config,
        );
        let results = slow
            .search(&SearchQuery::new("exhaust temperature high", ""))
            .await;
        assert!(results.is_empty());
    }
}
