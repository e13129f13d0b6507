//! Diagnoser
//!
//! One diagnose call runs the whole pipeline for one operator turn:
//! normalize, advance the clarification dialogue, and either ask a
//! follow-up or search both engines and fuse the results.
//!
//! Turns of the same session are serialized. Conversation state is written
//! only once the turn completes, so a dropped call leaves the session as it
//! was.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use marine_diag_config::{DomainLexicon, OracleKind, Settings};
use marine_diag_core::{
    ClarificationRequest, ConversationState, ConversationStore, DialogueState, EmbeddingOracle,
    FaultCorpus, QueryAuditLog, QueryId, QueryRecord, Subsystem,
};
use marine_diag_rag::{
    EmbeddingTable, Fuser, FusionOutcome, HashingOracle, HybridRetriever, KnowledgeLoader,
    OllamaOracle, RuleEngine, SearchQuery, SemanticEngine,
};
use marine_diag_text_processing::QueryNormalizer;

use crate::audit::TracingAuditLog;
use crate::dialogue::{DialogueController, DialogueStep};
use crate::session::{InMemoryConversationStore, SessionLocks};
use crate::AgentError;

/// Answer to one diagnose call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DiagnoseResponse {
    Clarification(ClarificationRequest),
    Diagnosis(FusionOutcome),
}

impl DiagnoseResponse {
    pub fn is_clarification(&self) -> bool {
        matches!(self, Self::Clarification(_))
    }

    pub fn outcome(&self) -> Option<&FusionOutcome> {
        match self {
            Self::Diagnosis(outcome) => Some(outcome),
            Self::Clarification(_) => None,
        }
    }
}

/// Confirmation of a conversation reset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetAck {
    pub session_id: String,
    pub reset: bool,
}

pub struct Diagnoser {
    normalizer: Arc<QueryNormalizer>,
    dialogue: DialogueController,
    retriever: HybridRetriever,
    store: Arc<dyn ConversationStore>,
    audit: Arc<dyn QueryAuditLog>,
    locks: SessionLocks,
}

impl Diagnoser {
    /// Diagnoser with an in-memory conversation store and a tracing audit log
    pub fn new(normalizer: Arc<QueryNormalizer>, retriever: HybridRetriever) -> Self {
        Self {
            dialogue: DialogueController::new(normalizer.lexicon().clone()),
            normalizer,
            retriever,
            store: Arc::new(InMemoryConversationStore::new()),
            audit: Arc::new(TracingAuditLog),
            locks: SessionLocks::new(),
        }
    }

    pub fn with_store(mut self, store: Arc<dyn ConversationStore>) -> Self {
        self.store = store;
        self
    }

    pub fn with_audit_log(mut self, audit: Arc<dyn QueryAuditLog>) -> Self {
        self.audit = audit;
        self
    }

    /// Wire the full pipeline from settings
    ///
    /// Loads the lexicon and the knowledge base, selects the embedding
    /// oracle, and loads the embedding table (building it when absent).
    pub async fn from_settings(settings: &Settings) -> Result<Self, AgentError> {
        let lexicon = Arc::new(DomainLexicon::from_path(
            settings.knowledge.lexicon_path.as_deref(),
        )?);
        let normalizer = Arc::new(QueryNormalizer::new(lexicon.clone(), &settings.normalizer)?);

        let corpus = Arc::new(KnowledgeLoader::load_directory(Path::new(
            &settings.knowledge.root,
        ))?);
        tracing::info!(
            root = %settings.knowledge.root,
            faults = corpus.len(),
            subsystems = ?corpus.subsystems(),
            "Loaded knowledge base"
        );

        let oracle: Arc<dyn EmbeddingOracle> = match settings.semantic.oracle {
            OracleKind::Hashing => Arc::new(HashingOracle::new(settings.semantic.hashing_dimension)),
            OracleKind::Ollama => Arc::new(OllamaOracle::from_config(&settings.semantic)),
        };

        let table = EmbeddingTable::load_or_build(
            &settings.semantic.table_path,
            corpus.as_ref(),
            &normalizer,
            oracle.as_ref(),
        )
        .await
        .map(Arc::new);

        let rule_engine = RuleEngine::new(lexicon.clone(), corpus, settings.rule_engine.clone());
        let semantic = SemanticEngine::new(
            oracle,
            table,
            &lexicon.dialogue,
            settings.semantic.clone(),
        );
        let fuser = Fuser::new(&lexicon.unknown, settings.fusion.clone());
        let retriever = HybridRetriever::new(Arc::new(rule_engine), Arc::new(semantic), fuser);

        Ok(Self::new(normalizer, retriever))
    }

    /// Run one operator turn
    ///
    /// Never fails: unreadable state restarts the dialogue and engine
    /// failures surface as empty results.
    pub async fn diagnose(
        &self,
        session_id: &str,
        raw_query: &str,
        engine_hint: Option<Subsystem>,
    ) -> DiagnoseResponse {
        let start = Instant::now();
        let query_id = QueryId::new();
        metrics::counter!("diagnose_requests_total").increment(1);

        self.audit.record(QueryRecord {
            id: query_id,
            session_id: session_id.to_string(),
            text: raw_query.to_string(),
            timestamp: Utc::now(),
        });

        if raw_query.trim().is_empty() {
            tracing::warn!(session_id, "Empty query, processing as text");
        }

        let response = {
            let _turn = self.locks.acquire(session_id).await;
            self.run_turn(session_id, query_id, raw_query, engine_hint).await
        };
        self.locks.release(session_id);

        metrics::histogram!("diagnose_latency_seconds").record(start.elapsed().as_secs_f64());
        response
    }

    /// Advance the session's dialogue and search when it resolves
    ///
    /// Callers hold the session's turn lock.
    async fn run_turn(
        &self,
        session_id: &str,
        query_id: QueryId,
        raw_query: &str,
        engine_hint: Option<Subsystem>,
    ) -> DiagnoseResponse {
        let mut state = self.load_state(session_id).await;

        let query = self.normalizer.normalize(raw_query);
        let step = self
            .dialogue
            .step(&state.dialogue, &query.processed, &query.raw, engine_hint);

        let response = match step {
            DialogueStep::Clarify { request, next } => {
                metrics::counter!("diagnose_clarifications_total").increment(1);
                tracing::info!(
                    session_id,
                    query_id = %query_id,
                    awaiting = ?request.awaiting,
                    "Clarification requested"
                );
                state.advance(next, query_id);
                DiagnoseResponse::Clarification(request)
            },
            DialogueStep::Resolved {
                enhanced_query,
                raw_query,
                clarified_engine,
            } => {
                let search = SearchQuery::new(enhanced_query, raw_query).with_engine(clarified_engine);
                let outcome = self.retriever.retrieve(&search).await;

                if outcome.is_unknown() {
                    metrics::counter!("diagnose_unknown_total").increment(1);
                }
                tracing::info!(
                    session_id,
                    query_id = %query_id,
                    enhanced_query = %search.text,
                    results = outcome.results().len(),
                    top = outcome.results().first().map(|r| r.fault_name.as_str()).unwrap_or(""),
                    unknown = outcome.is_unknown(),
                    "Diagnosis complete"
                );
                state.advance(DialogueState::Idle, query_id);
                DiagnoseResponse::Diagnosis(outcome)
            },
        };

        if let Err(e) = self.store.set(session_id, state).await {
            tracing::warn!(session_id, error = %e, "Failed to store conversation state");
        }
        response
    }

    /// Forget any pending clarification for the session
    pub async fn reset_conversation(&self, session_id: &str) -> Result<ResetAck, AgentError> {
        {
            let _turn = self.locks.acquire(session_id).await;
            self.store.remove(session_id).await?;
        }
        self.locks.release(session_id);
        tracing::info!(session_id, "Conversation reset");

        Ok(ResetAck {
            session_id: session_id.to_string(),
            reset: true,
        })
    }

    async fn load_state(&self, session_id: &str) -> ConversationState {
        match self.store.get(session_id).await {
            Ok(Some(state)) => state,
            Ok(None) => ConversationState::new(),
            Err(e) => {
                tracing::warn!(session_id, error = %e, "Conversation state unreadable, restarting dialogue");
                ConversationState::new()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marine_diag_config::{FusionConfig, RuleEngineConfig, SemanticConfig};
    use marine_diag_core::{FaultRecord, MatchResult, MatchSource};
    use marine_diag_rag::InMemoryCorpus;

    fn diagnoser() -> Diagnoser {
        let normalizer = Arc::new(QueryNormalizer::builtin().unwrap());
        let lexicon = normalizer.lexicon().clone();
        let corpus = InMemoryCorpus::new(vec![FaultRecord::new(
            "Low lube oil pressure",
            Subsystem::MainEngine,
        )]);

        let rule_engine = RuleEngine::new(
            lexicon.clone(),
            Arc::new(corpus),
            RuleEngineConfig::default(),
        );
        let semantic = SemanticEngine::new(
            Arc::new(HashingOracle::new(64)),
            None,
            &lexicon.dialogue,
            SemanticConfig::default(),
        );
        let fuser = Fuser::new(&lexicon.unknown, FusionConfig::default());
        let retriever = HybridRetriever::new(Arc::new(rule_engine), Arc::new(semantic), fuser);
        Diagnoser::new(normalizer, retriever)
    }

    #[tokio::test]
    async fn test_turn_lock_released_after_each_turn() {
        let diagnoser = diagnoser();

        let response = diagnoser.diagnose("s1", "problem", None).await;
        assert!(response.is_clarification());
        assert!(diagnoser.locks.is_empty());

        let response = diagnoser.diagnose("s1", "main engine oil pressure low", None).await;
        assert!(!response.is_clarification());
        assert!(diagnoser.locks.is_empty());
    }

    #[tokio::test]
    async fn test_many_sessions_leave_no_locks() {
        let diagnoser = Arc::new(diagnoser());

        let mut handles = Vec::new();
        for i in 0..20 {
            let diagnoser = diagnoser.clone();
            handles.push(tokio::spawn(async move {
                let session = format!("s{}", i % 5);
                diagnoser.diagnose(&session, "main engine oil pressure low", None).await
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(diagnoser.locks.len(), 0);
    }

    #[test]
    fn test_response_shapes() {
        let clarification = DiagnoseResponse::Clarification(ClarificationRequest::new(
            "Which engine?",
            marine_diag_core::Awaiting::Engine,
        ));
        let json = serde_json::to_value(&clarification).unwrap();
        assert_eq!(json["needs_clarification"], true);
        assert_eq!(json["awaiting"], "engine");

        let fault = FaultRecord::new("Low lube oil pressure", Subsystem::MainEngine);
        let diagnosis = DiagnoseResponse::Diagnosis(FusionOutcome::Ranked(vec![
            MatchResult::from_fault(&fault, 0.6, MatchSource::Rule),
        ]));
        let json = serde_json::to_value(&diagnosis).unwrap();
        assert_eq!(json[0]["fault_name"], "Low lube oil pressure");
        assert_eq!(json[0]["source"], "rule");

        let back: DiagnoseResponse = serde_json::from_value(json).unwrap();
        assert_eq!(back, diagnosis);
    }

    #[test]
    fn test_reset_ack_shape() {
        let ack = ResetAck {
            session_id: "s1".to_string(),
            reset: true,
        };
        let json = serde_json::to_value(&ack).unwrap();
        assert_eq!(json["reset"], true);
    }
}
