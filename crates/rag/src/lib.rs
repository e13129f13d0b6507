//! Fault retrieval with hybrid lexical and semantic search
//!
//! Features:
//! - Knowledge base loading (`<root>/<subsystem>/*.yaml`) into an in-memory corpus
//! - Subsystem resolution shared by both engines
//! - Lexical rule engine with phrase weights, categories and guards
//! - Semantic search over a precomputed embedding table
//! - Hashing and Ollama embedding oracles
//! - Score fusion with unknown-query detection
//! - Concurrent hybrid retriever

pub mod corpus;
pub mod embeddings;
pub mod fusion;
pub mod knowledge_loader;
pub mod ollama_embeddings;
pub mod query;
pub mod retriever;
pub mod rule_engine;
pub mod semantic;
pub mod subsystem;
pub mod unknown;

pub use corpus::InMemoryCorpus;
pub use embeddings::{EmbeddingEntry, EmbeddingTable, HashingOracle};
pub use fusion::{neural_to_unit, rule_to_unit, Fuser, FusionOutcome, UnknownQueryReport};
pub use knowledge_loader::KnowledgeLoader;
pub use ollama_embeddings::OllamaOracle;
pub use query::SearchQuery;
pub use retriever::HybridRetriever;
pub use rule_engine::{Guard, RuleEngine, RuleMatch, ScoreBreakdown};
pub use semantic::SemanticEngine;
pub use subsystem::SubsystemResolver;
pub use unknown::{UnknownAssessment, UnknownQueryDetector};

use marine_diag_core::CoreError;
use thiserror::Error;

/// Retrieval errors
#[derive(Error, Debug)]
pub enum RagError {
    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Knowledge base error: {0}")]
    Knowledge(String),

    #[error("Embedding table error: {0}")]
    Table(String),

    #[error("Embedding timed out after {0} ms")]
    Timeout(u64),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<RagError> for CoreError {
    fn from(err: RagError) -> Self {
        match err {
            RagError::Embedding(_) | RagError::Timeout(_) | RagError::Connection(_) => {
                CoreError::EngineUnavailable(err.to_string())
            },
            RagError::Serialization(e) => CoreError::Serialization(e),
            other => CoreError::Corpus(other.to_string()),
        }
    }
}
