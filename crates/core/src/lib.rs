//! Core traits and types for marine engine fault diagnosis
//!
//! This crate provides foundational types used across all other crates:
//! - Fault records and match results
//! - Subsystem taxonomy (main / auxiliary engine)
//! - Conversation (clarification dialogue) state
//! - Collaborator traits: fault corpus, embedding oracle, conversation store,
//!   query audit log
//! - Error types

pub mod conversation;
pub mod error;
pub mod fault;
pub mod matching;
pub mod query;
pub mod traits;

pub use conversation::{Awaiting, ClarificationRequest, ConversationState, DialogueState};
pub use error::{CoreError, Result};
pub use fault::{canonical_subsystem, Cause, FaultRecord, Subsystem};
pub use matching::{MatchResult, MatchSource};
pub use query::{PreprocessedQuery, QueryId, QueryRecord};

pub use traits::{
    cosine_similarity, ConversationStore, CorpusFilter, EmbeddingOracle, FaultCorpus,
    QueryAuditLog,
};
