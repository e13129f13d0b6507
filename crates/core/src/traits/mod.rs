//! Collaborator traits consumed by the diagnosis core
//!
//! All external systems are reached through these traits so that:
//! - Backends are pluggable (YAML corpus, HTTP embedding service, durable stores)
//! - Tests run against in-memory implementations
//!
//! # Trait Hierarchy
//!
//! ```text
//! Knowledge:
//!   - FaultCorpus: fault records filtered by subsystem / file category
//!
//! Semantic matching:
//!   - EmbeddingOracle: text → vector, cosine similarity
//!
//! Conversation:
//!   - ConversationStore: per-session dialogue state
//!   - QueryAuditLog: fire-and-forget query log
//! ```

mod audit;
mod corpus;
mod embedding;
mod store;

pub use audit::QueryAuditLog;
pub use corpus::{CorpusFilter, FaultCorpus};
pub use embedding::{cosine_similarity, EmbeddingOracle};
pub use store::ConversationStore;
