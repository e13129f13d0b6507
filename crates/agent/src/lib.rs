//! Diagnosis agent
//!
//! Features:
//! - Clarification dialogue (engine, component, problem follow-ups)
//! - Per-session conversation state with single-writer turns
//! - Query audit logging
//! - `Diagnoser` running the full normalize → clarify → retrieve → fuse pipeline

pub mod audit;
pub mod diagnoser;
pub mod dialogue;
pub mod session;

pub use audit::{InMemoryAuditLog, TracingAuditLog};
pub use diagnoser::{DiagnoseResponse, Diagnoser, ResetAck};
pub use dialogue::{DialogueController, DialogueStep, QueryFeatures};
pub use session::{InMemoryConversationStore, SessionLocks};

use marine_diag_config::ConfigError;
use marine_diag_core::CoreError;
use marine_diag_rag::RagError;
use marine_diag_text_processing::TextProcessingError;
use thiserror::Error;

/// Agent errors
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Text processing error: {0}")]
    TextProcessing(#[from] TextProcessingError),

    #[error("Retrieval error: {0}")]
    Retrieval(#[from] RagError),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}
