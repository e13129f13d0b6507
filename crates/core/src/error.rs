//! Error types shared by the collaborator traits

use thiserror::Error;

/// Errors raised by core collaborators (corpus, oracle, stores)
///
/// None of these are fatal to a diagnose call: engines turn their own failures
/// into empty result sets and the dialogue restarts on unreadable state.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("Conversation state corrupted: {0}")]
    StateCorruption(String),

    #[error("Corpus error: {0}")]
    Corpus(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
