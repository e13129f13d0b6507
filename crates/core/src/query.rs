//! Query identities and preprocessed forms

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier assigned to every diagnose call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryId(pub Uuid);

impl QueryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for QueryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for QueryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Output of the query normalizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreprocessedQuery {
    /// Text as typed by the operator
    pub raw: String,
    /// Lowercased, unit-split, whitespace-collapsed, contractions expanded
    pub normalized: String,
    /// Spell-corrected, expanded, stopword-filtered, lemmatized, polarity-joined
    pub processed: String,
}

impl PreprocessedQuery {
    pub fn is_empty(&self) -> bool {
        self.processed.is_empty()
    }
}

/// Entry written to the query audit log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRecord {
    pub id: QueryId,
    pub session_id: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}
