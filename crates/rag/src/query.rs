//! Search request shared by both engines

use marine_diag_core::Subsystem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Enhanced query, or the processed query when the dialogue added nothing
    pub text: String,
    /// Operator text as typed, joined across clarification turns
    pub raw: String,
    /// Engine established by the dialogue or supplied by the caller
    pub clarified_engine: Option<Subsystem>,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            raw: raw.into(),
            clarified_engine: None,
        }
    }

    pub fn with_engine(mut self, engine: Option<Subsystem>) -> Self {
        self.clarified_engine = engine;
        self
    }
}
