//! Clarification dialogue state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fault::Subsystem;
use crate::query::QueryId;

/// What the dialogue is waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Awaiting {
    Engine,
    Component,
    Problem,
}

/// Dialogue state, each variant carrying only the fields valid in it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "awaiting", rename_all = "snake_case")]
pub enum DialogueState {
    /// No clarification pending
    #[default]
    Idle,
    /// Asked which engine the query is about
    AwaitingEngine {
        original_query: String,
        /// Operator text as typed across the clarification so far
        #[serde(default)]
        operator_text: String,
    },
    /// Engine known, asked for the specific issue
    AwaitingComponent {
        original_query: String,
        clarified_engine: Subsystem,
        #[serde(default)]
        operator_text: String,
    },
    /// Component answer was too vague, asked for the problem category
    AwaitingProblem {
        original_query: String,
        clarified_engine: Subsystem,
        clarified_component: String,
        #[serde(default)]
        operator_text: String,
    },
}

impl DialogueState {
    pub fn awaiting(&self) -> Option<Awaiting> {
        match self {
            Self::Idle => None,
            Self::AwaitingEngine { .. } => Some(Awaiting::Engine),
            Self::AwaitingComponent { .. } => Some(Awaiting::Component),
            Self::AwaitingProblem { .. } => Some(Awaiting::Problem),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Raw operator text collected since the clarification started
    pub fn operator_text(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::AwaitingEngine { operator_text, .. }
            | Self::AwaitingComponent { operator_text, .. }
            | Self::AwaitingProblem { operator_text, .. } => Some(operator_text),
        }
    }

    /// Engine already established by an earlier turn
    pub fn clarified_engine(&self) -> Option<Subsystem> {
        match self {
            Self::AwaitingComponent {
                clarified_engine, ..
            }
            | Self::AwaitingProblem {
                clarified_engine, ..
            } => Some(*clarified_engine),
            _ => None,
        }
    }
}

/// Per-session conversation state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    pub dialogue: DialogueState,
    pub last_query_id: Option<QueryId>,
    pub updated_at: DateTime<Utc>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self {
            dialogue: DialogueState::Idle,
            last_query_id: None,
            updated_at: Utc::now(),
        }
    }

    /// Replace the dialogue state for a new turn
    pub fn advance(&mut self, dialogue: DialogueState, query_id: QueryId) {
        self.dialogue = dialogue;
        self.last_query_id = Some(query_id);
        self.updated_at = Utc::now();
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}

/// Follow-up question returned instead of a diagnosis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClarificationRequest {
    pub needs_clarification: bool,
    pub message: String,
    pub awaiting: Awaiting,
}

impl ClarificationRequest {
    pub fn new(message: impl Into<String>, awaiting: Awaiting) -> Self {
        Self {
            needs_clarification: true,
            message: message.into(),
            awaiting,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialogue_state_serde_tagged() {
        let state = DialogueState::AwaitingComponent {
            original_query: "engine problem".to_string(),
            clarified_engine: Subsystem::MainEngine,
            operator_text: "Engine problem".to_string(),
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["awaiting"], "awaiting_component");
        assert_eq!(json["clarified_engine"], "main_engine");

        let back: DialogueState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn test_state_without_operator_text_loads() {
        let json = r#"{"awaiting": "awaiting_engine", "original_query": "problem"}"#;
        let state: DialogueState = serde_json::from_str(json).unwrap();
        assert_eq!(state.operator_text(), Some(""));
    }

    #[test]
    fn test_advance_records_query() {
        let mut state = ConversationState::new();
        let id = QueryId::new();
        state.advance(
            DialogueState::AwaitingEngine {
                original_query: "problem".to_string(),
                operator_text: "Problem!".to_string(),
            },
            id,
        );
        assert_eq!(state.dialogue.awaiting(), Some(Awaiting::Engine));
        assert_eq!(state.dialogue.operator_text(), Some("Problem!"));
        assert_eq!(state.last_query_id, Some(id));
    }

    #[test]
    fn test_clarification_request_flag() {
        let request = ClarificationRequest::new("Which engine?", Awaiting::Engine);
        assert!(request.needs_clarification);
    }
}
