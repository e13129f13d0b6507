//! Conversation state store

use async_trait::async_trait;

use crate::conversation::ConversationState;
use crate::Result;

/// Keyed storage of per-session dialogue state
///
/// Implementations only need per-key atomicity; the diagnoser serializes
/// turns of the same session itself.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Current state; `Err(StateCorruption)` if stored state is unreadable
    async fn get(&self, session_id: &str) -> Result<Option<ConversationState>>;

    async fn set(&self, session_id: &str, state: ConversationState) -> Result<()>;

    async fn remove(&self, session_id: &str) -> Result<()>;
}
