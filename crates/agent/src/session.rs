//! Conversation Sessions
//!
//! - `InMemoryConversationStore` keeps serialized dialogue state per session
//! - `SessionLocks` serializes turns of the same session

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use marine_diag_core::{ConversationState, ConversationStore, CoreError, Result as CoreResult};

/// In-memory conversation store
///
/// States are held as JSON, the form a durable backend would keep, so a
/// state that no longer deserializes surfaces as `StateCorruption`.
#[derive(Default)]
pub struct InMemoryConversationStore {
    states: RwLock<HashMap<String, String>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.states.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.read().is_empty()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn get(&self, session_id: &str) -> CoreResult<Option<ConversationState>> {
        let raw = self.states.read().get(session_id).cloned();
        match raw {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| CoreError::StateCorruption(format!("session {}: {}", session_id, e))),
            None => Ok(None),
        }
    }

    async fn set(&self, session_id: &str, state: ConversationState) -> CoreResult<()> {
        let raw = serde_json::to_string(&state)?;
        self.states.write().insert(session_id.to_string(), raw);
        Ok(())
    }

    async fn remove(&self, session_id: &str) -> CoreResult<()> {
        self.states.write().remove(session_id);
        Ok(())
    }
}

/// One async mutex per session id
#[derive(Default)]
pub struct SessionLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to the session
    pub async fn acquire(&self, session_id: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(session_id.to_string())
            .or_default()
            .clone();
        lock.lock_owned().await
    }

    /// Drop the lock entry once no turn holds it
    pub fn release(&self, session_id: &str) {
        self.locks
            .remove_if(session_id, |_, lock| Arc::strong_count(lock) == 1);
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
