//! Query audit logs

use parking_lot::Mutex;

use marine_diag_core::{QueryAuditLog, QueryRecord};

/// Emits every query as a structured `info` event
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditLog;

impl QueryAuditLog for TracingAuditLog {
    fn record(&self, entry: QueryRecord) {
        tracing::info!(
            query_id = %entry.id,
            session_id = %entry.session_id,
            timestamp = %entry.timestamp,
            text = %entry.text,
            "Query received"
        );
    }
}

/// Keeps entries in memory
#[derive(Debug, Default)]
pub struct InMemoryAuditLog {
    entries: Mutex<Vec<QueryRecord>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<QueryRecord> {
        self.entries.lock().clone()
    }
}

impl QueryAuditLog for InMemoryAuditLog {
    fn record(&self, entry: QueryRecord) {
        self.entries.lock().push(entry);
    }
}
