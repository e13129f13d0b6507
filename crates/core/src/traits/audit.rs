//! Query audit log

use crate::query::QueryRecord;

/// Fire-and-forget log of incoming queries
///
/// Recording must never fail or block a diagnose call.
pub trait QueryAuditLog: Send + Sync {
    fn record(&self, entry: QueryRecord);
}
