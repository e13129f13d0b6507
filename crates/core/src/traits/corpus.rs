//! Fault corpus provider

use crate::fault::FaultRecord;
use crate::Result;

/// Restricts which faults a corpus query returns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorpusFilter {
    /// Canonical subsystem identifier; `None` searches every subsystem
    pub subsystem: Option<String>,
    /// File-name glob patterns (`*` wildcard); empty means every file
    pub file_patterns: Vec<String>,
}

impl CorpusFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_subsystem(subsystem: impl Into<String>) -> Self {
        Self {
            subsystem: Some(subsystem.into()),
            file_patterns: Vec::new(),
        }
    }

    pub fn with_file_patterns(mut self, patterns: Vec<String>) -> Self {
        self.file_patterns = patterns;
        self
    }

    /// Same filter without the file-category restriction
    pub fn without_file_patterns(&self) -> Self {
        Self {
            subsystem: self.subsystem.clone(),
            file_patterns: Vec::new(),
        }
    }
}

/// Read-only source of fault records
pub trait FaultCorpus: Send + Sync {
    /// Faults matching the filter, in stable corpus order
    fn faults(&self, filter: &CorpusFilter) -> Result<Vec<FaultRecord>>;

    /// Total number of faults
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
