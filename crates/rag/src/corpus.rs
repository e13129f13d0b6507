//! In-memory fault corpus

use std::collections::HashSet;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use marine_diag_core::{
    canonical_subsystem, CorpusFilter, FaultCorpus, FaultRecord, Result as CoreResult,
};

/// Read-only fault corpus held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryCorpus {
    faults: Vec<FaultRecord>,
}

impl InMemoryCorpus {
    /// Build a corpus, skipping invalid records and repeated names within a subsystem
    pub fn new(faults: Vec<FaultRecord>) -> Self {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(faults.len());

        for mut fault in faults {
            if let Err(e) = fault.validate() {
                tracing::warn!(error = %e, file = %fault.source_file, "Skipping invalid fault record");
                continue;
            }
            fault.subsystem = canonical_subsystem(&fault.subsystem);
            if !seen.insert((fault.subsystem.clone(), fault.name.to_lowercase())) {
                tracing::warn!(
                    fault = %fault.name,
                    subsystem = %fault.subsystem,
                    "Duplicate fault name in subsystem, keeping the first"
                );
                continue;
            }
            kept.push(fault);
        }

        Self { faults: kept }
    }

    /// A single fault by subsystem and name
    pub fn find(&self, subsystem: &str, name: &str) -> Option<&FaultRecord> {
        let subsystem = canonical_subsystem(subsystem);
        self.faults
            .iter()
            .find(|f| f.subsystem == subsystem && f.name.eq_ignore_ascii_case(name))
    }

    /// Distinct subsystems, in load order
    pub fn subsystems(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.faults
            .iter()
            .map(|f| f.subsystem.as_str())
            .filter(|s| seen.insert(*s))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FaultRecord> {
        self.faults.iter()
    }
}

impl FaultCorpus for InMemoryCorpus {
    fn faults(&self, filter: &CorpusFilter) -> CoreResult<Vec<FaultRecord>> {
        let subsystem = filter.subsystem.as_deref().map(canonical_subsystem);
        let files = (!filter.file_patterns.is_empty()).then(|| file_globs(&filter.file_patterns));

        Ok(self
            .faults
            .iter()
            .filter(|f| subsystem.as_deref().map_or(true, |s| f.subsystem == s))
            .filter(|f| files.as_ref().map_or(true, |set| set.is_match(&f.source_file)))
            .cloned()
            .collect())
    }

    fn len(&self) -> usize {
        self.faults.len()
    }
}

/// Case-insensitive glob set over source file names
///
/// Patterns that fail to compile are skipped.
fn file_globs(patterns: &[String]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        match GlobBuilder::new(pattern).case_insensitive(true).build() {
            Ok(glob) => {
                builder.add(glob);
            },
            Err(e) => {
                tracing::warn!(pattern = %pattern, error = %e, "Skipping invalid file pattern")
            },
        }
    }
    builder.build().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "File pattern set failed to build, matching nothing");
        GlobSet::empty()
    })
}
