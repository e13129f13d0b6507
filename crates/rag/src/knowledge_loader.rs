//! Knowledge Base Loader
//!
//! Loads fault records from a knowledge-base root holding one directory per
//! subsystem (`<root>/<subsystem>/*.yaml`). A file is either a single
//! document with a top-level `fault:` mapping, or several sections each
//! introduced by a `## Fault <n>` heading.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

use marine_diag_core::{canonical_subsystem, Cause, FaultRecord};

use crate::corpus::InMemoryCorpus;
use crate::RagError;

/// `## Fault <n>` heading, with anything after it on the same line
static SECTION_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"##\s*Fault\s+\d+[^\n]*").expect("valid section pattern"));

/// Fault mapping as written in knowledge-base files
#[derive(Debug, Deserialize)]
struct FaultEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    symptoms: Vec<String>,
    #[serde(default)]
    causes: Vec<Cause>,
    #[serde(default, alias = "corrective_actions")]
    actions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct FaultDocument {
    fault: FaultEntry,
}

/// Knowledge loader for populating the fault corpus
pub struct KnowledgeLoader;

impl KnowledgeLoader {
    /// Load every subsystem directory under `root`
    ///
    /// A missing root yields an empty corpus. Unreadable files and
    /// unparsable sections are skipped with an error event.
    pub fn load_directory(root: &Path) -> Result<InMemoryCorpus, RagError> {
        if !root.exists() {
            tracing::warn!(path = %root.display(), "Knowledge directory does not exist");
            return Ok(InMemoryCorpus::default());
        }

        let mut faults = Vec::new();
        for subsystem_dir in sorted_entries(root)? {
            if !subsystem_dir.is_dir() {
                continue;
            }
            let Some(dir_name) = subsystem_dir.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let subsystem = canonical_subsystem(dir_name);

            for path in sorted_entries(&subsystem_dir)? {
                let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
                if !matches!(extension, "yaml" | "yml") {
                    continue;
                }

                match Self::load_file(&path, &subsystem) {
                    Ok(loaded) => {
                        tracing::info!(
                            file = %path.display(),
                            subsystem = %subsystem,
                            faults = loaded.len(),
                            "Loaded knowledge file"
                        );
                        faults.extend(loaded);
                    },
                    Err(e) => {
                        tracing::error!(
                            file = %path.display(),
                            error = %e,
                            "Failed to load knowledge file"
                        );
                    },
                }
            }
        }

        let corpus = InMemoryCorpus::new(faults);
        tracing::info!(
            directory = %root.display(),
            total_faults = corpus.iter().count(),
            "Knowledge base loading complete"
        );
        Ok(corpus)
    }

    /// Load a single knowledge file
    pub fn load_file(path: &Path, subsystem: &str) -> Result<Vec<FaultRecord>, RagError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RagError::Knowledge(format!("Failed to read file: {}", e)))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        Ok(Self::parse(&content, file_name, subsystem))
    }

    /// Parse file content into fault records
    pub fn parse(content: &str, file_name: &str, subsystem: &str) -> Vec<FaultRecord> {
        let subsystem = canonical_subsystem(subsystem);

        let sections: Vec<String> = match split_sections(content) {
            Some(sections) => sections,
            None => vec![content.to_string()],
        };

        let mut faults = Vec::with_capacity(sections.len());
        for (index, section) in sections.iter().enumerate() {
            let fault_number = index as u32 + 1;
            let document: FaultDocument = match serde_yaml::from_str(section) {
                Ok(document) => document,
                Err(e) => {
                    tracing::warn!(
                        file = file_name,
                        fault_number,
                        error = %e,
                        "Skipping unparsable fault section"
                    );
                    continue;
                },
            };

            let entry = document.fault;
            let Some(name) = entry.name.filter(|n| !n.trim().is_empty()) else {
                tracing::warn!(file = file_name, fault_number, "Skipping fault without a name");
                continue;
            };

            faults.push(FaultRecord {
                name: name.trim().to_string(),
                subsystem: subsystem.clone(),
                source_file: file_name.to_string(),
                fault_number,
                symptoms: entry.symptoms,
                causes: entry.causes,
                actions: entry.actions,
            });
        }
        faults
    }
}

/// Split a multi-fault file into standalone `fault:` documents
///
/// Returns `None` when the file has no section headings.
fn split_sections(content: &str) -> Option<Vec<String>> {
    if !SECTION_HEADING.is_match(content) {
        return None;
    }

    let sections = SECTION_HEADING
        .split(content)
        .skip(1)
        .map(|section| {
            if section.trim_start().starts_with("fault:") {
                section.to_string()
            } else {
                format!("fault:{}", section)
            }
        })
        .collect();
    Some(sections)
}

fn sorted_entries(dir: &Path) -> Result<Vec<std::path::PathBuf>, RagError> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| RagError::Knowledge(format!("Failed to read directory: {}", e)))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry =
            entry.map_err(|e| RagError::Knowledge(format!("Failed to read entry: {}", e)))?;
        paths.push(entry.path());
    }
    paths.sort();
    Ok(paths)
}
