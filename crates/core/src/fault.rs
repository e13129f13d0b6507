//! Fault records and the subsystem taxonomy

use serde::{Deserialize, Serialize};

use crate::{CoreError, Result};

/// Top-level equipment category that scopes fault search
///
/// The taxonomy is canonical across both engines: generators and gensets
/// are auxiliary engines, and the legacy directory name `auxiliary_engines`
/// folds into `auxiliary_engine`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subsystem {
    MainEngine,
    AuxiliaryEngine,
}

impl Subsystem {
    /// Canonical identifier used in fault records and filters
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MainEngine => "main_engine",
            Self::AuxiliaryEngine => "auxiliary_engine",
        }
    }

    /// Human-readable name, used when building enhanced queries and prompts
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::MainEngine => "main engine",
            Self::AuxiliaryEngine => "auxiliary engine",
        }
    }

    /// Parse an identifier or one of its aliases
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "main_engine" | "main" | "me" => Some(Self::MainEngine),
            "auxiliary_engine" | "auxiliary_engines" | "auxiliary" | "aux" | "aux_engine"
            | "ae" | "generator" | "generators" | "gen" | "genset" | "dg"
            | "diesel_generator" => Some(Self::AuxiliaryEngine),
            _ => None,
        }
    }
}

impl std::fmt::Display for Subsystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl From<Subsystem> for String {
    fn from(subsystem: Subsystem) -> Self {
        subsystem.as_str().to_string()
    }
}

/// Map a raw subsystem name onto the canonical taxonomy
///
/// Unknown subsystems (purifier, fuel system, ...) are kept, lowercased.
pub fn canonical_subsystem(raw: &str) -> String {
    match Subsystem::parse(raw) {
        Some(subsystem) => subsystem.as_str().to_string(),
        None => raw.trim().to_lowercase(),
    }
}

/// A probable cause of a fault
///
/// The knowledge base carries both bare strings and structured entries with
/// checks and corrective actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cause {
    Text(String),
    Detailed {
        name: String,
        #[serde(default)]
        checks: Vec<String>,
        #[serde(default)]
        actions: Vec<String>,
    },
}

impl Cause {
    pub fn name(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Detailed { name, .. } => name,
        }
    }

    /// All text of the cause, lowercased, for term relevance checks
    pub fn searchable_text(&self) -> String {
        match self {
            Self::Text(text) => text.to_lowercase(),
            Self::Detailed {
                name,
                checks,
                actions,
            } => {
                let mut parts = Vec::with_capacity(1 + checks.len() + actions.len());
                parts.push(name.as_str());
                parts.extend(checks.iter().map(String::as_str));
                parts.extend(actions.iter().map(String::as_str));
                parts.join(" ").to_lowercase()
            },
        }
    }
}

impl From<&str> for Cause {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// A named failure mode from the knowledge base
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaultRecord {
    /// Fault name, unique within its subsystem
    pub name: String,
    /// Canonical subsystem identifier
    pub subsystem: String,
    /// Knowledge-base file the fault was read from
    #[serde(default)]
    pub source_file: String,
    /// 1-based position of the fault within its file
    #[serde(default)]
    pub fault_number: u32,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub causes: Vec<Cause>,
    #[serde(default)]
    pub actions: Vec<String>,
}

impl FaultRecord {
    pub fn new(name: impl Into<String>, subsystem: Subsystem) -> Self {
        Self {
            name: name.into(),
            subsystem: subsystem.as_str().to_string(),
            source_file: String::new(),
            fault_number: 0,
            symptoms: Vec::new(),
            causes: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn with_source(mut self, source_file: impl Into<String>, fault_number: u32) -> Self {
        self.source_file = source_file.into();
        self.fault_number = fault_number;
        self
    }

    pub fn with_symptoms<I, S>(mut self, symptoms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.symptoms = symptoms.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_causes<I, C>(mut self, causes: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Cause>,
    {
        self.causes = causes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.actions = actions.into_iter().map(Into::into).collect();
        self
    }

    /// Check required fields; called once at corpus load
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::Corpus("fault record without a name".to_string()));
        }
        if self.subsystem.trim().is_empty() {
            return Err(CoreError::Corpus(format!(
                "fault '{}' has no subsystem",
                self.name
            )));
        }
        Ok(())
    }

    /// Name and symptoms, the text the lexical engine matches against
    pub fn match_text(&self) -> String {
        let mut text = self.name.to_lowercase();
        for symptom in &self.symptoms {
            text.push(' ');
            text.push_str(&symptom.to_lowercase());
        }
        text
    }

    /// Belongs to the given subsystem
    pub fn in_subsystem(&self, subsystem: Subsystem) -> bool {
        canonical_subsystem(&self.subsystem) == subsystem.as_str()
    }
}
