//! Configuration for the fault diagnosis core
//!
//! Supports loading configuration from:
//! - `config/default.*` and `config/{env}.*` files (YAML or TOML)
//! - Environment variables (`MARINE_DIAG__` prefix, `__` separator)
//!
//! Domain vocabularies and weight tables live in [`DomainLexicon`], built-in
//! by default and optionally overridden from a YAML file.

pub mod constants;
pub mod lexicon;
pub mod settings;

pub use lexicon::{
    DialogueLexicon, DomainLexicon, NormalizationLexicon, PhraseWeight, ScoringLexicon,
    UnknownQueryLexicon,
};
pub use settings::{
    load_settings, FusionConfig, KnowledgeConfig, LogFormat, NormalizerConfig,
    ObservabilityConfig, OracleKind, RuleEngineConfig, RuntimeEnvironment, SemanticConfig,
    Settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
