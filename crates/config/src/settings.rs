//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::{fusion, knowledge, normalizer, rule_engine, semantic};
use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    #[default]
    Development,
    Staging,
    Production,
}

impl RuntimeEnvironment {
    /// Check if strict validation should be applied
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    #[serde(default)]
    pub normalizer: NormalizerConfig,

    #[serde(default)]
    pub rule_engine: RuleEngineConfig,

    #[serde(default)]
    pub semantic: SemanticConfig,

    #[serde(default)]
    pub fusion: FusionConfig,

    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Spell correction parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizerConfig {
    #[serde(default = "default_max_edit_distance")]
    pub max_edit_distance: i64,

    #[serde(default = "default_prefix_length")]
    pub prefix_length: i64,

    /// Optional English frequency dictionary (`word count` per line)
    #[serde(default)]
    pub frequency_dictionary: Option<String>,
}

fn default_max_edit_distance() -> i64 {
    normalizer::MAX_EDIT_DISTANCE
}

fn default_prefix_length() -> i64 {
    normalizer::PREFIX_LENGTH
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            max_edit_distance: default_max_edit_distance(),
            prefix_length: default_prefix_length(),
            frequency_dictionary: None,
        }
    }
}

/// Lexical rule engine parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleEngineConfig {
    /// Faults must score strictly above this
    #[serde(default = "default_min_score")]
    pub min_score: f32,

    /// Emit a debug event with the score breakdown of every kept fault
    #[serde(default)]
    pub explain: bool,
}

fn default_min_score() -> f32 {
    rule_engine::MIN_SCORE
}

impl Default for RuleEngineConfig {
    fn default() -> Self {
        Self {
            min_score: default_min_score(),
            explain: false,
        }
    }
}

/// Which embedding oracle backs the semantic engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OracleKind {
    /// Deterministic character-hash embedding, no model needed
    #[default]
    Hashing,
    /// Ollama HTTP embedding API
    Ollama,
}

/// Semantic retrieval parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticConfig {
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,

    #[serde(default = "default_embed_timeout_ms")]
    pub embed_timeout_ms: u64,

    #[serde(default = "default_table_path")]
    pub table_path: String,

    #[serde(default)]
    pub oracle: OracleKind,

    #[serde(default = "default_hashing_dimension")]
    pub hashing_dimension: usize,

    #[serde(default = "default_ollama_endpoint")]
    pub ollama_endpoint: String,

    #[serde(default = "default_ollama_model")]
    pub ollama_model: String,
}

fn default_similarity_threshold() -> f32 {
    semantic::SIMILARITY_THRESHOLD
}

fn default_embed_timeout_ms() -> u64 {
    semantic::EMBED_TIMEOUT_MS
}

fn default_table_path() -> String {
    semantic::DEFAULT_TABLE_PATH.to_string()
}

fn default_hashing_dimension() -> usize {
    semantic::HASHING_DIMENSION
}

fn default_ollama_endpoint() -> String {
    semantic::OLLAMA_ENDPOINT.to_string()
}

fn default_ollama_model() -> String {
    semantic::OLLAMA_MODEL.to_string()
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            embed_timeout_ms: default_embed_timeout_ms(),
            table_path: default_table_path(),
            oracle: OracleKind::default(),
            hashing_dimension: default_hashing_dimension(),
            ollama_endpoint: default_ollama_endpoint(),
            ollama_model: default_ollama_model(),
        }
    }
}

/// Fusion and unknown-query detection constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    pub rule_scale: f32,
    pub agreement_boost: f32,
    pub top_k: usize,
    pub relevance_window: usize,
    pub penalty_no_results: f32,
    pub penalty_irrelevant: f32,
    pub penalty_sparse: f32,
    pub penalty_partial: f32,
    pub penalty_low_confidence: f32,
    pub sparse_ratio: f32,
    pub partial_ratio: f32,
    pub floor_average: f32,
    pub floor_max: f32,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            rule_scale: fusion::RULE_SCALE,
            agreement_boost: fusion::AGREEMENT_BOOST,
            top_k: fusion::TOP_K,
            relevance_window: fusion::RELEVANCE_WINDOW,
            penalty_no_results: fusion::PENALTY_NO_RESULTS,
            penalty_irrelevant: fusion::PENALTY_IRRELEVANT,
            penalty_sparse: fusion::PENALTY_SPARSE,
            penalty_partial: fusion::PENALTY_PARTIAL,
            penalty_low_confidence: fusion::PENALTY_LOW_CONFIDENCE,
            sparse_ratio: fusion::SPARSE_RATIO,
            partial_ratio: fusion::PARTIAL_RATIO,
            floor_average: fusion::FLOOR_AVERAGE,
            floor_max: fusion::FLOOR_MAX,
        }
    }
}

/// Knowledge base locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// Root directory holding one directory per subsystem
    #[serde(default = "default_knowledge_root")]
    pub root: String,

    /// YAML file overriding the built-in domain lexicon
    #[serde(default)]
    pub lexicon_path: Option<String>,
}

fn default_knowledge_root() -> String {
    knowledge::DEFAULT_ROOT.to_string()
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            root: default_knowledge_root(),
            lexicon_path: None,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

fn check_unit(field: &str, value: f32) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            message: format!("Must be between 0.0 and 1.0, got {}", value),
        });
    }
    Ok(())
}

impl Settings {
    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_normalizer()?;
        self.validate_semantic()?;
        self.validate_fusion()?;

        if self.rule_engine.min_score < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "rule_engine.min_score".to_string(),
                message: format!("Must not be negative, got {}", self.rule_engine.min_score),
            });
        }

        Ok(())
    }

    fn validate_normalizer(&self) -> Result<(), ConfigError> {
        let normalizer = &self.normalizer;

        if !(0..=3).contains(&normalizer.max_edit_distance) {
            return Err(ConfigError::InvalidValue {
                field: "normalizer.max_edit_distance".to_string(),
                message: format!(
                    "Must be between 0 and 3, got {}",
                    normalizer.max_edit_distance
                ),
            });
        }

        if normalizer.prefix_length <= normalizer.max_edit_distance {
            return Err(ConfigError::InvalidValue {
                field: "normalizer.prefix_length".to_string(),
                message: "Must be larger than max_edit_distance".to_string(),
            });
        }

        Ok(())
    }

    fn validate_semantic(&self) -> Result<(), ConfigError> {
        let semantic = &self.semantic;

        check_unit("semantic.similarity_threshold", semantic.similarity_threshold)?;

        if semantic.embed_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "semantic.embed_timeout_ms".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        if semantic.hashing_dimension == 0 {
            return Err(ConfigError::InvalidValue {
                field: "semantic.hashing_dimension".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        if semantic.oracle == OracleKind::Ollama && semantic.ollama_endpoint.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "semantic.ollama_endpoint".to_string(),
                message: "Required when oracle is ollama".to_string(),
            });
        }

        Ok(())
    }

    fn validate_fusion(&self) -> Result<(), ConfigError> {
        let fusion = &self.fusion;

        if fusion.rule_scale <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "fusion.rule_scale".to_string(),
                message: format!("Must be positive, got {}", fusion.rule_scale),
            });
        }

        if fusion.agreement_boost < 1.0 {
            return Err(ConfigError::InvalidValue {
                field: "fusion.agreement_boost".to_string(),
                message: format!("Must be at least 1.0, got {}", fusion.agreement_boost),
            });
        }

        if fusion.top_k == 0 || fusion.top_k > fusion::TOP_K {
            return Err(ConfigError::InvalidValue {
                field: "fusion.top_k".to_string(),
                message: format!("Must be between 1 and {}, got {}", fusion::TOP_K, fusion.top_k),
            });
        }

        if fusion.relevance_window == 0 {
            return Err(ConfigError::InvalidValue {
                field: "fusion.relevance_window".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        check_unit("fusion.penalty_no_results", fusion.penalty_no_results)?;
        check_unit("fusion.penalty_irrelevant", fusion.penalty_irrelevant)?;
        check_unit("fusion.penalty_sparse", fusion.penalty_sparse)?;
        check_unit("fusion.penalty_partial", fusion.penalty_partial)?;
        check_unit("fusion.penalty_low_confidence", fusion.penalty_low_confidence)?;
        check_unit("fusion.sparse_ratio", fusion.sparse_ratio)?;
        check_unit("fusion.partial_ratio", fusion.partial_ratio)?;
        check_unit("fusion.floor_average", fusion.floor_average)?;
        check_unit("fusion.floor_max", fusion.floor_max)?;

        if fusion.sparse_ratio > fusion.partial_ratio {
            return Err(ConfigError::InvalidValue {
                field: "fusion.sparse_ratio".to_string(),
                message: format!(
                    "Cannot be larger than partial_ratio ({})",
                    fusion.partial_ratio
                ),
            });
        }

        Ok(())
    }
}

/// Load settings from files and environment
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("MARINE_DIAG")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    if settings.environment.is_strict() && settings.knowledge.lexicon_path.is_none() {
        tracing::warn!("No lexicon override configured, using built-in domain lexicon");
    }

    Ok(settings)
}
