//! Default values shared across the diagnosis pipeline
//!
//! Settings fall back to these; engines never hardcode their own copies.

/// Query normalizer
pub mod normalizer {
    /// Maximum SymSpell edit distance for a correction
    pub const MAX_EDIT_DISTANCE: i64 = 2;

    /// SymSpell prefix length
    pub const PREFIX_LENGTH: i64 = 7;

    /// Tokens this short are never spell-corrected
    pub const MIN_CORRECTABLE_LEN: usize = 3;

    /// Frequency assigned to built-in vocabulary entries
    pub const BUILTIN_FREQUENCY: i64 = 1_000_000;
}

/// Lexical rule engine
pub mod rule_engine {
    /// Query contained in the fault name
    pub const QUERY_IN_NAME_BONUS: f32 = 8.0;

    /// Fault name contained in the query
    pub const NAME_IN_QUERY_BONUS: f32 = 6.0;

    /// Per shared symptom category
    pub const CATEGORY_BONUS: f32 = 5.0;

    /// Multiplier on the name token-overlap ratio
    pub const NAME_OVERLAP_WEIGHT: f32 = 4.0;

    /// Multiplier on the best symptom token-overlap ratio
    pub const SYMPTOM_OVERLAP_WEIGHT: f32 = 3.0;

    /// Shared tokens needed before symptom overlap counts
    pub const SYMPTOM_MIN_SHARED: usize = 2;

    /// Score forced on a directional mismatch
    pub const DIRECTION_MISMATCH_SCORE: f32 = 0.1;

    /// Multiplier on a single/all cylinder mismatch
    pub const SPECIFICITY_PENALTY: f32 = 0.5;

    /// Multiplier on weak matches with no category or overlap support
    pub const NOISE_PENALTY: f32 = 0.3;

    /// Scores below this are subject to noise suppression
    pub const NOISE_CEILING: f32 = 8.0;

    /// Results must score strictly above this
    pub const MIN_SCORE: f32 = 0.0;
}

/// Semantic retrieval engine
pub mod semantic {
    /// Minimum cosine similarity kept
    pub const SIMILARITY_THRESHOLD: f32 = 0.3;

    /// Embedding call timeout
    pub const EMBED_TIMEOUT_MS: u64 = 2_000;

    /// Dimension of the hashing oracle
    pub const HASHING_DIMENSION: usize = 384;

    /// Current embedding table format
    pub const TABLE_VERSION: u32 = 1;

    pub const DEFAULT_TABLE_PATH: &str = "data/fault_embeddings.json";

    pub const OLLAMA_ENDPOINT: &str = "http://localhost:11434";

    pub const OLLAMA_MODEL: &str = "nomic-embed-text";
}

/// Fusion and unknown-query detection
pub mod fusion {
    /// Raw rule score mapped to 1.0
    pub const RULE_SCALE: f32 = 20.0;

    /// Multiplier when both engines return a fault
    pub const AGREEMENT_BOOST: f32 = 1.2;

    /// Results returned
    pub const TOP_K: usize = 5;

    /// Leading results inspected for relevance
    pub const RELEVANCE_WINDOW: usize = 10;

    /// Unknown terms with no results at all
    pub const PENALTY_NO_RESULTS: f32 = 0.0;

    /// Unknown terms, none of the results mention them
    pub const PENALTY_IRRELEVANT: f32 = 0.1;

    /// Relevance ratio under [`SPARSE_RATIO`]
    pub const PENALTY_SPARSE: f32 = 0.3;

    /// Relevance ratio under [`PARTIAL_RATIO`]
    pub const PENALTY_PARTIAL: f32 = 0.6;

    /// Low-confidence floor, scores left unchanged
    pub const PENALTY_LOW_CONFIDENCE: f32 = 1.0;

    pub const SPARSE_RATIO: f32 = 0.2;

    pub const PARTIAL_RATIO: f32 = 0.5;

    /// Unknown when the average normalized confidence is below this...
    pub const FLOOR_AVERAGE: f32 = 0.25;

    /// ...and the best normalized confidence is below this
    pub const FLOOR_MAX: f32 = 0.4;
}

/// Knowledge base locations
pub mod knowledge {
    pub const DEFAULT_ROOT: &str = "knowledge_base";
}
