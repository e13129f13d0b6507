//! Embeddings for semantic fault search
//!
//! [`HashingOracle`] is a deterministic feature-hashing embedder that needs no
//! model download; [`EmbeddingTable`] is the precomputed, versioned table of
//! fault embeddings the semantic engine searches.

use std::path::Path;

use async_trait::async_trait;
use marine_diag_config::constants::semantic::TABLE_VERSION;
use marine_diag_core::{
    canonical_subsystem, CorpusFilter, EmbeddingOracle, FaultCorpus, FaultRecord,
    Result as CoreResult,
};
use marine_diag_text_processing::matching::words;
use marine_diag_text_processing::QueryNormalizer;
use serde::{Deserialize, Serialize};

use crate::RagError;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Weight of a character trigram relative to a whole word
const TRIGRAM_WEIGHT: f32 = 0.5;

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, b| {
        (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME)
    })
}

/// Hash-based embedder over words and character trigrams
///
/// Texts sharing words or word fragments land close together, which is
/// enough for typo-tolerant fuzzy retrieval without a neural model.
#[derive(Debug, Clone)]
pub struct HashingOracle {
    dimension: usize,
    model: String,
}

impl HashingOracle {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
            model: format!("hashing-{}", dimension.max(1)),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    fn add(&self, embedding: &mut [f32], feature: &[u8], weight: f32) {
        let hash = fnv1a(feature);
        let idx = (hash % self.dimension as u64) as usize;
        let sign = if hash >> 63 == 1 { -1.0 } else { 1.0 };
        embedding[idx] += sign * weight;
    }

    /// Synchronous embedding
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dimension];

        for word in words(text) {
            self.add(&mut embedding, word.as_bytes(), 1.0);

            let padded: Vec<char> = format!("#{}#", word).chars().collect();
            for trigram in padded.windows(3) {
                let trigram: String = trigram.iter().collect();
                self.add(&mut embedding, trigram.as_bytes(), TRIGRAM_WEIGHT);
            }
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut embedding {
                *v /= norm;
            }
        }

        embedding
    }
}

#[async_trait]
impl EmbeddingOracle for HashingOracle {
    async fn embed(&self, text: &str) -> CoreResult<Vec<f32>> {
        Ok(self.embed_text(text))
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// One fault with its embedding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingEntry {
    pub fault: FaultRecord,
    pub subsystem: String,
    pub embedding: Vec<f32>,
}

/// Precomputed fault embeddings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingTable {
    pub version: u32,
    /// Oracle model the embeddings were produced with
    pub model: String,
    pub dimension: usize,
    pub entries: Vec<EmbeddingEntry>,
}

impl EmbeddingTable {
    /// Load and validate a table written by [`EmbeddingTable::save`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RagError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut table: Self = serde_json::from_str(&content)?;
        table.validate()?;

        for entry in &mut table.entries {
            entry.subsystem = canonical_subsystem(&entry.subsystem);
        }

        tracing::info!(
            path = %path.display(),
            model = %table.model,
            entries = table.entries.len(),
            "Loaded embedding table"
        );
        Ok(table)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RagError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        tracing::info!(path = %path.display(), entries = self.entries.len(), "Saved embedding table");
        Ok(())
    }

    pub fn validate(&self) -> Result<(), RagError> {
        if self.version != TABLE_VERSION {
            return Err(RagError::Table(format!(
                "Unsupported table version {}, expected {}",
                self.version, TABLE_VERSION
            )));
        }
        if let Some(entry) = self
            .entries
            .iter()
            .find(|e| e.embedding.len() != self.dimension)
        {
            return Err(RagError::Table(format!(
                "Embedding for '{}' has dimension {}, table declares {}",
                entry.fault.name,
                entry.embedding.len(),
                self.dimension
            )));
        }
        Ok(())
    }

    /// Embed every fault of the corpus
    ///
    /// Each fault is embedded from its name and symptoms after running them
    /// through the query normalizer, so table and queries share one form.
    pub async fn build(
        corpus: &dyn FaultCorpus,
        normalizer: &QueryNormalizer,
        oracle: &dyn EmbeddingOracle,
    ) -> Result<Self, RagError> {
        let faults = corpus
            .faults(&CorpusFilter::all())
            .map_err(|e| RagError::Knowledge(e.to_string()))?;

        let mut entries = Vec::with_capacity(faults.len());
        let mut dimension = 0;

        for fault in faults {
            let mut text = fault.name.clone();
            for symptom in &fault.symptoms {
                text.push(' ');
                text.push_str(symptom);
            }
            let processed = normalizer.normalize(&text).processed;
            let input = if processed.is_empty() { text.to_lowercase() } else { processed };

            let embedding = oracle
                .embed(&input)
                .await
                .map_err(|e| RagError::Embedding(e.to_string()))?;

            if dimension == 0 {
                dimension = embedding.len();
            } else if embedding.len() != dimension {
                return Err(RagError::Table(format!(
                    "Oracle returned dimension {} for '{}', expected {}",
                    embedding.len(),
                    fault.name,
                    dimension
                )));
            }

            entries.push(EmbeddingEntry {
                subsystem: canonical_subsystem(&fault.subsystem),
                fault,
                embedding,
            });
        }

        tracing::info!(
            model = oracle.model(),
            entries = entries.len(),
            dimension,
            "Built embedding table"
        );

        Ok(Self {
            version: TABLE_VERSION,
            model: oracle.model().to_string(),
            dimension,
            entries,
        })
    }

    /// Load the table at `path`, or build and save one when it is missing,
    /// unreadable or made with another model
    ///
    /// `None` when no usable table can be produced; semantic search is then
    /// disabled.
    pub async fn load_or_build(
        path: impl AsRef<Path>,
        corpus: &dyn FaultCorpus,
        normalizer: &QueryNormalizer,
        oracle: &dyn EmbeddingOracle,
    ) -> Option<Self> {
        let path = path.as_ref();
        if path.exists() {
            match Self::load(path) {
                Ok(table) if table.model == oracle.model() => return Some(table),
                Ok(table) => tracing::warn!(
                    table_model = %table.model,
                    oracle_model = oracle.model(),
                    "Embedding table model differs from oracle, rebuilding"
                ),
                Err(e) => tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Embedding table unreadable, rebuilding"
                ),
            }
        }

        if corpus.is_empty() {
            tracing::warn!("Fault corpus is empty, no embedding table built");
            return None;
        }

        match Self::build(corpus, normalizer, oracle).await {
            Ok(table) => {
                if let Err(e) = table.save(path) {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to save embedding table");
                }
                Some(table)
            },
            Err(e) => {
                tracing::error!(error = %e, "Failed to build embedding table");
                None
            },
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::InMemoryCorpus;
    use marine_diag_core::{cosine_similarity, Subsystem};

    #[test]
    fn test_hashing_oracle_deterministic_and_normalized() {
        let oracle = HashingOracle::new(128);
        let a = oracle.embed_text("exhaust temperature high");
        let b = oracle.embed_text("exhaust temperature high");
        assert_eq!(a, b);
        assert_eq!(a.len(), 128);

        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4);
        assert_eq!(oracle.model(), "hashing-128");
    }

    #[test]
    fn test_hashing_oracle_similarity_ordering() {
        let oracle = HashingOracle::new(384);
        let query = oracle.embed_text("exhaust temperature high");
        let close = oracle.embed_text("high exhaust gas temperature");
        let far = oracle.embed_text("generator frequency fluctuation");
        assert!(cosine_similarity(&query, &close) > cosine_similarity(&query, &far));
        assert!(cosine_similarity(&query, &close) > 0.5);
    }

    #[test]
    fn test_empty_text_embeds_to_zero() {
        let embedding = HashingOracle::new(16).embed_text("");
        assert!(embedding.iter().all(|v| *v == 0.0));
    }

    #[tokio::test]
    async fn test_build_save_load() {
        let corpus = InMemoryCorpus::new(vec![
            FaultRecord::new("High exhaust temperature", Subsystem::MainEngine)
                .with_symptoms(["Exhaust gas temperature alarm"]),
            FaultRecord::new("Generator overspeed", Subsystem::AuxiliaryEngine),
        ]);
        let normalizer = QueryNormalizer::builtin().unwrap();
        let oracle = HashingOracle::new(64);

        let table = EmbeddingTable::build(&corpus, &normalizer, &oracle)
            .await
            .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.dimension, 64);
        assert_eq!(table.model, "hashing-64");
        assert_eq!(table.entries[1].subsystem, "auxiliary_engine");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("table.json");
        table.save(&path).unwrap();

        let loaded = EmbeddingTable::load(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.entries[0].embedding, table.entries[0].embedding);
    }

    #[tokio::test]
    async fn test_load_or_build_rebuilds_for_other_model() {
        let corpus = InMemoryCorpus::new(vec![FaultRecord::new(
            "Low lube oil pressure",
            Subsystem::MainEngine,
        )]);
        let normalizer = QueryNormalizer::builtin().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.json");

        let first = EmbeddingTable::load_or_build(&path, &corpus, &normalizer, &HashingOracle::new(32))
            .await
            .unwrap();
        assert!(path.exists());
        assert_eq!(first.model, "hashing-32");

        let second = EmbeddingTable::load_or_build(&path, &corpus, &normalizer, &HashingOracle::new(48))
            .await
            .unwrap();
        assert_eq!(second.dimension, 48);
        assert_eq!(EmbeddingTable::load(&path).unwrap().model, "hashing-48");

        let empty = InMemoryCorpus::default();
        let missing = dir.path().join("none.json");
        assert!(
            EmbeddingTable::load_or_build(&missing, &empty, &normalizer, &HashingOracle::new(32))
                .await
                .is_none()
        );
    }

    #[test]
    fn test_validate_rejects_bad_tables() {
        let fault = FaultRecord::new("Low lube oil pressure", Subsystem::MainEngine);
        let mut table = EmbeddingTable {
            version: TABLE_VERSION,
            model: "hashing-4".to_string(),
            dimension: 4,
            entries: vec![EmbeddingEntry {
                fault,
                subsystem: "main_engine".to_string(),
                embedding: vec![0.0; 3],
            }],
        };
        assert!(matches!(table.validate(), Err(RagError::Table(_))));

        table.entries[0].embedding = vec![0.0; 4];
        assert!(table.validate().is_ok());

        table.version = TABLE_VERSION + 1;
        assert!(matches!(table.validate(), Err(RagError::Table(_))));
    }

    #[test]
    fn test_load_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(EmbeddingTable::load(&path).is_err());
        assert!(EmbeddingTable::load(dir.path().join("missing.json")).is_err());
    }
}
