//! Ollama Embeddings
//!
//! Uses Ollama's `/api/embed` endpoint as the embedding oracle.

use async_trait::async_trait;
use marine_diag_config::SemanticConfig;
use marine_diag_core::{EmbeddingOracle, Result as CoreResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::RagError;

/// Request to Ollama embedding API
#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a str,
}

/// Response from Ollama embedding API
#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

/// Ollama-backed embedding oracle
pub struct OllamaOracle {
    client: Client,
    endpoint: String,
    model: String,
}

impl OllamaOracle {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    pub fn from_config(config: &SemanticConfig) -> Self {
        Self::new(&config.ollama_endpoint, &config.ollama_model)
    }

    async fn embed_raw(&self, text: &str) -> Result<Vec<f32>, RagError> {
        let request = EmbedRequest {
            model: &self.model,
            input: text,
        };

        let url = format!("{}/api/embed", self.endpoint);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| RagError::Connection(format!("Ollama request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(RagError::Embedding(format!(
                "Ollama embedding failed: {} - {}",
                status, text
            )));
        }

        let embed_response: EmbedResponse = response
            .json()
            .await
            .map_err(|e| RagError::Embedding(format!("Failed to parse Ollama response: {}", e)))?;

        embed_response
            .embeddings
            .into_iter()
            .next()
            .ok_or_else(|| RagError::Embedding("No embedding returned".to_string()))
    }
}

#[async_trait]
impl EmbeddingOracle for OllamaOracle {
    async fn embed(&self, text: &str) -> CoreResult<Vec<f32>> {
        Ok(self.embed_raw(text).await?)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let oracle = OllamaOracle::from_config(&SemanticConfig::default());
        assert_eq!(oracle.model(), "nomic-embed-text");
        assert_eq!(oracle.endpoint, "http://localhost:11434");
    }

    #[test]
    fn test_endpoint_trailing_slash_trimmed() {
        let oracle = OllamaOracle::new("http://ollama:11434/", "m");
        assert_eq!(oracle.endpoint, "http://ollama:11434");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_engine_unavailable() {
        let oracle = OllamaOracle::new("http://127.0.0.1:9", "m");
        let err = oracle.embed("exhaust").await.unwrap_err();
        assert!(matches!(err, marine_diag_core::CoreError::EngineUnavailable(_)));
    }

    #[test]
    fn test_response_parsing() {
        let json = r#"{"model":"m","embeddings":[[0.1,0.2,0.3]]}"#;
        let response: EmbedResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.embeddings[0].len(), 3);
    }
}
