//! Ollama client — generation and embeddings over the local HTTP API.
//!
//! Implements both [`Responder`] (via `/api/generate`) and [`Embedder`]
//! (via `/api/embeddings`). The model itself is opaque: the pipeline
//! hands over one assembled prompt and gets text back.

use async_trait::async_trait;
use ragchat_core::error::{GenerationError, RetrievalError};
use ragchat_core::responder::Responder;
use ragchat_core::retriever::Embedder;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A client for an Ollama server.
pub struct OllamaClient {
    base_url: String,
    model: String,
    embedding_model: String,
    client: reqwest::Client,
}

impl OllamaClient {
    /// Create a new client.
    ///
    /// `embedding_model` may equal `model`; Ollama serves both endpoints
    /// from the same loaded weights.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        embedding_model: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            embedding_model: embedding_model.into(),
            client,
        }
    }

    /// Build a client from the app configuration.
    pub fn from_config(config: &ragchat_config::OllamaConfig) -> Self {
        Self::new(&config.base_url, &config.model, &config.embedding_model)
    }
}

// ── Wire types ────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    embedding: Vec<f32>,
}

// ── Trait impls ───────────────────────────────────────────────────────────

#[async_trait]
impl Responder for OllamaClient {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = format!("{}/api/generate", self.base_url);

        debug!(model = %self.model, prompt_len = prompt.len(), "Sending generate request");

        let response = self
            .client
            .post(&url)
            .json(&GenerateRequest {
                model: &self.model,
                prompt,
                stream: false,
            })
            .send()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            warn!(status, body = %body, "Ollama returned error");
            return Err(GenerationError::ApiError {
                status_code: status,
                message: body,
            });
        }

        let body: GenerateResponse =
            response.json().await.map_err(|e| GenerationError::ApiError {
                status_code: 200,
                message: format!("Failed to parse response: {e}"),
            })?;

        if body.response.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(body.response)
    }
}

#[async_trait]
impl Embedder for OllamaClient {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, RetrievalError> {
        let url = format!("{}/api/embeddings", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&EmbeddingsRequest {
                model: &self.embedding_model,
                prompt: text,
            })
            .send()
            .await
            .map_err(|e| RetrievalError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(RetrievalError::EmbeddingFailed(format!(
                "status {status}: {body}"
            )));
        }

        let body: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| RetrievalError::EmbeddingFailed(format!("parse error: {e}")))?;

        if body.embedding.is_empty() {
            return Err(RetrievalError::EmbeddingFailed(
                "empty embedding vector".into(),
            ));
        }
        Ok(body.embedding)
    }
}
