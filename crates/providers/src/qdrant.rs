//! Qdrant retriever — vector search over the REST API.
//!
//! The query is embedded through the injected [`Embedder`], then sent to
//! `/collections/{name}/points/search`. Hits come back ordered by score
//! descending; that order is preserved into the returned passages. The
//! payload's `content` key holds the passage text; every other key is
//! carried as metadata.
//!
//! Collection provisioning and health checks are deliberately not here —
//! the store is assumed populated before the pipeline runs.

use std::sync::Arc;

use async_trait::async_trait;
use ragchat_core::error::RetrievalError;
use ragchat_core::retriever::{Embedder, Passage, Retriever};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A retriever backed by a Qdrant collection.
pub struct QdrantRetriever {
    base_url: String,
    collection: String,
    embedder: Arc<dyn Embedder>,
    client: reqwest::Client,
}

impl QdrantRetriever {
    /// Create a new retriever over an existing, populated collection.
    pub fn new(
        base_url: impl Into<String>,
        collection: impl Into<String>,
        embedder: Arc<dyn Embedder>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            collection: collection.into(),
            embedder,
            client,
        }
    }

    /// Build a retriever from the app configuration.
    pub fn from_config(config: &ragchat_config::QdrantConfig, embedder: Arc<dyn Embedder>) -> Self {
        Self::new(&config.base_url, &config.collection, embedder)
    }
}

// ── Wire types ────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct SearchRequest {
    vector: Vec<f32>,
    limit: usize,
    with_payload: bool,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result: Vec<ScoredPoint>,
}

#[derive(Deserialize)]
struct ScoredPoint {
    score: f32,
    #[serde(default)]
    payload: serde_json::Map<String, serde_json::Value>,
}

/// Convert a scored point into a passage.
///
/// The `content` payload key becomes the text (empty if absent or not a
/// string); the remaining keys ride along as metadata.
fn passage_from_point(point: ScoredPoint) -> Passage {
    let mut payload = point.payload;
    let content = match payload.remove("content") {
        Some(serde_json::Value::String(s)) => s,
        Some(other) => other.to_string(),
        None => String::new(),
    };

    Passage {
        content,
        metadata: payload,
        score: point.score,
    }
}

#[async_trait]
impl Retriever for QdrantRetriever {
    fn name(&self) -> &str {
        "qdrant"
    }

    async fn search(&self, query: &str, k: usize) -> Result<Vec<Passage>, RetrievalError> {
        let vector = self.embedder.embed(query).await?;

        let url = format!(
            "{}/collections/{}/points/search",
            self.base_url, self.collection
        );

        let response = self
            .client
            .post(&url)
            .json(&SearchRequest {
                vector,
                limit: k,
                with_payload: true,
            })
            .send()
            .await
            .map_err(|e| RetrievalError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            warn!(status, body = %body, "Qdrant returned error");
            return Err(RetrievalError::ApiError {
                status_code: status,
                message: body,
            });
        }

        let body: SearchResponse =
            response.json().await.map_err(|e| RetrievalError::ApiError {
                status_code: 200,
                message: format!("Failed to parse response: {e}"),
            })?;

        debug!(
            collection = %self.collection,
            hits = body.result.len(),
            "search completed"
        );
        Ok(body.result.into_iter().map(passage_from_point).collect())
    }
}
