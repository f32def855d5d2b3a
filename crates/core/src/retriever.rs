//! Retriever trait — the abstraction over the document search backend.
//!
//! A Retriever takes a query string and returns the passages most relevant
//! to it, ordered by relevance descending. The vector store behind it
//! (Qdrant, pgvector, an in-memory index for tests) is opaque to the
//! pipeline.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RetrievalError;

/// A unit of retrieved text plus the metadata attached at ingestion time.
///
/// The order in which passages are returned is significant and is
/// preserved verbatim into the assembled prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passage {
    /// The passage text
    pub content: String,

    /// Arbitrary key-value metadata from source ingestion
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: serde_json::Map<String, serde_json::Value>,

    /// Relevance score assigned by the search backend
    #[serde(default)]
    pub score: f32,
}

impl Passage {
    /// Create a passage with no metadata.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: serde_json::Map::new(),
            score: 0.0,
        }
    }
}

/// The retrieval collaborator.
///
/// Implementations may fail or return partial results; the pipeline treats
/// any error as "no passages" and degrades rather than aborting.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// A human-readable name for this retriever (e.g., "qdrant").
    fn name(&self) -> &str;

    /// Return up to `k` passages relevant to `query`, best first.
    async fn search(
        &self,
        query: &str,
        k: usize,
    ) -> std::result::Result<Vec<Passage>, RetrievalError>;
}

/// The embedding collaborator.
///
/// Vector search needs a query vector; this is the narrow interface the
/// retriever uses to get one. The embedding model itself stays opaque.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// A human-readable name for this embedder (e.g., "ollama").
    fn name(&self) -> &str;

    /// Embed a single text into a vector.
    async fn embed(&self, text: &str) -> std::result::Result<Vec<f32>, RetrievalError>;
}
