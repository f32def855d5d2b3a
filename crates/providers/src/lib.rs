//! Collaborator clients for ragchat.
//!
//! The pipeline only knows the [`Retriever`](ragchat_core::Retriever),
//! [`Responder`](ragchat_core::Responder), and
//! [`Embedder`](ragchat_core::Embedder) traits; this crate supplies the
//! HTTP-backed implementations:
//!
//! - [`OllamaClient`] — generation and embeddings via an Ollama server
//! - [`QdrantRetriever`] — vector search via a Qdrant collection

pub mod ollama;
pub mod qdrant;

pub use ollama::OllamaClient;
pub use qdrant::QdrantRetriever;
