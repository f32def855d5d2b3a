//! # ragchat Core
//!
//! Domain types, traits, and error definitions for the ragchat RAG pipeline.
//! This crate has **zero framework dependencies** — it defines the domain
//! model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator (retrieval, embedding, generation) is defined
//! as a trait here. Implementations live in their respective crates. This
//! enables:
//! - Swapping backends via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod exchange;
pub mod responder;
pub mod retriever;
pub mod template;

// Re-export key types at crate root for ergonomics
pub use error::{Error, GenerationError, Result, RetrievalError, TemplateError};
pub use exchange::{Exchange, Speaker};
pub use responder::Responder;
pub use retriever::{Embedder, Passage, Retriever};
pub use template::PromptTemplate;
