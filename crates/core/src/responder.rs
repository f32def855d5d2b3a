//! Responder trait — the abstraction over the language model backend.
//!
//! A Responder takes one fully assembled prompt and returns generated text.
//! It is stateless from the pipeline's perspective: all conversational
//! memory is supplied inline in the prompt, never held by the backend.

use async_trait::async_trait;

use crate::error::GenerationError;

/// The generation collaborator.
#[async_trait]
pub trait Responder: Send + Sync {
    /// A human-readable name for this responder (e.g., "ollama").
    fn name(&self) -> &str;

    /// Generate a response for the given prompt, single-shot.
    async fn generate(&self, prompt: &str) -> std::result::Result<String, GenerationError>;
}
