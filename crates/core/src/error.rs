//! Error types for the ragchat domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each collaborator boundary has its own error variant.

use thiserror::Error;

/// The top-level error type for all ragchat operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Retrieval errors ---
    #[error("Retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),

    // --- Generation errors ---
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    // --- Template errors ---
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Collaborator boundary errors ---

/// Errors from the retrieval collaborator (vector store + embedder).
///
/// All variants are recoverable at the pipeline level: the request
/// proceeds with an empty passage set.
#[derive(Debug, Clone, Error)]
pub enum RetrievalError {
    #[error("Search request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Embedding generation failed: {0}")]
    EmbeddingFailed(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Errors from the generation collaborator (the language model).
///
/// Recoverable at the pipeline level: the error is surfaced to the
/// caller and no assistant turn is recorded.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    #[error("Completion request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Model returned an empty response")]
    EmptyResponse,

    #[error("Network error: {0}")]
    Network(String),
}

/// Errors in prompt template construction.
///
/// These are programmer/configuration errors and are raised once at
/// startup validation, never per request.
#[derive(Debug, Clone, Error)]
pub enum TemplateError {
    #[error("Template slot '{slot}' is missing its '{{}}' insertion point")]
    MissingPlaceholder { slot: &'static str },

    #[error("Template slot '{slot}' has more than one '{{}}' insertion point")]
    ExtraPlaceholder { slot: &'static str },
}
