//! The ragchat request pipeline.
//!
//! One user message flows through five steps:
//!
//! 1. **Append** the user turn to the shared conversation window
//! 2. **Retrieve** relevant passages (degrades to none on failure)
//! 3. **Assemble** the prompt from system message, window, passages, query
//! 4. **Generate** a response via the model collaborator
//! 5. **Append** the assistant turn and evict the oldest pair if the
//!    window is over capacity
//!
//! The conversation window is the only shared mutable state; everything
//! else is per-request.

pub mod assembler;
pub mod context;
pub mod service;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use assembler::assemble;
pub use context::{ConversationContext, DEFAULT_MAX_PAIRS};
pub use service::{ChatService, DEFAULT_RETRIEVAL_COUNT};
