//! Prompt template — the four format slots a prompt is assembled from.
//!
//! A template is immutable after startup. Three of the slots are format
//! strings carrying exactly one `{}` insertion point; the system message
//! is emitted verbatim. Validation happens once at construction/config
//! load, never per request: a user-query slot without an insertion point
//! would silently drop the query, so that is a fail-fast error.

use serde::{Deserialize, Serialize};

use crate::error::TemplateError;

/// The text-insertion marker recognized in format slots.
pub const PLACEHOLDER: &str = "{}";

/// The four slots of the assembled prompt, in emission order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptTemplate {
    /// Emitted first, verbatim.
    pub system_message: String,

    /// Wraps the joined conversation window. Omitted when the window is empty.
    pub context_format: String,

    /// Wraps the concatenated retrieved passages. Omitted when there are none.
    pub relevant_info_format: String,

    /// Wraps the raw user query. Always applied.
    pub user_query_format: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            system_message: "You are a helpful AI assistant. Provide concise and accurate \
                             responses based on the given context and relevant information. \
                             Only answer from the given data, do not answer from anywhere \
                             else or your prior memory. If you are unable to find the answer \
                             in the data then simply answer 'I don't know.'"
                .into(),
            context_format: "Previous conversation:\n{}\n".into(),
            relevant_info_format: "Relevant information:\n{}\n".into(),
            user_query_format: "User Query: {}\nAssistant Response:".into(),
        }
    }
}

impl PromptTemplate {
    /// Check that every format slot carries exactly one insertion point.
    ///
    /// Call this at startup; the assembler assumes a validated template.
    pub fn validate(&self) -> std::result::Result<(), TemplateError> {
        for (slot, format) in [
            ("context_format", &self.context_format),
            ("relevant_info_format", &self.relevant_info_format),
            ("user_query_format", &self.user_query_format),
        ] {
            match format.matches(PLACEHOLDER).count() {
                0 => return Err(TemplateError::MissingPlaceholder { slot }),
                1 => {}
                _ => return Err(TemplateError::ExtraPlaceholder { slot }),
            }
        }
        Ok(())
    }

    /// Substitute `value` into a format slot's insertion point.
    pub fn fill(format: &str, value: &str) -> String {
        format.replacen(PLACEHOLDER, value, 1)
    }
}
