//! Exchange domain types.
//!
//! An [`Exchange`] is one turn in a conversation: who spoke, and what they
//! said. The rolling conversation window is a flat ordered sequence of
//! exchanges — two entries per completed round-trip (user then assistant).

use serde::{Deserialize, Serialize};

/// Who produced a turn in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    /// The end user
    User,
    /// The AI assistant
    Assistant,
}

impl Speaker {
    /// Label used when replaying the turn into a prompt.
    pub fn label(&self) -> &'static str {
        match self {
            Speaker::User => "User",
            Speaker::Assistant => "Assistant",
        }
    }
}

/// A single tagged turn in the conversation window.
///
/// No validation is applied to the text: empty strings are legal turns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    /// Who sent this turn
    pub speaker: Speaker,

    /// The raw text content
    pub text: String,
}

impl Exchange {
    /// Create a user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
        }
    }

    /// Create an assistant turn.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Assistant,
            text: text.into(),
        }
    }

    /// Render the turn the way it appears in a prompt context block,
    /// e.g. `User: hello`.
    pub fn render(&self) -> String {
        format!("{}: {}", self.speaker.label(), self.text)
    }
}
