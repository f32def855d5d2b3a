//! Shared test helpers for pipeline tests.

use std::sync::Mutex;

use ragchat_core::error::{GenerationError, RetrievalError};
use ragchat_core::responder::Responder;
use ragchat_core::retriever::{Passage, Retriever};

/// A retriever that returns the same scripted passages for every query.
pub struct StaticRetriever {
    passages: Vec<Passage>,
}

impl StaticRetriever {
    pub fn with_passages(passages: Vec<Passage>) -> Self {
        Self { passages }
    }

    pub fn empty() -> Self {
        Self { passages: vec![] }
    }
}

#[async_trait::async_trait]
impl Retriever for StaticRetriever {
    fn name(&self) -> &str {
        "static_mock"
    }

    async fn search(&self, _query: &str, k: usize) -> Result<Vec<Passage>, RetrievalError> {
        Ok(self.passages.iter().take(k).cloned().collect())
    }
}

/// A retriever that always fails with a network error.
pub struct FailingRetriever;

#[async_trait::async_trait]
impl Retriever for FailingRetriever {
    fn name(&self) -> &str {
        "failing_mock"
    }

    async fn search(&self, _query: &str, _k: usize) -> Result<Vec<Passage>, RetrievalError> {
        Err(RetrievalError::Network("connection refused".into()))
    }
}

/// A responder that records every prompt it is given and replies with a
/// fixed string. Tests inspect the recorded prompts to verify assembly.
pub struct RecordingResponder {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl RecordingResponder {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Responder for RecordingResponder {
    fn name(&self) -> &str {
        "recording_mock"
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

/// A responder that fails its first call and replies normally afterwards.
pub struct FlakyResponder {
    reply: String,
    calls: Mutex<usize>,
}

impl FlakyResponder {
    pub fn failing_first(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            calls: Mutex::new(0),
        }
    }
}

#[async_trait::async_trait]
impl Responder for FlakyResponder {
    fn name(&self) -> &str {
        "flaky_mock"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        let mut calls = self.calls.lock().unwrap();
        *calls += 1;
        if *calls == 1 {
            return Err(GenerationError::Network("connection reset".into()));
        }
        Ok(self.reply.clone())
    }
}

/// A responder that always fails.
pub struct FailingResponder;

#[async_trait::async_trait]
impl Responder for FailingResponder {
    fn name(&self) -> &str {
        "failing_mock"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError::ApiError {
            status_code: 500,
            message: "model exploded".into(),
        })
    }
}
