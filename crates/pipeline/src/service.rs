//! The request pipeline — one user message in, one response out.
//!
//! Per request: append the user turn → retrieve passages → assemble the
//! prompt → generate → append the assistant turn → evict if over capacity.
//!
//! Failure policy:
//! - Retrieval failure degrades to an empty passage set; the request
//!   continues and the condition is logged.
//! - Generation failure is returned to the caller as an error; the user
//!   turn stays in the window (history reflects what was asked) but no
//!   assistant turn is appended.
//!
//! The context lock is taken only for the append/snapshot/evict calls,
//! never across the retrieval or generation awaits — otherwise every
//! concurrent request would serialize on the slowest network round-trip.

use std::sync::Arc;

use ragchat_core::error::Result;
use ragchat_core::responder::Responder;
use ragchat_core::retriever::Retriever;
use ragchat_core::template::PromptTemplate;
use tracing::{debug, info, warn};

use crate::assembler::assemble;
use crate::context::ConversationContext;

/// Default number of passages requested per query.
pub const DEFAULT_RETRIEVAL_COUNT: usize = 3;

/// The RAG request handler.
///
/// Owns the shared conversation window and the collaborator handles.
/// One instance serves the whole process; clone-cheap handles go to each
/// request task.
pub struct ChatService {
    retriever: Arc<dyn Retriever>,
    responder: Arc<dyn Responder>,
    context: ConversationContext,
    template: PromptTemplate,
    retrieval_count: usize,
}

impl ChatService {
    /// Create a service with the given collaborators and a validated
    /// template.
    ///
    /// Template validation happens here, once — a malformed user-query
    /// slot is a startup error, not a per-request one.
    pub fn new(
        retriever: Arc<dyn Retriever>,
        responder: Arc<dyn Responder>,
        context: ConversationContext,
        template: PromptTemplate,
    ) -> Result<Self> {
        template.validate()?;
        Ok(Self {
            retriever,
            responder,
            context,
            template,
            retrieval_count: DEFAULT_RETRIEVAL_COUNT,
        })
    }

    /// Set how many passages are requested per query.
    pub fn with_retrieval_count(mut self, count: usize) -> Self {
        self.retrieval_count = count;
        self
    }

    /// Access the shared conversation context (for introspection/tests).
    pub fn context(&self) -> &ConversationContext {
        &self.context
    }

    /// Handle one user message end-to-end.
    ///
    /// Side effects on the shared window: exactly one user append on
    /// entry, at most one assistant append (success only), at most one
    /// eviction check. A generation failure is returned as `Err` — the
    /// caller never sees a silently empty success.
    pub async fn handle_message(&self, text: &str) -> Result<String> {
        self.context.append_user(text);

        let passages = match self.retriever.search(text, self.retrieval_count).await {
            Ok(passages) => passages,
            Err(e) => {
                warn!(
                    retriever = self.retriever.name(),
                    error = %e,
                    "retrieval failed, continuing without passages"
                );
                Vec::new()
            }
        };

        let snapshot = self.context.snapshot();
        let prompt = assemble(&snapshot, &passages, text, &self.template);
        debug!(
            prompt_len = prompt.len(),
            passages = passages.len(),
            window = snapshot.len(),
            "prompt assembled"
        );

        let response = match self.responder.generate(&prompt).await {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    responder = self.responder.name(),
                    error = %e,
                    "generation failed, assistant turn not recorded"
                );
                return Err(e.into());
            }
        };

        self.context.append_assistant(&response);
        self.context.evict_if_over_capacity();

        info!(
            response_len = response.len(),
            window = self.context.len(),
            "request completed"
        );
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use ragchat_core::error::Error;
    use ragchat_core::exchange::Speaker;
    use ragchat_core::retriever::Passage;

    fn service(retriever: Arc<dyn Retriever>, responder: Arc<dyn Responder>) -> ChatService {
        ChatService::new(
            retriever,
            responder,
            ConversationContext::new(5),
            PromptTemplate::default(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn successful_request_records_both_turns() {
        let responder = Arc::new(RecordingResponder::replying("the answer"));
        let svc = service(
            Arc::new(StaticRetriever::with_passages(vec![Passage::new("fact")])),
            responder.clone(),
        );

        let response = svc.handle_message("question").await.unwrap();
        assert_eq!(response, "the answer");

        let window = svc.context().snapshot();
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].speaker, Speaker::User);
        assert_eq!(window[0].text, "question");
        assert_eq!(window[1].speaker, Speaker::Assistant);
        assert_eq!(window[1].text, "the answer");
    }

    #[tokio::test]
    async fn prompt_contains_passages_and_query() {
        let responder = Arc::new(RecordingResponder::replying("ok"));
        let svc = service(
            Arc::new(StaticRetriever::with_passages(vec![
                Passage::new("p1"),
                Passage::new("p2"),
            ])),
            responder.clone(),
        );

        svc.handle_message("what is p?").await.unwrap();

        let prompts = responder.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Relevant information:\np1\np2\n"));
        assert!(prompts[0].contains("User Query: what is p?"));
    }

    #[tokio::test]
    async fn user_turn_appears_in_its_own_prompt_context() {
        // The user turn is appended before the snapshot is taken, so the
        // context block already carries it.
        let responder = Arc::new(RecordingResponder::replying("ok"));
        let svc = service(Arc::new(StaticRetriever::empty()), responder.clone());

        svc.handle_message("hello").await.unwrap();

        let prompts = responder.prompts();
        assert!(prompts[0].contains("Previous conversation:\nUser: hello\n"));
    }

    #[tokio::test]
    async fn retrieval_failure_degrades_to_no_passages() {
        let responder = Arc::new(RecordingResponder::replying("still answered"));
        let svc = service(Arc::new(FailingRetriever), responder.clone());

        let response = svc.handle_message("q").await.unwrap();
        assert_eq!(response, "still answered");

        // The responder was still called, with no relevant-info block.
        let prompts = responder.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(!prompts[0].contains("Relevant information:"));
        assert!(prompts[0].contains("User Query: q"));
    }

    #[tokio::test]
    async fn generation_failure_keeps_user_turn_only() {
        let svc = service(
            Arc::new(StaticRetriever::empty()),
            Arc::new(FailingResponder),
        );

        let err = svc.handle_message("doomed").await.unwrap_err();
        assert!(matches!(err, Error::Generation(_)));

        let window = svc.context().snapshot();
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].speaker, Speaker::User);
        assert_eq!(window[0].text, "doomed");
    }

    #[tokio::test]
    async fn eviction_stays_pair_aligned_after_failed_generation() {
        // A failed generation leaves a lone user turn in the window; the
        // next successful request pushes it over capacity. Eviction must
        // drop that lone half on its own, never splitting the surviving
        // pair.
        let svc = ChatService::new(
            Arc::new(StaticRetriever::empty()),
            Arc::new(FlakyResponder::failing_first("r")),
            ConversationContext::new(1),
            PromptTemplate::default(),
        )
        .unwrap();

        assert!(svc.handle_message("a").await.is_err());
        assert_eq!(svc.handle_message("b").await.unwrap(), "r");

        let window = svc.context().snapshot();
        assert_eq!(window.len() % 2, 0);
        assert_eq!(window[0].speaker, Speaker::User);
        let texts: Vec<&str> = window.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, ["b", "r"]);
    }

    #[tokio::test]
    async fn window_stays_bounded_across_many_requests() {
        let svc = ChatService::new(
            Arc::new(StaticRetriever::empty()),
            Arc::new(RecordingResponder::replying("r")),
            ConversationContext::new(2),
            PromptTemplate::default(),
        )
        .unwrap();

        for i in 0..10 {
            svc.handle_message(&format!("m{i}")).await.unwrap();
        }

        let window = svc.context().snapshot();
        assert_eq!(window.len(), 4);
        assert_eq!(window[0].speaker, Speaker::User);
        assert_eq!(window[0].text, "m8");
        assert_eq!(window[3].text, "r");
    }

    #[tokio::test]
    async fn concurrent_requests_keep_the_window_consistent() {
        let svc = Arc::new(
            ChatService::new(
                Arc::new(StaticRetriever::empty()),
                Arc::new(RecordingResponder::replying("r")),
                ConversationContext::new(100),
                PromptTemplate::default(),
            )
            .unwrap(),
        );

        let mut handles = Vec::new();
        for i in 0..16 {
            let svc = svc.clone();
            handles.push(tokio::spawn(async move {
                svc.handle_message(&format!("m{i}")).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // 16 completed requests, two turns each, capacity never exceeded.
        assert_eq!(svc.context().len(), 32);
    }

    #[test]
    fn invalid_template_is_rejected_at_construction() {
        let template = PromptTemplate {
            user_query_format: "no placeholder here".into(),
            ..Default::default()
        };
        let result = ChatService::new(
            Arc::new(StaticRetriever::empty()),
            Arc::new(RecordingResponder::replying("r")),
            ConversationContext::default(),
            template,
        );
        assert!(matches!(result, Err(Error::Template(_))));
    }
}
