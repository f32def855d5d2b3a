//! Prompt assembly — composing the model input string.
//!
//! `assemble` is a pure function: byte-identical output for identical
//! inputs, no clock, no randomness, no hidden state. That keeps prompt
//! construction testable without any network collaborator in the loop.
//!
//! Emission order is fixed: system message, context block, relevant-info
//! block, user query. The context and relevant-info blocks are omitted
//! entirely when their input is empty; the user-query slot is always
//! rendered.

use ragchat_core::exchange::Exchange;
use ragchat_core::retriever::Passage;
use ragchat_core::template::PromptTemplate;

/// Compose a prompt from the context snapshot, retrieved passages, and
/// the raw user query.
///
/// The template is assumed validated (see [`PromptTemplate::validate`]);
/// validation is a startup concern, not a per-request one.
pub fn assemble(
    context: &[Exchange],
    passages: &[Passage],
    user_query: &str,
    template: &PromptTemplate,
) -> String {
    let mut prompt = String::new();

    prompt.push_str(&template.system_message);
    prompt.push_str("\n\n");

    if !context.is_empty() {
        let history = context
            .iter()
            .map(Exchange::render)
            .collect::<Vec<_>>()
            .join("\n");
        prompt.push_str(&PromptTemplate::fill(&template.context_format, &history));
        prompt.push('\n');
    }

    if !passages.is_empty() {
        let mut relevant_info = String::new();
        for passage in passages {
            relevant_info.push_str(&passage.content);
            relevant_info.push('\n');
        }
        prompt.push_str(&PromptTemplate::fill(
            &template.relevant_info_format,
            &relevant_info,
        ));
        prompt.push('\n');
    }

    prompt.push_str(&PromptTemplate::fill(
        &template.user_query_format,
        user_query,
    ));

    prompt
}
