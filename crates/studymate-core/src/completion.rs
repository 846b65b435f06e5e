//! Completion provider interface.
//!
//! The conversation engine never talks to a language model itself; the
//! application layer hands the engine's API context to a `CompletionProvider`
//! and feeds the outcome back into the engine.

use crate::conversation::Message;
use crate::error::Result;
use crate::prompt::PromptBook;
use crate::subject::Subject;
use async_trait::async_trait;

/// External service producing assistant replies from a conversation history.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Sends the conversation and returns the assistant's reply text.
    ///
    /// `messages` is the engine's API context: system, user and assistant
    /// messages in order, without date markers or the loading placeholder.
    async fn send_chat(&self, messages: &[Message]) -> Result<String>;

    /// Translates `text` between two languages.
    async fn translate_text(&self, text: &str, from: &str, to: &str) -> Result<String>;

    /// System prompt for a conversation about `subject`.
    fn system_prompt(&self, subject: Option<&Subject>) -> String {
        PromptBook::default().system_prompt(subject)
    }
}
