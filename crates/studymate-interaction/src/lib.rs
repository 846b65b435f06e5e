//! Completion provider implementations.

pub mod openai_provider;

pub use openai_provider::OpenAiCompletionProvider;
