//! Application layer for studymate.
//!
//! Use cases coordinating the conversation engine, the completion provider
//! and session persistence.

pub mod chat_usecase;
pub mod history_usecase;

pub use chat_usecase::ChatUseCase;
pub use history_usecase::HistoryUseCase;
