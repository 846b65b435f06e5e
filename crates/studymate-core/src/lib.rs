pub mod attachment;
pub mod completion;
pub mod config;
pub mod conversation;
pub mod error;
pub mod prompt;
pub mod segment;
pub mod session;
pub mod subject;

// Re-export common types
pub use completion::CompletionProvider;
pub use conversation::{ConversationEngine, Message, MessageRole};
pub use error::{Result, StudyError};
pub use segment::Segment;
pub use subject::Subject;
