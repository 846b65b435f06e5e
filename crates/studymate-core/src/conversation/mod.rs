//! Conversation domain module.
//!
//! # Module Structure
//!
//! - `message`: message types (`MessageRole`, `Message`)
//! - `event`: notifications and lifecycle state (`ConversationEvent`, `ConversationState`)
//! - `engine`: the per-session state machine (`ConversationEngine`)

mod engine;
mod event;
mod message;

pub use engine::{ConversationEngine, PlaceholderHandle};
pub use event::{ConversationEvent, ConversationState};
pub use message::{Message, MessageRole};
