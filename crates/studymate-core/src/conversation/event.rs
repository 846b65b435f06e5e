use serde::{Deserialize, Serialize};

/// Notifications published by a conversation to its subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConversationEvent {
    /// The message list changed (append, finalize, clear).
    MessagesUpdated,
    /// The loading placeholder was removed without a reply.
    PlaceholderRemoved { message_id: String },
    /// The completion request failed; `message` is meant for the user.
    Failed { message: String },
}

/// Whether a reply is currently pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    /// No request in flight.
    Idle,
    /// Exactly one loading placeholder is waiting for a reply.
    AwaitingReply,
}
