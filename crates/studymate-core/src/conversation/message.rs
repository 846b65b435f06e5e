//! Conversation message types.
//!
//! This module contains types for representing messages in a conversation,
//! including roles, attachments and the render-time segment accessor.

use crate::segment::{self, Segment};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    /// Message from the user.
    User,
    /// Message from the AI assistant.
    Assistant,
    /// System prompt sent to the completion provider, never displayed.
    System,
    /// Display-only date separator, never sent to the completion provider.
    DateMarker,
}

impl MessageRole {
    /// Role name used by chat-completion APIs, if the role is sent at all.
    pub fn api_name(self) -> Option<&'static str> {
        match self {
            Self::User => Some("user"),
            Self::Assistant => Some("assistant"),
            Self::System => Some("system"),
            Self::DateMarker => None,
        }
    }
}

/// A single message in a conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier (UUID format).
    pub id: String,
    /// The role of the message sender.
    pub role: MessageRole,
    /// The content of the message.
    pub content: String,
    /// `data:image/jpeg;base64,...` attachment, only ever set on user messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// True only for the assistant placeholder awaiting a reply.
    #[serde(default)]
    pub is_loading: bool,
    /// Sent to the provider but never shown in the message list.
    #[serde(default)]
    pub is_hidden: bool,
    /// Timestamp when the message was created (RFC 3339 format).
    pub timestamp: String,
}

impl Message {
    fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            image_url: None,
            is_loading: false,
            is_hidden: false,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn user(content: impl Into<String>, image_url: Option<String>) -> Self {
        Self {
            image_url,
            ..Self::new(MessageRole::User, content)
        }
    }

    /// A user-role prompt that takes part in the API context but is not shown.
    pub fn hidden_user(content: impl Into<String>) -> Self {
        Self {
            is_hidden: true,
            ..Self::new(MessageRole::User, content)
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn date_marker(label: impl Into<String>) -> Self {
        Self::new(MessageRole::DateMarker, label)
    }

    /// An empty assistant message shown while a reply is pending.
    pub fn placeholder() -> Self {
        Self {
            is_loading: true,
            ..Self::new(MessageRole::Assistant, "")
        }
    }

    pub fn has_image(&self) -> bool {
        self.image_url.is_some()
    }

    /// Display segments for this message's content.
    ///
    /// Loading placeholders have nothing to render yet. Text segments of three
    /// characters or fewer are dropped on top of the scanner's own filter.
    pub fn segments(&self) -> Vec<Segment> {
        if self.is_loading {
            return Vec::new();
        }
        segment::filter_for_message(segment::scan(&self.content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_is_loading_assistant() {
        let message = Message::placeholder();
        assert_eq!(message.role, MessageRole::Assistant);
        assert!(message.is_loading);
        assert!(message.content.is_empty());
        assert!(message.segments().is_empty());
    }

    #[test]
    fn test_segments_apply_message_filter() {
        let message = Message::assistant("So: \\(x=2\\) yes");
        // "So:" and "yes" pass the scanner (> 2 chars) but not the message filter.
        assert_eq!(message.segments(), vec![Segment::formula("x=2", true)]);
    }

    #[test]
    fn test_date_marker_has_no_api_role() {
        assert_eq!(MessageRole::DateMarker.api_name(), None);
        assert_eq!(MessageRole::System.api_name(), Some("system"));
    }

    #[test]
    fn test_hidden_user_message() {
        let message = Message::hidden_user("Explain more");
        assert_eq!(message.role, MessageRole::User);
        assert!(message.is_hidden);
        assert!(!message.has_image());
    }
}
