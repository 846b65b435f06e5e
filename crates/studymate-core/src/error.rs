//! Error types for the Studymate application.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Studymate application.
///
/// Conversation contract violations, completion failures and storage failures
/// all surface through this enum so callers can match on a single type.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StudyError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Data access error (repository/storage layer)
    #[error("Data access error: {0}")]
    DataAccess(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The completion provider could not produce a reply.
    #[error("Completion failed: {message}")]
    Completion {
        message: String,
        status_code: Option<u16>,
        is_retryable: bool,
    },

    /// A submission carried neither text nor an image.
    #[error("Nothing to send: the message is empty")]
    EmptySubmission,

    /// A reply is still pending for this conversation.
    #[error("A reply is already pending for this conversation")]
    RequestInFlight,

    /// `initialize` was called on a conversation that already has messages.
    #[error("Conversation is already initialized")]
    AlreadyInitialized,

    /// An image attachment could not be encoded or decoded.
    #[error("Invalid attachment: {0}")]
    InvalidAttachment(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StudyError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a DataAccess error
    pub fn data_access(message: impl Into<String>) -> Self {
        Self::DataAccess(message.into())
    }

    /// Creates a non-retryable Completion error without an HTTP status.
    pub fn completion(message: impl Into<String>) -> Self {
        Self::Completion {
            message: message.into(),
            status_code: None,
            is_retryable: false,
        }
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an IO error
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    /// Check if this is a completion error the caller may retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Completion {
                is_retryable: true,
                ..
            }
        )
    }

    /// Message suitable for showing to the user in an alert.
    ///
    /// Completion failures carry the provider's own message; everything else
    /// falls back to the `Display` text.
    pub fn user_message(&self) -> String {
        match self {
            Self::Completion { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for StudyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for StudyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for StudyError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for StudyError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<base64::DecodeError> for StudyError {
    fn from(err: base64::DecodeError) -> Self {
        Self::InvalidAttachment(err.to_string())
    }
}

/// Conversion from anyhow::Error (used at binary boundaries)
impl From<anyhow::Error> for StudyError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Conversion from String (for error messages)
impl From<String> for StudyError {
    fn from(err: String) -> Self {
        Self::Internal(err)
    }
}

/// A type alias for `Result<T, StudyError>`.
pub type Result<T> = std::result::Result<T, StudyError>;
