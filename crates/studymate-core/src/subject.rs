//! Conversation subject.

use serde::{Deserialize, Serialize};
use std::fmt;

const OPEN_TOPIC_SENTINEL: &str = "__open__";
const TRANSLATE_SENTINEL: &str = "__translate__";

/// The topic a conversation is about.
///
/// Persisted as a plain string; the open-topic and translate flows use
/// sentinel values that cannot collide with a user-chosen subject label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Subject {
    /// A named school subject such as "Algebra" or "Chemistry".
    Topic(String),
    /// Free conversation without a fixed subject.
    OpenTopic,
    /// Translation helper flow.
    Translate,
}

impl Subject {
    pub fn topic(label: impl Into<String>) -> Self {
        Self::Topic(label.into())
    }

    /// Human-readable label for lists and headers.
    pub fn label(&self) -> &str {
        match self {
            Self::Topic(label) => label,
            Self::OpenTopic => "Open question",
            Self::Translate => "Translate",
        }
    }
}

impl Default for Subject {
    fn default() -> Self {
        Self::OpenTopic
    }
}

impl From<String> for Subject {
    fn from(value: String) -> Self {
        match value.as_str() {
            OPEN_TOPIC_SENTINEL => Self::OpenTopic,
            TRANSLATE_SENTINEL => Self::Translate,
            _ if value.trim().is_empty() => Self::OpenTopic,
            _ => Self::Topic(value),
        }
    }
}

impl From<&str> for Subject {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Subject> for String {
    fn from(subject: Subject) -> Self {
        match subject {
            Subject::Topic(label) => label,
            Subject::OpenTopic => OPEN_TOPIC_SENTINEL.to_string(),
            Subject::Translate => TRANSLATE_SENTINEL.to_string(),
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels_round_trip_through_string() {
        assert_eq!(Subject::from("__open__"), Subject::OpenTopic);
        assert_eq!(Subject::from("__translate__"), Subject::Translate);
        assert_eq!(String::from(Subject::Translate), "__translate__");
        assert_eq!(Subject::from("Physics"), Subject::topic("Physics"));
    }

    #[test]
    fn test_blank_label_is_open_topic() {
        assert_eq!(Subject::from("   "), Subject::OpenTopic);
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&Subject::topic("Geometry")).unwrap();
        assert_eq!(json, "\"Geometry\"");
        let parsed: Subject = serde_json::from_str("\"__open__\"").unwrap();
        assert_eq!(parsed, Subject::OpenTopic);
    }
}
