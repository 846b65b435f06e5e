//! Session domain model.

use super::date_label::DateLabel;
use crate::subject::Subject;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Persisted summary of one conversation.
///
/// This is the "pure" domain model that business logic operates on,
/// independent of any specific storage format or version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier (UUID format)
    pub id: String,
    /// Topic of the conversation
    pub subject: Subject,
    /// First user-authored text, used as the list preview and replay seed
    pub first_question: String,
    /// Creation time; history lists sort on this, newest first
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Creates a session with a fresh ID stamped with the current time.
    pub fn new(subject: Subject, first_question: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            subject,
            first_question: first_question.into(),
            created_at: Utc::now(),
        }
    }

    /// Relative date label of this session as seen from `now`.
    pub fn date_label<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> DateLabel {
        DateLabel::between(&self.created_at, now)
    }

    /// Sorts sessions newest first, the order history lists show them in.
    pub fn sort_newest_first(sessions: &mut [Session]) {
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    }
}
