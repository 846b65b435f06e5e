//! Session DTO

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use studymate_core::session::Session;
use studymate_core::{StudyError, Subject};

/// Current on-disk session format version.
pub const SESSION_VERSION: &str = "1.0.0";

/// V1.0.0: session summary as stored in `sessions/<id>.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionV1_0_0 {
    pub version: String,
    pub id: String,
    /// Subject label, or a sentinel for the open-topic / translate flows.
    pub subject: String,
    #[serde(default)]
    pub first_question: String,
    /// RFC 3339 timestamp.
    pub created_at: String,
}

impl From<&Session> for SessionV1_0_0 {
    fn from(session: &Session) -> Self {
        Self {
            version: SESSION_VERSION.to_string(),
            id: session.id.clone(),
            subject: session.subject.clone().into(),
            first_question: session.first_question.clone(),
            created_at: session.created_at.to_rfc3339(),
        }
    }
}

impl SessionV1_0_0 {
    /// Converts the DTO into the domain model.
    ///
    /// # Errors
    ///
    /// Returns a serialization error for an unknown version or an unparsable
    /// timestamp.
    pub fn into_domain(self) -> Result<Session, StudyError> {
        if self.version != SESSION_VERSION {
            return Err(StudyError::Serialization {
                format: "TOML".to_string(),
                message: format!("Unsupported session version '{}'", self.version),
            });
        }

        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| StudyError::Serialization {
                format: "TOML".to_string(),
                message: format!("Invalid created_at '{}': {}", self.created_at, e),
            })?
            .with_timezone(&Utc);

        Ok(Session {
            id: self.id,
            subject: Subject::from(self.subject),
            first_question: self.first_question,
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_subject_is_stored_as_string() {
        let session = Session::new(Subject::Translate, "bonjour");
        let dto = SessionV1_0_0::from(&session);
        assert_eq!(dto.subject, "__translate__");
        assert_eq!(dto.into_domain().unwrap(), session);
    }

    #[test]
    fn test_unknown_version_is_rejected() {
        let mut dto = SessionV1_0_0::from(&Session::new(Subject::OpenTopic, "q"));
        dto.version = "9.0.0".to_string();
        assert!(dto.into_domain().unwrap_err().is_serialization());
    }

    #[test]
    fn test_invalid_timestamp_is_rejected() {
        let mut dto = SessionV1_0_0::from(&Session::new(Subject::OpenTopic, "q"));
        dto.created_at = "yesterday".to_string();
        assert!(dto.into_domain().is_err());
    }
}
