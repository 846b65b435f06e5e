//! History use case: the list of past sessions.

use chrono::{DateTime, Local, TimeZone};
use std::sync::Arc;
use studymate_core::error::{Result, StudyError};
use studymate_core::session::{DateLabel, Session, SessionRepository};

pub struct HistoryUseCase {
    session_repository: Arc<dyn SessionRepository>,
}

impl HistoryUseCase {
    pub fn new(session_repository: Arc<dyn SessionRepository>) -> Self {
        Self { session_repository }
    }

    /// Sessions newest first, each with its label relative to today.
    pub async fn list(&self) -> Result<Vec<(Session, DateLabel)>> {
        self.list_at(&Local::now()).await
    }

    /// Same as [`list`](Self::list) with an explicit "now".
    pub async fn list_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<Vec<(Session, DateLabel)>> {
        let mut sessions = self.session_repository.fetch_all().await?;
        Session::sort_newest_first(&mut sessions);
        Ok(sessions
            .into_iter()
            .map(|session| {
                let label = session.date_label(now);
                (session, label)
            })
            .collect())
    }

    /// Looks up one session, typically to resume it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no session has this ID.
    pub async fn find(&self, session_id: &str) -> Result<Session> {
        self.session_repository
            .fetch(session_id)
            .await?
            .ok_or_else(|| StudyError::not_found("session", session_id))
    }

    pub async fn delete(&self, session_id: &str) -> Result<()> {
        self.session_repository
            .delete(session_id)
            .await
            .inspect_err(|e| tracing::error!("Failed to delete session {}: {}", session_id, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use studymate_core::Subject;
    use studymate_infrastructure::TomlSessionRepository;
    use tempfile::TempDir;

    async fn history_with(sessions: &[Session]) -> (TempDir, HistoryUseCase) {
        let temp_dir = TempDir::new().unwrap();
        let repository = TomlSessionRepository::new(temp_dir.path()).await.unwrap();
        for session in sessions {
            repository.create(session).await.unwrap();
        }
        (temp_dir, HistoryUseCase::new(Arc::new(repository)))
    }

    #[tokio::test]
    async fn test_list_labels_relative_dates() {
        let now = Utc::now();
        let mut yesterday = Session::new(Subject::topic("Math"), "limits");
        yesterday.created_at = now - Duration::days(1);
        let mut older = Session::new(Subject::OpenTopic, "essay");
        older.created_at = now - Duration::days(10);
        let mut today = Session::new(Subject::Translate, "bonjour");
        today.created_at = now;

        let (_dir, history) = history_with(&[older.clone(), today.clone(), yesterday.clone()]).await;
        let listed = history.list_at(&now).await.unwrap();

        let ids: Vec<_> = listed.iter().map(|(s, _)| s.id.clone()).collect();
        assert_eq!(ids, vec![today.id, yesterday.id, older.id]);
        assert_eq!(listed[0].1, DateLabel::Today);
        assert_eq!(listed[1].1, DateLabel::Yesterday);
        assert_eq!(listed[2].1, DateLabel::On(older.created_at.date_naive()));
    }

    #[tokio::test]
    async fn test_find_and_delete() {
        let session = Session::new(Subject::topic("Art"), "perspective");
        let (_dir, history) = history_with(std::slice::from_ref(&session)).await;

        assert_eq!(history.find(&session.id).await.unwrap(), session);
        history.delete(&session.id).await.unwrap();
        assert!(history.find(&session.id).await.unwrap_err().is_not_found());
        assert!(history.list().await.unwrap().is_empty());
    }
}
