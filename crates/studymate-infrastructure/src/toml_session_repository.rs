//! TOML-based SessionRepository implementation

use crate::dto::SessionV1_0_0;
use crate::paths::StudymatePaths;
use crate::storage::AtomicTomlFile;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use studymate_core::error::{Result, StudyError};
use studymate_core::session::{Session, SessionRepository};
use tokio::fs;

/// A repository implementation for storing sessions in TOML files.
///
/// - Uses DTOs (`SessionV1_0_0`) for persistence
/// - Converts between DTOs and domain models
/// - Stores sessions as individual TOML files in a sessions directory
///
/// ```text
/// base_dir/
/// └── sessions/
///     ├── session-id-1.toml
///     └── session-id-2.toml
/// ```
pub struct TomlSessionRepository {
    sessions_dir: PathBuf,
}

impl TomlSessionRepository {
    /// Creates a repository under `base_dir`, creating `sessions/` if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory structure cannot be created.
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let sessions_dir = StudymatePaths::sessions_dir_in(base_dir.as_ref());
        fs::create_dir_all(&sessions_dir).await?;
        Ok(Self { sessions_dir })
    }

    /// Creates a repository in the data directory resolved by `paths`.
    pub async fn from_paths(paths: &StudymatePaths) -> Result<Self> {
        Self::new(paths.data_dir()?).await
    }

    pub fn sessions_dir(&self) -> &Path {
        &self.sessions_dir
    }

    fn session_file(&self, session_id: &str) -> Result<AtomicTomlFile<SessionV1_0_0>> {
        // IDs become file names; refuse anything that could escape the directory.
        if session_id.is_empty()
            || session_id.contains(['/', '\\'])
            || session_id.starts_with('.')
        {
            return Err(StudyError::not_found("session", session_id));
        }
        Ok(AtomicTomlFile::new(
            self.sessions_dir.join(format!("{}.toml", session_id)),
        ))
    }
}

#[async_trait]
impl SessionRepository for TomlSessionRepository {
    async fn create(&self, session: &Session) -> Result<()> {
        let file = self.session_file(&session.id)?;
        file.save(&SessionV1_0_0::from(session))?;
        tracing::info!("Created session {} ({})", session.id, session.subject);
        Ok(())
    }

    async fn fetch_all(&self) -> Result<Vec<Session>> {
        let mut sessions = Vec::new();
        let mut entries = fs::read_dir(&self.sessions_dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("toml") {
                continue;
            }

            let loaded = AtomicTomlFile::<SessionV1_0_0>::new(path.clone())
                .load()
                .map_err(StudyError::from)
                .and_then(|dto| dto.map(SessionV1_0_0::into_domain).transpose());
            match loaded {
                Ok(Some(session)) => sessions.push(session),
                Ok(None) => {}
                Err(e) => {
                    // One corrupt file should not hide the rest of the history.
                    tracing::warn!("Skipping unreadable session file {:?}: {}", path, e);
                }
            }
        }

        Session::sort_newest_first(&mut sessions);
        Ok(sessions)
    }

    async fn fetch(&self, session_id: &str) -> Result<Option<Session>> {
        let Ok(file) = self.session_file(session_id) else {
            return Ok(None);
        };
        file.load()?.map(SessionV1_0_0::into_domain).transpose()
    }

    async fn update_first_question(&self, session_id: &str, first_question: &str) -> Result<()> {
        let file = self.session_file(session_id)?;
        let updated = file.update(|dto| dto.first_question = first_question.to_string())?;
        if updated.is_none() {
            return Err(StudyError::not_found("session", session_id));
        }
        tracing::debug!("Updated first question of session {}", session_id);
        Ok(())
    }

    async fn delete(&self, session_id: &str) -> Result<()> {
        let file = self.session_file(session_id)?;
        file.remove()?;
        tracing::info!("Deleted session {}", session_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use studymate_core::Subject;
    use tempfile::TempDir;

    fn session_created_days_ago(question: &str, days: i64) -> Session {
        let mut session = Session::new(Subject::topic("Math"), question);
        session.created_at -= Duration::days(days);
        session
    }

    #[tokio::test]
    async fn test_create_and_fetch() {
        let temp_dir = TempDir::new().unwrap();
        let repository = TomlSessionRepository::new(temp_dir.path()).await.unwrap();

        let session = Session::new(Subject::topic("Physics"), "What is inertia?");
        repository.create(&session).await.unwrap();

        let loaded = repository.fetch(&session.id).await.unwrap();
        assert_eq!(loaded, Some(session));
    }

    #[tokio::test]
    async fn test_fetch_missing_returns_none() {
        let temp_dir = TempDir::new().unwrap();
        let repository = TomlSessionRepository::new(temp_dir.path()).await.unwrap();
        assert_eq!(repository.fetch("nope").await.unwrap(), None);
        assert_eq!(repository.fetch("../escape").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_fetch_all_sorted_newest_first() {
        let temp_dir = TempDir::new().unwrap();
        let repository = TomlSessionRepository::new(temp_dir.path()).await.unwrap();

        let oldest = session_created_days_ago("oldest", 3);
        let newest = session_created_days_ago("newest", 0);
        let middle = session_created_days_ago("middle", 1);
        for session in [&oldest, &newest, &middle] {
            repository.create(session).await.unwrap();
        }

        let questions: Vec<_> = repository
            .fetch_all()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.first_question)
            .collect();
        assert_eq!(questions, vec!["newest", "middle", "oldest"]);
    }

    #[tokio::test]
    async fn test_fetch_all_skips_corrupt_files() {
        let temp_dir = TempDir::new().unwrap();
        let repository = TomlSessionRepository::new(temp_dir.path()).await.unwrap();
        repository
            .create(&Session::new(Subject::OpenTopic, "fine"))
            .await
            .unwrap();
        std::fs::write(repository.sessions_dir().join("broken.toml"), "not = [valid").unwrap();
        std::fs::write(repository.sessions_dir().join("notes.txt"), "ignored").unwrap();

        let sessions = repository.fetch_all().await.unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].first_question, "fine");
    }

    #[tokio::test]
    async fn test_update_first_question() {
        let temp_dir = TempDir::new().unwrap();
        let repository = TomlSessionRepository::new(temp_dir.path()).await.unwrap();
        let session = Session::new(Subject::topic("Biology"), "old");
        repository.create(&session).await.unwrap();

        repository
            .update_first_question(&session.id, "What is a cell?")
            .await
            .unwrap();

        let loaded = repository.fetch(&session.id).await.unwrap().unwrap();
        assert_eq!(loaded.first_question, "What is a cell?");
        assert_eq!(loaded.created_at, session.created_at);
    }

    #[tokio::test]
    async fn test_update_missing_session_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let repository = TomlSessionRepository::new(temp_dir.path()).await.unwrap();
        let err = repository
            .update_first_question("missing", "q")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete() {
        let temp_dir = TempDir::new().unwrap();
        let repository = TomlSessionRepository::new(temp_dir.path()).await.unwrap();
        let session = Session::new(Subject::OpenTopic, "bye");
        repository.create(&session).await.unwrap();

        repository.delete(&session.id).await.unwrap();
        assert!(repository.fetch(&session.id).await.unwrap().is_none());
        // Deleting again is not an error.
        repository.delete(&session.id).await.unwrap();
    }
}
