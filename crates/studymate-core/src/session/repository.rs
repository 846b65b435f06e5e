//! Session repository trait.
//!
//! Defines the interface for session persistence operations.

use super::model::Session;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract repository for managing session persistence.
///
/// This trait defines the contract for persisting and retrieving sessions,
/// decoupling the application's core logic from the specific storage mechanism
/// (e.g., TOML files, database, remote API).
///
/// Every operation may fail with a storage error. Callers surface the failure
/// to the user and do not retry.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Stores a newly created session.
    ///
    /// # Arguments
    ///
    /// * `session` - The session to store
    async fn create(&self, session: &Session) -> Result<()>;

    /// Lists all stored sessions, newest `created_at` first.
    async fn fetch_all(&self) -> Result<Vec<Session>>;

    /// Finds a session by its ID.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Session))`: Session found
    /// - `Ok(None)`: Session not found
    /// - `Err(_)`: Error occurred during retrieval
    async fn fetch(&self, session_id: &str) -> Result<Option<Session>>;

    /// Replaces the first question of a stored session.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no session has this ID.
    async fn update_first_question(&self, session_id: &str, first_question: &str) -> Result<()>;

    /// Deletes a session from storage.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Session deleted successfully (or didn't exist)
    /// - `Err(_)`: Error occurred during deletion
    async fn delete(&self, session_id: &str) -> Result<()>;
}
