//! Unified path management for studymate files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/studymate/         # Config directory
//! └── config.toml              # Application configuration
//!
//! ~/.local/share/studymate/    # Data directory (overridable via [storage] data_dir)
//! ├── sessions/                # One TOML file per session
//! │   └── <session-id>.toml
//! └── logs/                    # Application logs
//!     └── studymate.log.YYYY-MM-DD
//! ```

use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "studymate";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for studymate_core::StudyError {
    fn from(err: PathError) -> Self {
        studymate_core::StudyError::config(err.to_string())
    }
}

/// Resolves studymate directories, honoring an optional data directory override.
#[derive(Debug, Clone, Default)]
pub struct StudymatePaths {
    data_dir_override: Option<PathBuf>,
}

impl StudymatePaths {
    /// Creates a resolver; `data_dir_override` replaces the platform data directory.
    pub fn new(data_dir_override: Option<PathBuf>) -> Self {
        Self { data_dir_override }
    }

    /// Returns the studymate configuration directory (e.g., `~/.config/studymate/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the data directory (e.g., `~/.local/share/studymate/`).
    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(dir) = &self.data_dir_override {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the directory holding one TOML file per session.
    pub fn sessions_dir(&self) -> Result<PathBuf, PathError> {
        Ok(Self::sessions_dir_in(&self.data_dir()?))
    }

    /// Returns the log directory.
    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("logs"))
    }

    /// Sessions directory under an explicit base directory.
    pub fn sessions_dir_in(base_dir: &Path) -> PathBuf {
        base_dir.join("sessions")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_controls_data_paths() {
        let paths = StudymatePaths::new(Some(PathBuf::from("/tmp/sm")));
        assert_eq!(paths.data_dir().unwrap(), PathBuf::from("/tmp/sm"));
        assert_eq!(paths.sessions_dir().unwrap(), PathBuf::from("/tmp/sm/sessions"));
        assert_eq!(paths.logs_dir().unwrap(), PathBuf::from("/tmp/sm/logs"));
    }

    #[test]
    fn test_config_file_name() {
        if let Ok(path) = StudymatePaths::config_file() {
            assert!(path.ends_with("studymate/config.toml"));
        }
    }
}
