//! Configuration service implementation.
//!
//! Loads the application configuration from `config.toml` in the platform
//! config directory (e.g. `~/.config/studymate/config.toml`).

use crate::paths::StudymatePaths;
use crate::storage::AtomicTomlFile;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use studymate_core::config::AppConfig;
use studymate_core::error::Result;

/// Environment variable overriding `[completion] model`.
pub const MODEL_ENV: &str = "STUDYMATE_MODEL";
/// Environment variable overriding `[completion] base_url`.
pub const BASE_URL_ENV: &str = "STUDYMATE_BASE_URL";

/// Configuration service that loads and caches the application configuration.
///
/// The file is created with default values on first access, so users have
/// something to edit.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<AppConfig>>>,
}

impl ConfigService {
    /// Creates a service reading the given file.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Creates a service reading the platform default `config.toml`.
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(StudymatePaths::config_file()?))
    }

    /// Gets the configuration, loading from file if not cached.
    ///
    /// Environment overrides are applied on every load.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed, or if the
    /// default file cannot be written.
    pub fn get_config(&self) -> Result<AppConfig> {
        {
            let cached = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(config) = cached.as_ref() {
                return Ok(config.clone());
            }
        }

        let mut loaded = self.load_or_create()?;
        apply_env_overrides(&mut loaded, |key| std::env::var(key).ok());

        let mut cache = self.config.write().unwrap_or_else(|e| e.into_inner());
        *cache = Some(loaded.clone());
        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut cache = self.config.write().unwrap_or_else(|e| e.into_inner());
        *cache = None;
    }

    fn load_or_create(&self) -> Result<AppConfig> {
        let file = AtomicTomlFile::<AppConfig>::new(self.path.clone());
        if let Some(config) = file.load()? {
            return Ok(config);
        }

        let config = AppConfig::default();
        file.save(&config)?;
        tracing::info!("Wrote default configuration to {:?}", self.path);
        Ok(config)
    }
}

fn apply_env_overrides(config: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(model) = lookup(MODEL_ENV).filter(|v| !v.trim().is_empty()) {
        config.completion.model = model;
    }
    if let Some(base_url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
        config.completion.base_url = base_url;
    }
}
