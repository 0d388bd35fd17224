//! TOML-file backed settings store.
//!
//! Stores the API key and URL in `settings.toml` under the per-user config
//! directory. Environment variables override the file when set, which lets
//! the key stay out of the file entirely.

use async_trait::async_trait;
use explainer_application::{SettingsError, SettingsStore};
use explainer_domain::{ApiSettings, DEFAULT_API_URL};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const API_KEY_ENV: &str = "READABLE_EXPLAINER_API_KEY";
pub const API_URL_ENV: &str = "READABLE_EXPLAINER_API_URL";

/// Settings store reading and writing a TOML file.
pub struct FileSettingsStore {
    path: PathBuf,
    read_env: bool,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            read_env: true,
        }
    }

    /// Store at the default location, `<config dir>/readable-explainer/settings.toml`.
    pub fn default_location() -> Option<Self> {
        crate::config::ConfigLoader::config_dir().map(|dir| Self::new(dir.join("settings.toml")))
    }

    /// Ignore environment overrides; `config set` merges against the file alone.
    pub fn without_env(mut self) -> Self {
        self.read_env = false;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_file(&self) -> Result<ApiSettings, SettingsError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => toml::from_str(&contents)
                .map_err(|e| SettingsError::Storage(format!("{}: {}", self.path.display(), e))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No settings file at {}", self.path.display());
                Ok(ApiSettings::default())
            }
            Err(e) => Err(SettingsError::Storage(format!(
                "{}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

#[async_trait]
impl SettingsStore for FileSettingsStore {
    async fn get(&self) -> Result<ApiSettings, SettingsError> {
        let mut settings = self.read_file().await?;

        if self.read_env {
            if let Some(key) = env_value(API_KEY_ENV) {
                settings.api_key = Some(key);
            }
            if let Some(url) = env_value(API_URL_ENV) {
                settings.api_url = Some(url);
            }
        }

        if settings.api_url.is_none() {
            settings.api_url = Some(DEFAULT_API_URL.to_string());
        }

        Ok(settings)
    }

    async fn save(&self, settings: &ApiSettings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| SettingsError::Storage(e.to_string()))?;
        }
        let contents =
            toml::to_string(settings).map_err(|e| SettingsError::Storage(e.to_string()))?;
        tokio::fs::write(&self.path, contents)
            .await
            .map_err(|e| SettingsError::Storage(format!("{}: {}", self.path.display(), e)))?;
        debug!("Saved settings to {}", self.path.display());
        Ok(())
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_yields_default_url_only() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSettingsStore::new(dir.path().join("settings.toml")).without_env();

        let settings = store.get().await.unwrap();
        assert_eq!(settings.api_key, None);
        assert_eq!(settings.api_url.as_deref(), Some(DEFAULT_API_URL));
    }

    #[tokio::test]
    async fn save_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store =
            FileSettingsStore::new(dir.path().join("nested").join("settings.toml")).without_env();

        let saved = ApiSettings::new("AIzaSyStored", "https://example.com/v1:generateContent");
        store.save(&saved).await.unwrap();

        assert_eq!(store.get().await.unwrap(), saved);
    }

    #[tokio::test]
    async fn corrupt_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "api_key = [not toml").unwrap();

        let store = FileSettingsStore::new(path).without_env();
        assert!(matches!(
            store.get().await,
            Err(SettingsError::Storage(_))
        ));
    }
}
