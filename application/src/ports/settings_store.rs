//! Settings store port
//!
//! The key-value store holding the API credential and endpoint.

use async_trait::async_trait;
use explainer_domain::ApiSettings;
use thiserror::Error;

/// Errors raised by settings stores and settings validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Please enter an API key")]
    MissingApiKey,

    #[error("Please enter an API request URL")]
    MissingApiUrl,

    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),

    #[error("Invalid API key format")]
    InvalidApiKeyFormat,

    #[error("Settings storage error: {0}")]
    Storage(String),
}

/// Key-value settings collaborator.
///
/// `get` never fails because a value is absent; absence is represented by
/// `None` fields and judged by the caller.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get(&self) -> Result<ApiSettings, SettingsError>;

    async fn save(&self, settings: &ApiSettings) -> Result<(), SettingsError>;
}
