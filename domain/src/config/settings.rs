//! API settings as held by the settings store

use crate::core::error::{ConfigField, ExplainError};
use serde::{Deserialize, Serialize};

/// Endpoint used when the store has no URL of its own.
pub const DEFAULT_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash-exp:generateContent";

/// Raw settings: either value may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

/// Settings with both values present and non-blank.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiEndpoint {
    pub api_key: String,
    pub api_url: String,
}

impl std::fmt::Debug for ApiEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiEndpoint")
            .field("api_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl ApiSettings {
    pub fn new(api_key: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            api_url: Some(api_url.into()),
        }
    }

    /// Resolve into a usable endpoint; the key is checked first.
    pub fn require(&self) -> Result<ApiEndpoint, ExplainError> {
        let api_key = non_blank(&self.api_key).ok_or(ExplainError::ConfigurationMissing {
            field: ConfigField::ApiKey,
        })?;
        let api_url = non_blank(&self.api_url).ok_or(ExplainError::ConfigurationMissing {
            field: ConfigField::ApiUrl,
        })?;
        Ok(ApiEndpoint {
            api_key: api_key.to_string(),
            api_url: api_url.to_string(),
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
