//! Validation of user-entered API settings

use explainer_application::SettingsError;
use explainer_domain::ApiSettings;
use reqwest::Url;

/// Prefix every Google API key starts with.
const API_KEY_PREFIX: &str = "AIza";

/// Check user input before it is saved.
///
/// Both values are trimmed. The key must be present and carry the API key
/// prefix; the URL must be present and an absolute http(s) URL.
pub fn validate_settings(api_key: &str, api_url: &str) -> Result<ApiSettings, SettingsError> {
    let api_key = api_key.trim();
    let api_url = api_url.trim();

    if api_key.is_empty() {
        return Err(SettingsError::MissingApiKey);
    }
    if api_url.is_empty() {
        return Err(SettingsError::MissingApiUrl);
    }

    let url = Url::parse(api_url).map_err(|e| SettingsError::InvalidUrl(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(SettingsError::InvalidUrl(format!(
            "unsupported scheme '{}'",
            url.scheme()
        )));
    }

    if !api_key.starts_with(API_KEY_PREFIX) {
        return Err(SettingsError::InvalidApiKeyFormat);
    }

    Ok(ApiSettings::new(api_key, api_url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use explainer_domain::DEFAULT_API_URL;

    #[test]
    fn accepts_valid_settings() {
        let settings = validate_settings("  AIzaSyExample ", DEFAULT_API_URL).unwrap();
        assert_eq!(settings.api_key.as_deref(), Some("AIzaSyExample"));
        assert_eq!(settings.api_url.as_deref(), Some(DEFAULT_API_URL));
    }

    #[test]
    fn rejects_missing_values() {
        assert_eq!(
            validate_settings("", DEFAULT_API_URL),
            Err(SettingsError::MissingApiKey)
        );
        assert_eq!(
            validate_settings("AIzaSyExample", "  "),
            Err(SettingsError::MissingApiUrl)
        );
    }

    #[test]
    fn rejects_invalid_url() {
        assert!(matches!(
            validate_settings("AIzaSyExample", "not a url"),
            Err(SettingsError::InvalidUrl(_))
        ));
        assert!(matches!(
            validate_settings("AIzaSyExample", "ftp://example.com/model"),
            Err(SettingsError::InvalidUrl(_))
        ));
    }

    #[test]
    fn rejects_key_without_prefix() {
        assert_eq!(
            validate_settings("sk-123", DEFAULT_API_URL),
            Err(SettingsError::InvalidApiKeyFormat)
        );
    }
}
