//! Settings collaborator: where the API key and URL live.

mod file_store;
mod validation;

pub use file_store::{API_KEY_ENV, API_URL_ENV, FileSettingsStore};
pub use validation::validate_settings;
