//! Configuration value objects.
//!
//! - [`generation::GenerationParams`]: sampling parameters sent with every request
//! - [`settings::ApiSettings`]: credential and endpoint from the settings store

pub mod generation;
pub mod settings;

pub use generation::GenerationParams;
pub use settings::{ApiEndpoint, ApiSettings, DEFAULT_API_URL};
