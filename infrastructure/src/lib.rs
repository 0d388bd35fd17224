//! Infrastructure layer for readable-explainer
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the Gemini HTTP gateway, the file-backed
//! settings store, the in-process message bus, and configuration loading.

pub mod bus;
pub mod config;
pub mod gemini;
pub mod settings;

// Re-export commonly used types
pub use bus::{
    DEFAULT_BUS_CAPACITY, Envelope, LocalMessageBus, LocalRelayChannel, PushReceiver, PushSink,
    RawPush, RelayListener, RoutedPush,
};
pub use config::{
    APP_DIR_NAME, ConfigIssue, ConfigLoader, FileConfig, FileGenerationConfig, FileHttpConfig,
    FilePresenterConfig,
};
pub use gemini::client::{GeminiGateway, streaming_url};
pub use settings::{API_KEY_ENV, API_URL_ENV, FileSettingsStore, validate_settings};
