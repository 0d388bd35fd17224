//! Application layer for readable-explainer
//!
//! This crate contains the Relay use case, the timeout-bounded dispatcher
//! the Presenter uses to reach it, and the port definitions.
//! It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    chunk_sink::{ChunkSink, ResultSink, SinkError},
    generation_gateway::{GenerationGateway, StreamHandle},
    relay_channel::RelayChannel,
    settings_store::{SettingsError, SettingsStore},
};
pub use use_cases::dispatch::{DEFAULT_DISPATCH_TIMEOUT, DispatchResult, Dispatcher, Settlement};
pub use use_cases::explain_text::ExplainTextUseCase;
