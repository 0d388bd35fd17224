//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod chunk_sink;
pub mod generation_gateway;
pub mod relay_channel;
pub mod settings_store;
