//! Gemini generation API adapter.
//!
//! - [`client::GeminiGateway`]: [`GenerationGateway`](explainer_application::GenerationGateway) over reqwest
//! - [`stream`]: line decoding and record classification for streamed bodies
//! - [`types`]: request body wire types

pub mod client;
pub mod stream;
pub mod types;
