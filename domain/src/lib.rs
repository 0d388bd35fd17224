//! Domain layer for readable-explainer
//!
//! This crate contains the core types of the explanation pipeline.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! - **ExplanationRequest**: the user's selection plus the page it came from
//! - **StreamSession**: the append-only buffer of one in-progress render
//! - **CandidateOutcome**: the exhaustive classification of an API response
//! - **Relay messages**: the fixed JSON shapes crossing the message boundary

pub mod config;
pub mod core;
pub mod message;
pub mod prompt;
pub mod response;
pub mod session;
pub mod util;

// Re-export commonly used types
pub use config::{ApiEndpoint, ApiSettings, DEFAULT_API_URL, GenerationParams};
pub use core::{
    error::{ConfigField, ExplainError, HttpErrorKind},
    request::{ExplanationRequest, PageContext},
};
pub use message::{PushMessage, RelayRequest, RelayResponse};
pub use prompt::PromptTemplate;
pub use response::{
    envelope::GenerateContentResponse,
    parsing::{
        CandidateOutcome, extract_fragment, parse_candidate_outcome, parse_candidate_outcome_json,
    },
};
pub use session::{entities::StreamSession, stream::StreamEvent};
