//! Core domain concepts shared across all subdomains.
//!
//! - [`request::ExplanationRequest`]: the validated selection plus page metadata
//! - [`error::ExplainError`]: the failure taxonomy surfaced to the user

pub mod error;
pub mod request;
