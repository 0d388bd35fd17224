//! Generation API response domain.
//!
//! - [`envelope::GenerateContentResponse`]: decoded response / streaming record
//! - [`parsing::CandidateOutcome`]: exhaustive classification of a response

pub mod envelope;
pub mod parsing;
