//! Response classification.
//!
//! Pure functions that turn a decoded `generateContent` envelope into a
//! [`CandidateOutcome`]. Callers match the outcome exhaustively instead of
//! probing optional fields.

use super::envelope::GenerateContentResponse;
use crate::core::error::ExplainError;

/// Finish reason reported when a candidate was withheld by the safety filter.
const SAFETY_FINISH_REASON: &str = "SAFETY";

/// What a complete (non-streaming) response amounts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateOutcome {
    /// Usable explanation text.
    Success(String),
    /// The `candidates` list was missing or empty.
    EmptyCandidates,
    /// The prompt or the candidate was blocked; carries the reason.
    SafetyBlocked(String),
    /// A candidate exists but carries no non-blank text.
    Malformed,
}

impl CandidateOutcome {
    pub fn into_result(self) -> Result<String, ExplainError> {
        match self {
            CandidateOutcome::Success(text) => Ok(text),
            CandidateOutcome::EmptyCandidates => Err(ExplainError::EmptyResponse),
            CandidateOutcome::SafetyBlocked(reason) => Err(ExplainError::ContentFiltered(reason)),
            CandidateOutcome::Malformed => Err(ExplainError::MalformedResponse),
        }
    }
}

/// Classify a decoded response envelope.
///
/// Precedence: prompt block reason, then missing candidates, then a
/// safety-stopped candidate without text, then blank text.
pub fn parse_candidate_outcome(response: &GenerateContentResponse) -> CandidateOutcome {
    if let Some(reason) = response.block_reason() {
        return CandidateOutcome::SafetyBlocked(reason.to_string());
    }

    let Some(candidate) = response.first_candidate() else {
        return CandidateOutcome::EmptyCandidates;
    };

    match response.first_candidate_text() {
        Some(text) if !text.trim().is_empty() => CandidateOutcome::Success(text),
        _ if candidate.finish_reason.as_deref() == Some(SAFETY_FINISH_REASON) => {
            CandidateOutcome::SafetyBlocked(SAFETY_FINISH_REASON.to_string())
        }
        _ => CandidateOutcome::Malformed,
    }
}

/// Classify a raw JSON body. A body that is not a valid envelope is
/// [`CandidateOutcome::Malformed`].
pub fn parse_candidate_outcome_json(body: &str) -> CandidateOutcome {
    match serde_json::from_str::<GenerateContentResponse>(body) {
        Ok(response) => parse_candidate_outcome(&response),
        Err(_) => CandidateOutcome::Malformed,
    }
}

/// Extract the incremental fragment carried by one streaming record.
///
/// Returns `None` for records without text (usage-only records, the final
/// record carrying just a finish reason, and so on).
pub fn extract_fragment(record: &GenerateContentResponse) -> Option<String> {
    record.first_candidate_text().filter(|t| !t.is_empty())
}
