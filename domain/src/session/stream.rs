//! Streaming events for one explanation request.
//!
//! [`StreamEvent`] bridges transport-level streaming (records read off the
//! generation API's response body) to the layers above, enabling real-time
//! display of the explanation as it is generated.

use crate::core::error::ExplainError;

/// An event in a streaming explanation response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A text fragment extracted from one upstream record.
    Delta(String),
    /// The complete response text (signals stream end).
    Completed(String),
    /// A failure that ended the stream.
    Error(ExplainError),
}
