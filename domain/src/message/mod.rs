//! Messages exchanged across the Presenter ⇄ Relay boundary.
//!
//! The JSON shapes are fixed:
//!
//! ```text
//! {"action":"explainText","text":..,"context":{"title":..,"url":..}}
//! {"action":"explainFromContextMenu","text":..}
//! {"action":"streamingChunk","chunk":..}
//! {"success":true,"explanation":..} | {"success":false,"error":..}
//! ```

use crate::core::request::{ExplanationRequest, PageContext};
use serde::{Deserialize, Serialize};

/// A request sent to the Relay (or, for the context-menu variant, from the
/// host to the Presenter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum RelayRequest {
    #[serde(rename = "explainText")]
    ExplainText { text: String, context: PageContext },

    #[serde(rename = "explainFromContextMenu")]
    ExplainFromContextMenu { text: String },
}

impl RelayRequest {
    pub fn explain(request: &ExplanationRequest) -> Self {
        RelayRequest::ExplainText {
            text: request.selected_text().to_string(),
            context: request.context().clone(),
        }
    }
}

/// Push-style message delivered to the Presenter while a request is in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum PushMessage {
    #[serde(rename = "streamingChunk")]
    StreamingChunk { chunk: String },
}

/// The single reply to a [`RelayRequest::ExplainText`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RelayResponse {
    pub fn success(explanation: impl Into<String>) -> Self {
        Self {
            success: true,
            explanation: Some(explanation.into()),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            explanation: None,
            error: Some(error.into()),
        }
    }

    /// Collapse into the explanation text or the error message.
    pub fn into_result(self) -> Result<String, String> {
        if self.success {
            Ok(self.explanation.unwrap_or_default())
        } else {
            Err(self
                .error
                .unwrap_or_else(|| "Unknown error".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn explain_text_wire_shape() {
        let request = ExplanationRequest::try_new(
            "borrow checker",
            PageContext::new("Rust", "https://example.com"),
        )
        .unwrap();
        let value = serde_json::to_value(RelayRequest::explain(&request)).unwrap();
        assert_eq!(
            value,
            json!({
                "action": "explainText",
                "text": "borrow checker",
                "context": {"title": "Rust", "url": "https://example.com"}
            })
        );
    }

    #[test]
    fn context_menu_request_deserializes() {
        let request: RelayRequest =
            serde_json::from_value(json!({"action": "explainFromContextMenu", "text": "lifetimes"}))
                .unwrap();
        assert_eq!(
            request,
            RelayRequest::ExplainFromContextMenu {
                text: "lifetimes".to_string()
            }
        );
    }

    #[test]
    fn streaming_chunk_wire_shape() {
        let value = serde_json::to_value(PushMessage::StreamingChunk {
            chunk: "abc".to_string(),
        })
        .unwrap();
        assert_eq!(value, json!({"action": "streamingChunk", "chunk": "abc"}));
    }

    #[test]
    fn response_wire_shapes() {
        assert_eq!(
            serde_json::to_value(RelayResponse::success("text")).unwrap(),
            json!({"success": true, "explanation": "text"})
        );
        assert_eq!(
            serde_json::to_value(RelayResponse::failure("boom")).unwrap(),
            json!({"success": false, "error": "boom"})
        );
    }

    #[test]
    fn into_result() {
        assert_eq!(RelayResponse::success("ok").into_result(), Ok("ok".to_string()));
        assert_eq!(
            RelayResponse::failure("bad").into_result(),
            Err("bad".to_string())
        );
    }
}
