//! Generation gateway port
//!
//! Defines the interface for calling the external generation API.

use async_trait::async_trait;
use explainer_domain::{ApiEndpoint, ExplainError, StreamEvent};
use tokio::sync::mpsc;

/// Gateway for the generation API
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait GenerationGateway: Send + Sync {
    /// Send a prompt and wait for the complete text.
    async fn generate(&self, endpoint: &ApiEndpoint, prompt: &str) -> Result<String, ExplainError>;

    /// Send a prompt and get a streaming response.
    ///
    /// Default implementation calls `generate()` and wraps the result in a
    /// single `Completed` event.
    async fn generate_streaming(
        &self,
        endpoint: &ApiEndpoint,
        prompt: &str,
    ) -> Result<StreamHandle, ExplainError> {
        let result = self.generate(endpoint, prompt).await?;
        let (tx, rx) = mpsc::channel(1);
        // Receiver may already be gone
        let _ = tx.send(StreamEvent::Completed(result)).await;
        Ok(StreamHandle::new(rx))
    }
}

/// Handle for receiving streaming events from the gateway.
///
/// Events arrive in the order the upstream produced them. The stream ends
/// with exactly one terminal event, or with the channel closing.
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<StreamEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>) -> Self {
        Self { receiver }
    }

    /// Consume the stream and collect all text into a single string.
    pub async fn collect_text(mut self) -> Result<String, ExplainError> {
        let mut full_text = String::new();
        while let Some(event) = self.receiver.recv().await {
            match event {
                StreamEvent::Delta(chunk) => full_text.push_str(&chunk),
                StreamEvent::Completed(text) => {
                    if full_text.is_empty() {
                        return Ok(text);
                    }
                    return Ok(full_text);
                }
                StreamEvent::Error(e) => return Err(e),
            }
        }
        // Channel closed without a terminal event
        Ok(full_text)
    }
}
