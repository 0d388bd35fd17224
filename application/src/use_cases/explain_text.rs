//! Explain Text use case (the Relay).
//!
//! Turns one [`ExplanationRequest`] into one [`RelayResponse`]:
//!
//! 1. Read the API credential and endpoint from the [`SettingsStore`]
//! 2. Build the prompt from the fixed template
//! 3. Call the [`GenerationGateway`], streaming fragments into the
//!    [`ResultSink`] when one is provided
//! 4. Convert every failure into `RelayResponse::failure`
//!
//! `execute` is infallible by signature: nothing it does can escape across
//! the message boundary as an error.

use crate::ports::chunk_sink::{ChunkSink, ResultSink};
use crate::ports::generation_gateway::GenerationGateway;
use crate::ports::settings_store::SettingsStore;
use explainer_domain::util::truncate_str;
use explainer_domain::{
    ApiEndpoint, ApiSettings, ExplainError, ExplanationRequest, PromptTemplate, RelayResponse,
    StreamEvent,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Use case for answering one explanation request.
#[derive(Clone)]
pub struct ExplainTextUseCase {
    settings: Arc<dyn SettingsStore>,
    gateway: Arc<dyn GenerationGateway>,
}

impl ExplainTextUseCase {
    pub fn new(settings: Arc<dyn SettingsStore>, gateway: Arc<dyn GenerationGateway>) -> Self {
        Self { settings, gateway }
    }

    /// Run the request to completion and settle it as a structured response.
    pub async fn execute(&self, request: &ExplanationRequest, sink: ResultSink) -> RelayResponse {
        info!(
            streaming = sink.is_streaming(),
            "Explaining selection: {}",
            truncate_str(request.selected_text(), 80)
        );

        match self.run(request, sink).await {
            Ok(explanation) => {
                debug!("Explanation complete ({} bytes)", explanation.len());
                RelayResponse::success(explanation)
            }
            Err(e) => {
                warn!("Explanation failed: {}", e);
                RelayResponse::failure(e.user_message())
            }
        }
    }

    async fn run(
        &self,
        request: &ExplanationRequest,
        sink: ResultSink,
    ) -> Result<String, ExplainError> {
        let endpoint = self.load_endpoint().await?;
        let prompt = PromptTemplate::explanation(request);

        match sink {
            ResultSink::Final => self.gateway.generate(&endpoint, &prompt).await,
            ResultSink::Streaming(chunk_sink) => {
                self.run_streaming(&endpoint, &prompt, chunk_sink.as_ref())
                    .await
            }
        }
    }

    async fn load_endpoint(&self) -> Result<ApiEndpoint, ExplainError> {
        let settings = match self.settings.get().await {
            Ok(settings) => settings,
            Err(e) => {
                // An unreadable store is reported the same way as an empty one.
                warn!("Failed to read settings: {}", e);
                ApiSettings::default()
            }
        };
        settings.require()
    }

    /// Drain the gateway stream, forwarding each fragment in arrival order.
    ///
    /// Sink failures are logged and swallowed; the final text is still
    /// assembled and returned.
    async fn run_streaming(
        &self,
        endpoint: &ApiEndpoint,
        prompt: &str,
        sink: &dyn ChunkSink,
    ) -> Result<String, ExplainError> {
        let mut handle = self.gateway.generate_streaming(endpoint, prompt).await?;
        let mut assembled = String::new();
        let mut sink_failed = false;

        while let Some(event) = handle.receiver.recv().await {
            match event {
                StreamEvent::Delta(chunk) => {
                    assembled.push_str(&chunk);
                    if let Err(e) = sink.emit(&chunk).await
                        && !sink_failed
                    {
                        sink_failed = true;
                        debug!("Chunk dispatch failed, continuing without sink: {}", e);
                    }
                }
                StreamEvent::Completed(full) => {
                    if assembled.is_empty() {
                        return Ok(full);
                    }
                    return Ok(assembled);
                }
                StreamEvent::Error(e) => return Err(e),
            }
        }

        if assembled.is_empty() {
            Err(ExplainError::Transport(
                "stream closed before completion".to_string(),
            ))
        } else {
            Ok(assembled)
        }
    }
}
