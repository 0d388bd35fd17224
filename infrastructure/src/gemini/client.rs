//! Gemini HTTP gateway.
//!
//! Implements [`GenerationGateway`] against the `generateContent` and
//! `streamGenerateContent` endpoints. The credential travels as the `key`
//! query parameter; `reqwest` percent-encodes it.

use super::stream::{LineDecoder, StreamRecord, parse_stream_line};
use super::types::{GenerateContentRequest, SafetySetting};
use crate::config::FileConfig;
use async_trait::async_trait;
use explainer_application::{GenerationGateway, StreamHandle};
use explainer_domain::util::truncate_str;
use explainer_domain::{
    ApiEndpoint, ExplainError, GenerationParams, StreamEvent, parse_candidate_outcome_json,
};
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

const GENERATE_METHOD: &str = ":generateContent";
const STREAM_METHOD: &str = ":streamGenerateContent";

/// Buffered stream events between the reader task and the consumer.
const STREAM_CHANNEL_CAPACITY: usize = 64;

/// Generation gateway for the Gemini REST API
#[derive(Clone)]
pub struct GeminiGateway {
    client: reqwest::Client,
    params: GenerationParams,
    safety_settings: Vec<SafetySetting>,
}

impl GeminiGateway {
    pub fn new(client: reqwest::Client, params: GenerationParams) -> Self {
        Self {
            client,
            params,
            safety_settings: Vec::new(),
        }
    }

    /// Build a client with the given connect timeout and user agent.
    pub fn with_http(
        params: GenerationParams,
        connect_timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, ExplainError> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| ExplainError::Transport(e.to_string()))?;
        Ok(Self::new(client, params))
    }

    /// Build from the `[generation]` and `[http]` config sections.
    pub fn from_config(config: &FileConfig) -> Result<Self, ExplainError> {
        let gateway = Self::with_http(
            config.generation.to_params(),
            Duration::from_secs(config.http.connect_timeout_secs),
            &config.http.user_agent,
        )?;
        Ok(if config.generation.safety_settings {
            gateway.with_safety_settings()
        } else {
            gateway
        })
    }

    /// Attach the standard safety settings to every request.
    pub fn with_safety_settings(mut self) -> Self {
        self.safety_settings = SafetySetting::standard();
        self
    }

    fn body(&self, prompt: &str) -> GenerateContentRequest {
        GenerateContentRequest::single_turn(prompt, self.params, self.safety_settings.clone())
    }

    async fn post(
        &self,
        url: &str,
        api_key: &str,
        streaming: bool,
        prompt: &str,
    ) -> Result<reqwest::Response, ExplainError> {
        let mut request = self.client.post(url).query(&[("key", api_key)]);
        if streaming {
            request = request.query(&[("alt", "sse")]);
        }

        let response = request
            .json(&self.body(prompt))
            .send()
            .await
            .map_err(|e| ExplainError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                status = status.as_u16(),
                "Generation API error: {}",
                truncate_str(&body, 200)
            );
            return Err(ExplainError::http(status.as_u16()));
        }

        Ok(response)
    }
}

/// Streaming endpoint for a configured `:generateContent` URL.
///
/// URLs that do not name the generate method are used unchanged.
pub fn streaming_url(api_url: &str) -> String {
    if api_url.contains(STREAM_METHOD) {
        api_url.to_string()
    } else {
        api_url.replacen(GENERATE_METHOD, STREAM_METHOD, 1)
    }
}

#[async_trait]
impl GenerationGateway for GeminiGateway {
    async fn generate(&self, endpoint: &ApiEndpoint, prompt: &str) -> Result<String, ExplainError> {
        debug!("POST {} ({} byte prompt)", endpoint.api_url, prompt.len());
        let response = self
            .post(&endpoint.api_url, &endpoint.api_key, false, prompt)
            .await?;

        let body = response
            .text()
            .await
            .map_err(|e| ExplainError::Transport(e.without_url().to_string()))?;
        trace!("Generation response: {}", truncate_str(&body, 500));

        parse_candidate_outcome_json(&body).into_result()
    }

    async fn generate_streaming(
        &self,
        endpoint: &ApiEndpoint,
        prompt: &str,
    ) -> Result<StreamHandle, ExplainError> {
        let url = streaming_url(&endpoint.api_url);
        debug!("POST {} (streaming, {} byte prompt)", url, prompt.len());
        let response = self.post(&url, &endpoint.api_key, true, prompt).await?;

        let (tx, rx) = mpsc::channel(STREAM_CHANNEL_CAPACITY);
        tokio::spawn(pump_stream(response, tx));
        Ok(StreamHandle::new(rx))
    }
}

/// Read the body to the end, forwarding fragments as they are decoded.
async fn pump_stream(response: reqwest::Response, tx: mpsc::Sender<StreamEvent>) {
    let mut body = response.bytes_stream();
    let mut decoder = LineDecoder::new();
    let mut pump = StreamPump::new(tx);

    'read: while let Some(chunk) = body.next().await {
        let bytes = match chunk {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Stream read failed: {}", e);
                pump.fail(ExplainError::Transport(e.without_url().to_string()))
                    .await;
                return;
            }
        };

        for line in decoder.push(&bytes) {
            if pump.apply(&line).await == Flow::Stop {
                break 'read;
            }
        }
    }

    if !pump.stopped
        && let Some(line) = decoder.finish()
    {
        pump.apply(&line).await;
    }

    pump.complete().await;
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

struct StreamPump {
    tx: mpsc::Sender<StreamEvent>,
    assembled: String,
    fragments: usize,
    skipped: usize,
    stopped: bool,
    failed: bool,
}

impl StreamPump {
    fn new(tx: mpsc::Sender<StreamEvent>) -> Self {
        Self {
            tx,
            assembled: String::new(),
            fragments: 0,
            skipped: 0,
            stopped: false,
            failed: false,
        }
    }

    async fn apply(&mut self, line: &str) -> Flow {
        match parse_stream_line(line) {
            StreamRecord::Fragment(text) => {
                self.assembled.push_str(&text);
                self.fragments += 1;
                if self.tx.send(StreamEvent::Delta(text)).await.is_err() {
                    debug!("Stream consumer dropped, stopping read");
                    self.stopped = true;
                    self.failed = true;
                    return Flow::Stop;
                }
                Flow::Continue
            }
            StreamRecord::Empty => Flow::Continue,
            StreamRecord::Done => {
                debug!("Stream sentinel received");
                self.stopped = true;
                Flow::Stop
            }
            StreamRecord::Blocked(reason) => {
                self.fail(ExplainError::ContentFiltered(reason)).await;
                Flow::Stop
            }
            StreamRecord::Invalid => {
                self.skipped += 1;
                debug!("Skipping unparsable stream record: {}", truncate_str(line, 120));
                Flow::Continue
            }
        }
    }

    async fn fail(&mut self, error: ExplainError) {
        self.stopped = true;
        self.failed = true;
        let _ = self.tx.send(StreamEvent::Error(error)).await;
    }

    async fn complete(self) {
        if self.failed {
            return;
        }
        info!(
            fragments = self.fragments,
            skipped = self.skipped,
            "Stream complete ({} bytes)",
            self.assembled.len()
        );
        let event = if self.assembled.is_empty() {
            StreamEvent::Error(ExplainError::EmptyResponse)
        } else {
            StreamEvent::Completed(self.assembled)
        };
        let _ = self.tx.send(event).await;
    }
}
