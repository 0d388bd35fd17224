//! Relay-side bus endpoint.

use super::channel::{Envelope, PushSink, RawPush};
use explainer_application::{ExplainTextUseCase, ResultSink};
use explainer_domain::{ExplanationRequest, RelayRequest, RelayResponse};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Accepts requests from the bus and answers each on its own task.
pub struct RelayListener {
    requests: mpsc::Receiver<Envelope>,
    pushes: mpsc::Sender<RawPush>,
}

impl RelayListener {
    pub fn new(requests: mpsc::Receiver<Envelope>, pushes: mpsc::Sender<RawPush>) -> Self {
        Self { requests, pushes }
    }

    /// Serve until every channel handle is dropped or `cancel` fires.
    ///
    /// With `streaming` set, fragments are pushed to the Presenter as
    /// `streamingChunk` messages before the final reply.
    pub async fn run(
        mut self,
        use_case: Arc<ExplainTextUseCase>,
        streaming: bool,
        cancel: CancellationToken,
    ) {
        info!(streaming, "Relay listening");
        loop {
            let envelope = tokio::select! {
                _ = cancel.cancelled() => break,
                next = self.requests.recv() => match next {
                    Some(envelope) => envelope,
                    None => break,
                },
            };

            let use_case = Arc::clone(&use_case);
            let sink = if streaming {
                ResultSink::Streaming(Arc::new(PushSink::new(
                    self.pushes.clone(),
                    envelope.session,
                )))
            } else {
                ResultSink::Final
            };

            tokio::spawn(async move {
                let response = answer(&use_case, envelope.payload, sink).await;
                let reply = match serde_json::to_value(&response) {
                    Ok(reply) => reply,
                    Err(e) => {
                        warn!("Failed to encode relay reply: {}", e);
                        return;
                    }
                };
                if envelope.reply.send(reply).is_err() {
                    debug!("Requester went away before the reply");
                }
            });
        }
        info!("Relay stopped");
    }
}

async fn answer(use_case: &ExplainTextUseCase, payload: Value, sink: ResultSink) -> RelayResponse {
    let request = match serde_json::from_value::<RelayRequest>(payload) {
        Ok(request) => request,
        Err(e) => {
            debug!("Unrecognized relay request: {}", e);
            return RelayResponse::failure("Unrecognized request");
        }
    };

    match request {
        RelayRequest::ExplainText { text, context } => {
            match ExplanationRequest::try_new(&text, context) {
                Some(request) => use_case.execute(&request, sink).await,
                None => RelayResponse::failure("No text selected"),
            }
        }
        // Context-menu requests are addressed to the Presenter.
        RelayRequest::ExplainFromContextMenu { .. } => {
            RelayResponse::failure("Unsupported request: explainFromContextMenu")
        }
    }
}
