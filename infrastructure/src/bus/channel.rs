//! Presenter-side bus endpoints.

use async_trait::async_trait;
use explainer_application::{ChunkSink, RelayChannel, SinkError};
use explainer_domain::{ExplainError, PushMessage, RelayRequest, RelayResponse};
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace};

/// One request on the bus with its reply slot.
#[derive(Debug)]
pub struct Envelope {
    /// Requesting session; pushes for this request carry it back.
    pub session: u64,
    pub payload: Value,
    pub reply: oneshot::Sender<Value>,
}

/// [`RelayChannel`] over the local bus.
#[derive(Clone)]
pub struct LocalRelayChannel {
    requests: mpsc::Sender<Envelope>,
}

impl LocalRelayChannel {
    pub fn new(requests: mpsc::Sender<Envelope>) -> Self {
        Self { requests }
    }
}

#[async_trait]
impl RelayChannel for LocalRelayChannel {
    async fn send(
        &self,
        session: u64,
        request: RelayRequest,
    ) -> Result<RelayResponse, ExplainError> {
        let payload =
            serde_json::to_value(&request).map_err(|e| ExplainError::Transport(e.to_string()))?;
        let (reply_tx, reply_rx) = oneshot::channel();

        self.requests
            .send(Envelope {
                session,
                payload,
                reply: reply_tx,
            })
            .await
            .map_err(|_| ExplainError::Transport("Relay is not listening".to_string()))?;

        let reply = reply_rx
            .await
            .map_err(|_| ExplainError::Transport("Relay dropped the request".to_string()))?;
        trace!("Relay reply: {}", reply);

        serde_json::from_value(reply)
            .map_err(|e| ExplainError::Transport(format!("Unrecognized relay reply: {}", e)))
    }
}

/// A push message as it travels on the bus, tagged with its session.
pub type RawPush = (u64, Value);

/// A decoded push for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedPush {
    pub session: u64,
    pub message: PushMessage,
}

/// Relay-side sink that pushes `streamingChunk` messages to the Presenter.
#[derive(Clone)]
pub struct PushSink {
    pushes: mpsc::Sender<RawPush>,
    session: u64,
}

impl PushSink {
    pub fn new(pushes: mpsc::Sender<RawPush>, session: u64) -> Self {
        Self { pushes, session }
    }
}

#[async_trait]
impl ChunkSink for PushSink {
    async fn emit(&self, chunk: &str) -> Result<(), SinkError> {
        let message = PushMessage::StreamingChunk {
            chunk: chunk.to_string(),
        };
        let value = serde_json::to_value(&message).map_err(|e| SinkError::Other(e.to_string()))?;
        self.pushes
            .send((self.session, value))
            .await
            .map_err(|_| SinkError::Closed)
    }
}

/// Presenter-side receiver of push messages.
pub struct PushReceiver {
    rx: mpsc::Receiver<RawPush>,
}

impl PushReceiver {
    pub fn new(rx: mpsc::Receiver<RawPush>) -> Self {
        Self { rx }
    }

    /// Next recognized push message.
    ///
    /// Values that do not decode as a [`PushMessage`] are skipped. Returns
    /// `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<RoutedPush> {
        while let Some((session, value)) = self.rx.recv().await {
            match serde_json::from_value::<PushMessage>(value) {
                Ok(message) => return Some(RoutedPush { session, message }),
                Err(e) => debug!("Ignoring unrecognized push message: {}", e),
            }
        }
        None
    }
}
