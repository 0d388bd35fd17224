//! Relay channel port
//!
//! The Presenter's side of the message boundary.

use async_trait::async_trait;
use explainer_domain::{ExplainError, RelayRequest, RelayResponse};

/// Sends one request to the Relay and waits for its single reply.
///
/// `session` identifies the requesting render session. Chunks pushed while
/// the request is served are routed back tagged with it, so a superseded
/// session's late chunks can be told apart.
///
/// Failures of the channel itself (closed, dropped reply) are reported as
/// [`ExplainError::Transport`]; failures of the explanation arrive inside
/// a `RelayResponse` with `success: false`.
#[async_trait]
pub trait RelayChannel: Send + Sync {
    async fn send(
        &self,
        session: u64,
        request: RelayRequest,
    ) -> Result<RelayResponse, ExplainError>;
}
