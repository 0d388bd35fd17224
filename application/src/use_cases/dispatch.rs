//! Request dispatch across the message boundary.
//!
//! [`Dispatcher::dispatch`] composes three outcomes as one race:
//!
//! - the Relay's reply arrives → that reply
//! - the timeout elapses first → [`ExplainError::Timeout`]
//! - the caller's token is cancelled → [`ExplainError::Cancelled`]
//!
//! Whatever settles first wins. The channel call itself keeps running on
//! its own task when it loses; its late result is offered to the same
//! [`Settlement`] and discarded there.

use crate::ports::relay_channel::RelayChannel;
use explainer_domain::{ExplainError, RelayRequest, RelayResponse};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Upper bound on one request/response round trip.
pub const DEFAULT_DISPATCH_TIMEOUT: Duration = Duration::from_secs(30);

pub type DispatchResult = Result<RelayResponse, ExplainError>;

/// A write-once slot: the first `settle` wins, later ones are ignored.
#[derive(Debug)]
pub struct Settlement<T> {
    inner: Arc<Mutex<SettlementState<T>>>,
}

#[derive(Debug)]
struct SettlementState<T> {
    value: Option<T>,
    attempts: usize,
}

impl<T> Clone for Settlement<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for Settlement<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Settlement<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SettlementState {
                value: None,
                attempts: 0,
            })),
        }
    }

    /// Offer a value. Returns true if it became the settled value.
    pub fn settle(&self, value: T) -> bool {
        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        state.attempts += 1;
        if state.value.is_some() {
            return false;
        }
        state.value = Some(value);
        true
    }

    pub fn is_settled(&self) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .value
            .is_some()
    }

    /// Total number of settle attempts, accepted or not.
    pub fn attempts(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).attempts
    }
}

impl<T: Clone> Settlement<T> {
    pub fn value(&self) -> Option<T> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .value
            .clone()
    }
}

/// Sends requests to the Relay with a fixed timeout.
#[derive(Clone)]
pub struct Dispatcher {
    channel: Arc<dyn RelayChannel>,
    timeout: Duration,
}

impl Dispatcher {
    pub fn new(channel: Arc<dyn RelayChannel>) -> Self {
        Self {
            channel,
            timeout: DEFAULT_DISPATCH_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send one request and wait for exactly one outcome.
    pub async fn dispatch(
        &self,
        session: u64,
        request: RelayRequest,
        cancel: &CancellationToken,
    ) -> DispatchResult {
        let settlement = Settlement::new();
        self.dispatch_into(session, request, cancel, &settlement)
            .await
    }

    /// Like [`dispatch`](Self::dispatch), settling into a caller-provided slot.
    ///
    /// The slot stays reachable after this returns, so a caller can observe
    /// that a late reply was offered and refused.
    pub async fn dispatch_into(
        &self,
        session: u64,
        request: RelayRequest,
        cancel: &CancellationToken,
        settlement: &Settlement<DispatchResult>,
    ) -> DispatchResult {
        let channel = Arc::clone(&self.channel);
        let late = settlement.clone();
        let mut call = tokio::spawn(async move {
            let result = channel.send(session, request).await;
            if !late.settle(result) {
                debug!("Discarding relay reply that arrived after settlement");
            }
        });

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                settlement.settle(Err(ExplainError::Cancelled));
            }
            joined = &mut call => {
                if let Err(e) = joined {
                    warn!("Relay channel task failed: {}", e);
                    settlement.settle(Err(ExplainError::Transport(e.to_string())));
                }
            }
            _ = tokio::time::sleep(self.timeout) => {
                if settlement.settle(Err(ExplainError::Timeout)) {
                    warn!("Relay request timed out after {:?}", self.timeout);
                }
            }
        }

        settlement.value().unwrap_or_else(|| {
            Err(ExplainError::Transport(
                "relay channel closed without a reply".to_string(),
            ))
        })
    }
}
