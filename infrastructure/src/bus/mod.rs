//! In-process message bus between the Presenter and the Relay.
//!
//! Messages cross the bus as `serde_json::Value` so both sides only agree on
//! the wire shapes in [`explainer_domain::message`]. Each request carries a
//! oneshot reply slot; streamed fragments travel on a separate push channel.

pub mod channel;
pub mod listener;

pub use channel::{Envelope, LocalRelayChannel, PushReceiver, PushSink, RawPush, RoutedPush};
pub use listener::RelayListener;

use tokio::sync::mpsc;

/// Default queue depth for requests and pushes.
pub const DEFAULT_BUS_CAPACITY: usize = 32;

/// Both ends of a freshly opened bus.
pub struct LocalMessageBus {
    /// Presenter side: request/reply.
    pub channel: LocalRelayChannel,
    /// Presenter side: streamed fragments.
    pub pushes: PushReceiver,
    /// Relay side.
    pub listener: RelayListener,
}

impl LocalMessageBus {
    pub fn open(capacity: usize) -> Self {
        let (request_tx, request_rx) = mpsc::channel(capacity);
        let (push_tx, push_rx) = mpsc::channel(capacity);

        Self {
            channel: LocalRelayChannel::new(request_tx),
            pushes: PushReceiver::new(push_rx),
            listener: RelayListener::new(request_rx, push_tx),
        }
    }
}

impl Default for LocalMessageBus {
    fn default() -> Self {
        Self::open(DEFAULT_BUS_CAPACITY)
    }
}
