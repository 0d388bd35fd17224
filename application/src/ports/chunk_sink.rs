//! Chunk sink port
//!
//! How the Relay hands incremental fragments back to the page that asked.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    #[error("Chunk receiver is gone")]
    Closed,

    #[error("Chunk dispatch failed: {0}")]
    Other(String),
}

/// Receives text fragments in arrival order.
#[async_trait]
pub trait ChunkSink: Send + Sync {
    async fn emit(&self, chunk: &str) -> Result<(), SinkError>;
}

/// The result capability handed to the Relay with each request.
#[derive(Clone)]
pub enum ResultSink {
    /// Only the final string is wanted.
    Final,
    /// Fragments go to the sink as they arrive; the final string follows.
    Streaming(Arc<dyn ChunkSink>),
}

impl ResultSink {
    pub fn is_streaming(&self) -> bool {
        matches!(self, ResultSink::Streaming(_))
    }
}

impl std::fmt::Debug for ResultSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultSink::Final => write!(f, "ResultSink::Final"),
            ResultSink::Streaming(_) => write!(f, "ResultSink::Streaming"),
        }
    }
}
