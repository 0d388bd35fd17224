//! Stream session entity

use chrono::{DateTime, TimeDelta, Utc};

/// Mutable state of one in-progress explanation render.
///
/// Lifecycle: created on dispatch, appended to on every chunk, and closed
/// by [`finish`](Self::finish) or [`deactivate`](Self::deactivate). Until it
/// is finished the accumulated text only ever grows; once inactive every
/// further mutation is refused.
#[derive(Debug, Clone)]
pub struct StreamSession {
    id: u64,
    accumulated_text: String,
    is_active: bool,
    started_at: DateTime<Utc>,
    chunk_count: usize,
}

impl StreamSession {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            accumulated_text: String::new(),
            is_active: true,
            started_at: Utc::now(),
            chunk_count: 0,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.accumulated_text
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Time since the session was opened.
    pub fn elapsed(&self) -> TimeDelta {
        Utc::now() - self.started_at
    }

    /// Number of chunks applied so far.
    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }

    /// Append a fragment. Returns false (and changes nothing) when the
    /// session is no longer active.
    pub fn append(&mut self, fragment: &str) -> bool {
        if !self.is_active {
            return false;
        }
        self.accumulated_text.push_str(fragment);
        self.chunk_count += 1;
        true
    }

    /// Replace the buffer with the final text and close the session.
    ///
    /// Returns false if the session was already closed.
    pub fn finish(&mut self, final_text: impl Into<String>) -> bool {
        if !self.is_active {
            return false;
        }
        self.accumulated_text = final_text.into();
        self.is_active = false;
        true
    }

    /// Close the session without touching the buffer (error or dismissal).
    pub fn deactivate(&mut self) {
        self.is_active = false;
    }
}
