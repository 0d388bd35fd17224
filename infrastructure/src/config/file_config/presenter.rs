//! Presenter configuration from TOML (`[presenter]` section)

use serde::{Deserialize, Serialize};

/// Timing of the overlay and the message channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePresenterConfig {
    /// Upper bound on one request/response round trip, in seconds
    pub timeout_secs: u64,
    /// Interval between typing-simulation captions, in milliseconds
    pub typing_interval_ms: u64,
    /// Characters revealed per tick by the reveal effect
    pub reveal_chars_per_tick: usize,
    /// Reveal tick interval, in milliseconds
    pub reveal_tick_ms: u64,
    /// Receive fragments as they are generated instead of one final string
    pub stream: bool,
}

impl Default for FilePresenterConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            typing_interval_ms: 400,
            reveal_chars_per_tick: 3,
            reveal_tick_ms: 20,
            stream: true,
        }
    }
}
