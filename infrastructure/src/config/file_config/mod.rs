//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted to domain types on use.

mod generation;
mod http;
mod presenter;

pub use generation::FileGenerationConfig;
pub use http::FileHttpConfig;
pub use presenter::FilePresenterConfig;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Sampling parameters
    pub generation: FileGenerationConfig,
    /// Overlay and channel timing
    pub presenter: FilePresenterConfig,
    /// HTTP client settings
    pub http: FileHttpConfig,
}

/// A configuration value that is out of range.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ConfigIssue {
    pub field: &'static str,
    pub message: String,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        let generation = &self.generation;

        if !(0.0..=2.0).contains(&generation.temperature) {
            issues.push(ConfigIssue {
                field: "generation.temperature",
                message: format!("must be within 0.0..=2.0, got {}", generation.temperature),
            });
        }
        if !(0.0..=1.0).contains(&generation.top_p) {
            issues.push(ConfigIssue {
                field: "generation.top_p",
                message: format!("must be within 0.0..=1.0, got {}", generation.top_p),
            });
        }
        if generation.max_output_tokens == 0 {
            issues.push(ConfigIssue {
                field: "generation.max_output_tokens",
                message: "must be greater than 0".to_string(),
            });
        }

        let presenter = &self.presenter;
        for (field, value) in [
            ("presenter.timeout_secs", presenter.timeout_secs),
            ("presenter.typing_interval_ms", presenter.typing_interval_ms),
            ("presenter.reveal_tick_ms", presenter.reveal_tick_ms),
        ] {
            if value == 0 {
                issues.push(ConfigIssue {
                    field,
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        if presenter.reveal_chars_per_tick == 0 {
            issues.push(ConfigIssue {
                field: "presenter.reveal_chars_per_tick",
                message: "must be greater than 0".to_string(),
            });
        }

        issues
    }
}
