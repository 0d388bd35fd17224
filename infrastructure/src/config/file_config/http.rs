//! HTTP client configuration from TOML (`[http]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileHttpConfig {
    /// TCP/TLS connect timeout, in seconds
    pub connect_timeout_secs: u64,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for FileHttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            user_agent: concat!("readable-explainer/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
