//! Configuration file loading for readable-explainer
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `EXPLAINER_`-prefixed environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./explainer.toml` or `./.explainer.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/readable-explainer/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigIssue, FileConfig, FileGenerationConfig, FileHttpConfig, FilePresenterConfig,
};
pub use loader::{APP_DIR_NAME, ConfigLoader};
