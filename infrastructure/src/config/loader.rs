//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// Directory name under the platform config dir.
pub const APP_DIR_NAME: &str = "readable-explainer";

/// Project-level config file names, checked in order.
const PROJECT_CONFIG_FILES: [&str; 2] = ["explainer.toml", ".explainer.toml"];

/// Prefix of environment overrides, e.g. `EXPLAINER_PRESENTER__TIMEOUT_SECS=60`.
const ENV_PREFIX: &str = "EXPLAINER_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `EXPLAINER_`-prefixed environment variables
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./explainer.toml` or `./.explainer.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/readable-explainer/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        figment.extract().map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Per-user directory holding `config.toml` and `settings.toml`.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR_NAME))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_CONFIG_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for --show-config)
    pub fn print_config_sources() {
        println!("Configuration sources (in priority order):");
        println!("  [     ] Environment: {}*", ENV_PREFIX);

        match Self::project_config_path() {
            Some(path) => println!("  [FOUND] Project: {}", path.display()),
            None => println!("  [     ] Project: ./explainer.toml or ./.explainer.toml"),
        }

        if let Some(path) = Self::global_config_path() {
            println!("  [{}] Global:  {}", found_marker(&path), path.display());
        }

        println!("  [     ] Default: built-in defaults");
    }
}

fn found_marker(path: &Path) -> &'static str {
    if path.exists() { "FOUND" } else { "     " }
}
