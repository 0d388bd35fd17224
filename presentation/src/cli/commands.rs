//! CLI command definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for readable-explainer
#[derive(Parser, Debug)]
#[command(name = "readable-explainer")]
#[command(author, version, about = "Explain a passage of text in plain language")]
#[command(long_about = r#"
Readable Explainer sends a selected passage to the Gemini API and renders a
plain-language explanation with background, key points and examples.

The API key and endpoint are kept in the settings file and can be changed
with `readable-explainer config set`. Behaviour (sampling parameters,
timeouts, streaming) is read from configuration files, in priority order:
1. --config <path>     Explicit config file
2. ./explainer.toml    Project-level config
3. ~/.config/readable-explainer/config.toml   Global config

Example:
  readable-explainer config set --api-key AIza...
  readable-explainer explain "photosynthesis" --title "Biology 101"
  readable-explainer explain "ownership and borrowing" --no-stream --reveal
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Explain a passage of text
    Explain(ExplainArgs),

    /// Show or change the API settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args, Debug)]
pub struct ExplainArgs {
    /// The text to explain (use "-" to read from stdin)
    pub text: String,

    /// Title of the page the text came from
    #[arg(long, default_value = "")]
    pub title: String,

    /// URL of the page the text came from
    #[arg(long, default_value = "")]
    pub url: String,

    /// Wait for the whole explanation instead of streaming it
    #[arg(long)]
    pub no_stream: bool,

    /// Reveal a non-streamed explanation character by character
    #[arg(long)]
    pub reveal: bool,

    /// Write the final overlay HTML to a file
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the stored settings (the key is masked)
    Show,

    /// Validate and store new settings
    Set {
        /// Gemini API key
        #[arg(long)]
        api_key: Option<String>,

        /// Generation API request URL
        #[arg(long)]
        api_url: Option<String>,
    },
}
