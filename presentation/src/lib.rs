//! Presentation layer for readable-explainer
//!
//! This crate contains the Presenter (selection capture, typing simulation,
//! progressive rendering, overlay lifecycle), the HTML renderer, the overlay
//! surface port with its terminal implementation, and the CLI definitions.

pub mod cli;
pub mod output;
pub mod presenter;
pub mod render;
pub mod surface;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, ConfigAction, ExplainArgs};
pub use output::console::ConsoleFormatter;
pub use presenter::{
    CharacterReveal, Presenter, PresenterOutcome, PresenterSettings, SelectionRect,
    SelectionSnapshot, SelectionTracker, TypingSimulation,
};
pub use render::{escape_html, format_markdown};
pub use surface::{OverlaySurface, Position, RecordingSurface, SurfaceOp, TerminalSurface};
