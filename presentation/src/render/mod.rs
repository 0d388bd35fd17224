//! HTML rendering for the overlay.

pub mod markdown;
pub mod overlay;

pub use markdown::{escape_html, format_markdown};
pub use overlay::{
    PanelKind, TYPING_CURSOR, error_panel, loading_panel, panel_body, result_panel,
    streaming_panel,
};
