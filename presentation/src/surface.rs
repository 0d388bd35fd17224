//! Overlay surface: where the Presenter draws.
//!
//! The Presenter is the only writer. Implementations render the affordance
//! (the small "Explain" button near a selection) and the overlay panel.

use crate::render::overlay::{PanelKind, panel_body};
use colored::Colorize;
use regex::Regex;
use std::io::Write;
use std::sync::{Arc, LazyLock, Mutex};

/// Page coordinates of the affordance's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

pub trait OverlaySurface: Send {
    fn show_affordance(&mut self, position: Position);
    fn hide_affordance(&mut self);
    /// Open the overlay with initial content.
    fn show_overlay(&mut self, html: &str);
    /// Replace the overlay content.
    fn set_content(&mut self, html: &str);
    fn hide_overlay(&mut self);
}

/// One recorded surface mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    ShowAffordance(Position),
    HideAffordance,
    ShowOverlay(String),
    SetContent(String),
    HideOverlay,
}

/// Surface that records every call; clones share the log.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    ops: Arc<Mutex<Vec<SurfaceOp>>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> Vec<SurfaceOp> {
        self.ops.lock().map(|ops| ops.clone()).unwrap_or_default()
    }

    /// The most recent overlay content, if any.
    pub fn last_content(&self) -> Option<String> {
        self.ops().into_iter().rev().find_map(|op| match op {
            SurfaceOp::ShowOverlay(html) | SurfaceOp::SetContent(html) => Some(html),
            _ => None,
        })
    }

    fn push(&self, op: SurfaceOp) {
        if let Ok(mut ops) = self.ops.lock() {
            ops.push(op);
        }
    }
}

impl OverlaySurface for RecordingSurface {
    fn show_affordance(&mut self, position: Position) {
        self.push(SurfaceOp::ShowAffordance(position));
    }

    fn hide_affordance(&mut self) {
        self.push(SurfaceOp::HideAffordance);
    }

    fn show_overlay(&mut self, html: &str) {
        self.push(SurfaceOp::ShowOverlay(html.to_string()));
    }

    fn set_content(&mut self, html: &str) {
        self.push(SurfaceOp::SetContent(html.to_string()));
    }

    fn hide_overlay(&mut self) {
        self.push(SurfaceOp::HideOverlay);
    }
}

static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<(/?)([a-z0-9]+)(?: class="([a-z0-9-]+)")?>"#).expect("valid tag pattern")
});

/// Convert overlay HTML into styled terminal text.
pub fn html_to_terminal(html: &str) -> String {
    let mut out = String::new();
    let mut last = 0;
    let mut styles: Vec<&str> = Vec::new();

    for caps in TAG.captures_iter(html) {
        let Some(whole) = caps.get(0) else { continue };
        push_styled(&mut out, &unescape(&html[last..whole.start()]), &styles);
        last = whole.end();

        let closing = !caps[1].is_empty();
        let name = caps.get(2).map_or("", |m| m.as_str());
        let class = caps.get(3).map_or("", |m| m.as_str());

        match (closing, name) {
            (false, "br") => out.push('\n'),
            (true, "p") | (true, "blockquote") => out.push_str("\n\n"),
            (false, "blockquote") => out.push_str("> "),
            (false, "strong") => styles.push(if class.is_empty() { "strong" } else { "heading" }),
            (false, "em") => styles.push("em"),
            (false, "span") if class == "re-num" => styles.push("num"),
            (false, "div") if class == "re-label" => styles.push("label"),
            (true, "strong") | (true, "em") | (true, "span") => {
                styles.pop();
            }
            (true, "div") => {
                if styles.last() == Some(&"label") {
                    styles.pop();
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
    push_styled(&mut out, &unescape(&html[last..]), &styles);
    out
}

fn push_styled(out: &mut String, text: &str, styles: &[&str]) {
    if text.is_empty() {
        return;
    }
    let styled = match styles.last() {
        Some(&"heading") => text.bold().underline().to_string(),
        Some(&"strong") => text.bold().to_string(),
        Some(&"em") => text.italic().to_string(),
        Some(&"num") => text.cyan().to_string(),
        Some(&"label") => text.dimmed().to_string(),
        _ => text.to_string(),
    };
    out.push_str(&styled);
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Renders the overlay on a terminal.
///
/// Streamed explanation text is printed line by line once a line is
/// complete, so earlier output never has to be rewritten. Loading captions
/// go to a single status line on stderr.
pub struct TerminalSurface<W: Write + Send = std::io::Stdout> {
    out: W,
    printed: String,
    status_shown: bool,
}

impl TerminalSurface {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            printed: String::new(),
            status_shown: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn clear_status(&mut self) {
        if self.status_shown {
            eprint!("\r\x1b[2K");
            self.status_shown = false;
        }
    }

    fn write(&mut self, text: &str) {
        // Terminal write failures are not recoverable here.
        let _ = self.out.write_all(text.as_bytes());
        let _ = self.out.flush();
    }

    /// Print the newly completed lines of a growing explanation.
    fn print_stable(&mut self, text: &str) {
        let text = text.trim_end_matches('\n');
        let stable = match text.rfind('\n') {
            Some(end) => &text[..=end],
            None => return,
        };
        self.print_from(stable);
    }

    fn print_from(&mut self, text: &str) {
        if let Some(rest) = text.strip_prefix(self.printed.as_str()) {
            let rest = rest.to_string();
            self.write(&rest);
        } else {
            self.write("\n");
            self.write(text);
        }
        self.printed = text.to_string();
    }

    fn render(&mut self, html: &str) {
        match PanelKind::of(html) {
            PanelKind::Loading => {
                let caption = html_to_terminal(panel_body(html));
                eprint!("\r\x1b[2K{}", caption.dimmed());
                self.status_shown = true;
            }
            PanelKind::Streaming => {
                self.clear_status();
                let text = html_to_terminal(panel_body(html));
                self.print_stable(&text);
            }
            PanelKind::Result => {
                self.clear_status();
                if self.printed.is_empty() {
                    let text = html_to_terminal(html);
                    self.write(text.trim_end());
                } else {
                    let text = html_to_terminal(panel_body(html));
                    self.print_from(text.trim_end());
                }
                self.write("\n");
            }
            PanelKind::Error => {
                self.clear_status();
                let text = html_to_terminal(panel_body(html));
                self.write(&format!("{}\n", text.red()));
            }
            PanelKind::Other => {
                self.clear_status();
                let text = html_to_terminal(html);
                self.write(&text);
            }
        }
    }
}

impl<W: Write + Send> OverlaySurface for TerminalSurface<W> {
    fn show_affordance(&mut self, _position: Position) {}

    fn hide_affordance(&mut self) {}

    fn show_overlay(&mut self, html: &str) {
        self.printed.clear();
        self.render(html);
    }

    fn set_content(&mut self, html: &str) {
        self.render(html);
    }

    fn hide_overlay(&mut self) {
        self.clear_status();
    }
}
