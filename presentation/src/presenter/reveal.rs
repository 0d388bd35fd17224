//! Local reveal-by-character over an already received explanation.

use explainer_domain::util::advance_chars;

/// Reveals a fixed text a few characters per tick.
#[derive(Debug, Clone)]
pub struct CharacterReveal {
    text: String,
    shown: usize,
    chars_per_tick: usize,
}

impl CharacterReveal {
    pub fn new(text: impl Into<String>, chars_per_tick: usize) -> Self {
        Self {
            text: text.into(),
            shown: 0,
            chars_per_tick: chars_per_tick.max(1),
        }
    }

    /// Reveal the next characters. `None` once everything is shown.
    pub fn next_frame(&mut self) -> Option<&str> {
        if self.is_done() {
            return None;
        }
        self.shown = advance_chars(&self.text, self.shown, self.chars_per_tick);
        Some(&self.text[..self.shown])
    }

    pub fn is_done(&self) -> bool {
        self.shown >= self.text.len()
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
