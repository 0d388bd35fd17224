//! Simulated typing shown while waiting for the first content.

use crate::render::overlay::loading_panel;

const CAPTIONS: [&str; 3] = [
    "Reading the selection",
    "Generating explanation",
    "Choosing the right words",
];

const MAX_DOTS: usize = 3;

/// Frame sequence for the loading panel.
///
/// Each caption is shown with one to three trailing dots before moving on
/// to the next; the sequence repeats.
#[derive(Debug, Default, Clone)]
pub struct TypingSimulation {
    tick: usize,
}

impl TypingSimulation {
    pub fn new() -> Self {
        Self::default()
    }

    /// The frame for the current tick, without advancing.
    pub fn frame(&self) -> String {
        let caption = CAPTIONS[(self.tick / MAX_DOTS) % CAPTIONS.len()];
        let dots = ".".repeat(self.tick % MAX_DOTS + 1);
        loading_panel(&format!("{}{}", caption, dots))
    }

    /// Advance one tick and return the new frame.
    pub fn advance(&mut self) -> String {
        self.tick = self.tick.wrapping_add(1);
        self.frame()
    }
}
