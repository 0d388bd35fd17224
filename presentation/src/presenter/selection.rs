//! Selection capture and affordance placement.

use crate::surface::Position;

/// Horizontal offset that centers the affordance under the selection.
const AFFORDANCE_HALF_WIDTH: f64 = 30.0;
/// Gap between the selection's bottom edge and the affordance.
const AFFORDANCE_GAP: f64 = 10.0;

/// Viewport-relative bounding box of a selection.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SelectionRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl SelectionRect {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// The live selection as read on pointer release.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSnapshot {
    pub text: String,
    pub rect: SelectionRect,
    pub scroll_y: f64,
}

impl SelectionSnapshot {
    pub fn new(text: impl Into<String>, rect: SelectionRect, scroll_y: f64) -> Self {
        Self {
            text: text.into(),
            rect,
            scroll_y,
        }
    }
}

/// What the affordance should do after a pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AffordanceChange {
    Show(Position),
    Hide,
}

pub fn affordance_position(rect: &SelectionRect, scroll_y: f64) -> Position {
    Position {
        x: rect.left + rect.width / 2.0 - AFFORDANCE_HALF_WIDTH,
        y: rect.bottom() + scroll_y + AFFORDANCE_GAP,
    }
}

/// Remembers the last non-empty selection.
///
/// Clicking the affordance clears the live selection before the click is
/// handled, so the text is captured on release instead of read at click
/// time. It is kept until a new non-empty selection replaces it.
#[derive(Debug, Default)]
pub struct SelectionTracker {
    remembered: Option<String>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer_up(&mut self, selection: Option<&SelectionSnapshot>) -> AffordanceChange {
        match selection {
            Some(snapshot) if !snapshot.text.trim().is_empty() => {
                self.remembered = Some(snapshot.text.trim().to_string());
                AffordanceChange::Show(affordance_position(&snapshot.rect, snapshot.scroll_y))
            }
            _ => AffordanceChange::Hide,
        }
    }

    pub fn pointer_down(&mut self) -> AffordanceChange {
        AffordanceChange::Hide
    }

    pub fn remembered(&self) -> Option<&str> {
        self.remembered.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> SelectionRect {
        SelectionRect {
            left: 100.0,
            top: 200.0,
            width: 80.0,
            height: 20.0,
        }
    }

    #[test]
    fn affordance_is_centered_below_selection() {
        assert_eq!(
            affordance_position(&rect(), 500.0),
            Position { x: 110.0, y: 730.0 }
        );
    }

    #[test]
    fn non_empty_selection_is_remembered() {
        let mut tracker = SelectionTracker::new();
        let change = tracker.pointer_up(Some(&SelectionSnapshot::new("  entropy ", rect(), 0.0)));

        assert_eq!(change, AffordanceChange::Show(Position { x: 110.0, y: 230.0 }));
        assert_eq!(tracker.remembered(), Some("entropy"));
    }

    #[test]
    fn empty_selection_hides_but_keeps_memory() {
        let mut tracker = SelectionTracker::new();
        tracker.pointer_up(Some(&SelectionSnapshot::new("entropy", rect(), 0.0)));

        assert_eq!(tracker.pointer_down(), AffordanceChange::Hide);
        assert_eq!(
            tracker.pointer_up(Some(&SelectionSnapshot::new("   ", rect(), 0.0))),
            AffordanceChange::Hide
        );
        assert_eq!(tracker.pointer_up(None), AffordanceChange::Hide);
        assert_eq!(tracker.remembered(), Some("entropy"));
    }
}
