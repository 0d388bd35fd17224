//! HTML panels shown in the overlay.

use super::markdown::escape_html;

/// Glyph appended to the loading caption while typing is simulated.
pub const TYPING_CURSOR: char = '▌';

pub const LOADING_CLASS: &str = "re-loading";
pub const STREAMING_CLASS: &str = "re-streaming";
pub const RESULT_CLASS: &str = "re-result";
pub const ERROR_CLASS: &str = "re-error";

const EXPLANATION_OPEN: &str = "<div class=\"re-explanation\">";
const EXPLANATION_CLOSE: &str = "</div></div>";

/// Loading caption with the typing cursor.
pub fn loading_panel(caption: &str) -> String {
    format!(
        "<div class=\"{}\">{}{}</div>",
        LOADING_CLASS,
        escape_html(caption),
        TYPING_CURSOR
    )
}

/// Partially received explanation. `body_html` is already formatted.
pub fn streaming_panel(body_html: &str) -> String {
    format!(
        "<div class=\"{}\">{}{}</div>",
        STREAMING_CLASS, body_html, TYPING_CURSOR
    )
}

/// Final panel: the selection quoted verbatim, then the explanation.
pub fn result_panel(selected_text: &str, explanation_html: &str) -> String {
    format!(
        "<div class=\"{}\">\
         <div class=\"re-label\">Selected text</div>\
         <blockquote class=\"re-quote\">{}</blockquote>\
         <div class=\"re-label\">Explanation</div>\
         {}{}{}",
        RESULT_CLASS,
        escape_html(selected_text),
        EXPLANATION_OPEN,
        explanation_html,
        EXPLANATION_CLOSE
    )
}

pub fn error_panel(message: &str) -> String {
    format!(
        "<div class=\"{}\">Error: {}</div>",
        ERROR_CLASS,
        escape_html(message)
    )
}

/// Which panel a piece of overlay HTML is, by its root class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    Loading,
    Streaming,
    Result,
    Error,
    Other,
}

impl PanelKind {
    pub fn of(html: &str) -> Self {
        let root = html.split('>').next().unwrap_or_default();
        let has = |class: &str| root.contains(&format!("class=\"{}\"", class));
        if has(LOADING_CLASS) {
            PanelKind::Loading
        } else if has(STREAMING_CLASS) {
            PanelKind::Streaming
        } else if has(RESULT_CLASS) {
            PanelKind::Result
        } else if has(ERROR_CLASS) {
            PanelKind::Error
        } else {
            PanelKind::Other
        }
    }
}

/// Inner HTML of a panel produced by the functions above.
///
/// For the result panel this is the explanation alone, without the quote.
pub fn panel_body(html: &str) -> &str {
    match PanelKind::of(html) {
        PanelKind::Result => html
            .find(EXPLANATION_OPEN)
            .map(|start| &html[start + EXPLANATION_OPEN.len()..])
            .and_then(|rest| rest.strip_suffix(EXPLANATION_CLOSE))
            .unwrap_or(html),
        PanelKind::Streaming => html
            .split_once('>')
            .map(|(_, rest)| rest)
            .and_then(|rest| rest.strip_suffix("</div>"))
            .and_then(|rest| rest.strip_suffix(TYPING_CURSOR))
            .unwrap_or(html),
        PanelKind::Loading | PanelKind::Error => html
            .split_once('>')
            .map(|(_, rest)| rest)
            .and_then(|rest| rest.strip_suffix("</div>"))
            .unwrap_or(html),
        PanelKind::Other => html,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::markdown::format_markdown;

    #[test]
    fn result_panel_quotes_selection_escaped() {
        let html = result_panel("a < b && \"c\"", &format_markdown("**Yes**"));
        assert!(html.contains(
            "<blockquote class=\"re-quote\">a &lt; b &amp;&amp; &quot;c&quot;</blockquote>"
        ));
        assert!(html.contains("<p><strong>Yes</strong></p>"));
        assert_eq!(PanelKind::of(&html), PanelKind::Result);
        assert_eq!(panel_body(&html), "<p><strong>Yes</strong></p>");
    }

    #[test]
    fn error_panel_escapes_message() {
        let html = error_panel("<b>bad</b>");
        assert_eq!(
            html,
            "<div class=\"re-error\">Error: &lt;b&gt;bad&lt;/b&gt;</div>"
        );
        assert_eq!(PanelKind::of(&html), PanelKind::Error);
    }

    #[test]
    fn loading_and_streaming_carry_cursor() {
        let loading = loading_panel("Thinking");
        assert!(loading.ends_with("Thinking▌</div>"));
        assert_eq!(PanelKind::of(&loading), PanelKind::Loading);

        let streaming = streaming_panel("<p>partial</p>");
        assert_eq!(PanelKind::of(&streaming), PanelKind::Streaming);
        assert_eq!(panel_body(&streaming), "<p>partial</p>");
    }

    #[test]
    fn unknown_html_is_other() {
        assert_eq!(PanelKind::of("<p>x</p>"), PanelKind::Other);
        assert_eq!(panel_body("<p>x</p>"), "<p>x</p>");
    }
}
