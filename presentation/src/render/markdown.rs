//! Markdown-like formatting for model output.
//!
//! Renders the subset the model actually produces: `#`/`##` headings,
//! numbered list markers, `**strong**` and `*emphasis*`, paragraphs and line
//! breaks. The input is escaped first, so nothing from the model reaches the
//! surface as markup. Re-running on a longer buffer is how partial output is
//! displayed; an unmatched marker stays literal until its partner arrives.

use regex::Regex;
use std::sync::LazyLock;

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})[ \t]+(.*?)[ \t]*$").expect("valid heading pattern"));

static NUMBERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([ \t]*)(\d{1,3})\.[ \t]+").expect("valid list pattern"));

/// Escape text for insertion as HTML content or attribute value.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the full accumulated text as an HTML fragment.
///
/// Pure: the same input always yields the same output, and every opened
/// element is closed.
pub fn format_markdown(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n");
    let escaped = escape_html(&normalized);

    let mut html = String::new();
    let mut paragraph: Vec<String> = Vec::new();

    for line in escaped.split('\n') {
        if line.trim().is_empty() {
            flush_paragraph(&mut html, &mut paragraph);
            continue;
        }
        paragraph.push(format_line(line));
    }
    flush_paragraph(&mut html, &mut paragraph);

    html
}

fn flush_paragraph(html: &mut String, lines: &mut Vec<String>) {
    if lines.is_empty() {
        return;
    }
    html.push_str("<p>");
    html.push_str(&lines.join("<br>"));
    html.push_str("</p>");
    lines.clear();
}

fn format_line(line: &str) -> String {
    if let Some(caps) = HEADING.captures(line) {
        let class = if caps[1].len() == 1 { "re-h1" } else { "re-h2" };
        return format!(
            "<strong class=\"{}\">{}</strong>",
            class,
            apply_emphasis(&caps[2])
        );
    }

    if let Some(caps) = NUMBERED.captures(line) {
        let rest = &line[caps[0].len()..];
        return format!(
            "{}<span class=\"re-num\">{}.</span> {}",
            &caps[1],
            &caps[2],
            apply_emphasis(rest)
        );
    }

    apply_emphasis(line)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Piece<'a> {
    Text(&'a str),
    Stars(usize),
}

/// Split a line into literal text and runs of `*`.
fn pieces(line: &str) -> Vec<Piece<'_>> {
    let mut out = Vec::new();
    let bytes = line.as_bytes();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'*' {
            i += 1;
            continue;
        }
        if start < i {
            out.push(Piece::Text(&line[start..i]));
        }
        let run_start = i;
        while i < bytes.len() && bytes[i] == b'*' {
            i += 1;
        }
        out.push(Piece::Stars(i - run_start));
        start = i;
    }
    if start < line.len() {
        out.push(Piece::Text(&line[start..]));
    }
    out
}

/// Index pairs of marker runs of exactly `width` stars.
///
/// Markers pair up in order; a trailing odd one stays literal. A pair
/// with nothing between the markers is not emphasis.
fn paired(pieces: &[Piece<'_>], width: usize) -> Vec<(usize, usize)> {
    let candidates: Vec<usize> = pieces
        .iter()
        .enumerate()
        .filter(|(_, p)| **p == Piece::Stars(width))
        .map(|(i, _)| i)
        .collect();

    candidates
        .chunks_exact(2)
        .filter(|pair| pair[1] > pair[0] + 1)
        .map(|pair| (pair[0], pair[1]))
        .collect()
}

fn apply_emphasis(line: &str) -> String {
    let pieces = pieces(line);
    let strong = paired(&pieces, 2);
    let boundaries: Vec<usize> = strong.iter().flat_map(|&(a, b)| [a, b]).collect();

    // An em pair straddling a strong boundary would misnest the tags.
    let em: Vec<usize> = paired(&pieces, 1)
        .into_iter()
        .filter(|&(open, close)| !boundaries.iter().any(|&b| open < b && b < close))
        .flat_map(|(a, b)| [a, b])
        .collect();

    let mut out = String::with_capacity(line.len() + 16);
    let mut strong_open = false;
    let mut em_open = false;

    for (i, piece) in pieces.iter().enumerate() {
        match piece {
            Piece::Text(text) => out.push_str(text),
            Piece::Stars(_) if boundaries.contains(&i) => {
                out.push_str(if strong_open { "</strong>" } else { "<strong>" });
                strong_open = !strong_open;
            }
            Piece::Stars(_) if em.contains(&i) => {
                out.push_str(if em_open { "</em>" } else { "<em>" });
                em_open = !em_open;
            }
            Piece::Stars(n) => out.push_str(&"*".repeat(*n)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_before_formatting() {
        assert_eq!(
            format_markdown("<script>alert('x')</script> & **b**"),
            "<p>&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; <strong>b</strong></p>"
        );
    }

    #[test]
    fn headings_become_block_labels() {
        assert_eq!(
            format_markdown("# Title\n## Section\n### Deep"),
            "<p><strong class=\"re-h1\">Title</strong><br>\
             <strong class=\"re-h2\">Section</strong><br>\
             <strong class=\"re-h2\">Deep</strong></p>"
        );
    }

    #[test]
    fn hash_without_space_is_not_a_heading() {
        assert_eq!(format_markdown("#hashtag"), "<p>#hashtag</p>");
    }

    #[test]
    fn numbered_markers_are_wrapped() {
        assert_eq!(
            format_markdown("1. First\n2. *Second*"),
            "<p><span class=\"re-num\">1.</span> First<br>\
             <span class=\"re-num\">2.</span> <em>Second</em></p>"
        );
    }

    #[test]
    fn blank_lines_split_paragraphs() {
        assert_eq!(
            format_markdown("one\ntwo\n\n\nthree\r\n"),
            "<p>one<br>two</p><p>three</p>"
        );
        assert_eq!(format_markdown(""), "");
        assert_eq!(format_markdown("\n \n"), "");
    }

    #[test]
    fn unmatched_strong_stays_literal() {
        let partial = format_markdown("Some **bold and *x* more");
        assert_eq!(partial, "<p>Some **bold and <em>x</em> more</p>");

        let complete = format_markdown("Some **bold** and *x* more");
        assert_eq!(
            complete,
            "<p>Some <strong>bold</strong> and <em>x</em> more</p>"
        );
    }

    #[test]
    fn interleaved_markers_never_misnest() {
        assert_eq!(
            format_markdown("**a *b** c*"),
            "<p><strong>a *b</strong> c*</p>"
        );
        assert_eq!(
            format_markdown("*a **b* c**"),
            "<p>*a <strong>b* c</strong></p>"
        );
        assert_eq!(
            format_markdown("**a *b* c**"),
            "<p><strong>a <em>b</em> c</strong></p>"
        );
    }

    #[test]
    fn unmatched_strong_does_not_style_later_lines() {
        let html = format_markdown("Start **open\nnext line **closed**");
        assert_eq!(
            html,
            "<p>Start **open<br>next line <strong>closed</strong></p>"
        );
    }

    #[test]
    fn rerendering_with_partner_styles_correctly() {
        let mut buffer = String::from("The **key");
        assert!(!format_markdown(&buffer).contains("<strong>"));
        buffer.push_str(" idea** here");
        assert_eq!(
            format_markdown(&buffer),
            "<p>The <strong>key idea</strong> here</p>"
        );
    }

    #[test]
    fn odd_runs_and_empty_pairs_are_literal() {
        assert_eq!(format_markdown("a *** b"), "<p>a *** b</p>");
        assert_eq!(format_markdown("2 ** 3"), "<p>2 ** 3</p>");
        assert_eq!(format_markdown("****"), "<p>****</p>");
    }

    #[test]
    fn multibyte_text_is_preserved() {
        assert_eq!(
            format_markdown("## 光合成\n**葉緑体**で行われる"),
            "<p><strong class=\"re-h2\">光合成</strong><br><strong>葉緑体</strong>で行われる</p>"
        );
    }

    #[test]
    fn formatting_is_idempotent_on_fixed_input() {
        let input = "# T & <u>\n\n1. **a** *b*\n2. c **d\n3. **x *y** z*\n\n<tag> & \"q\"";
        let expected = "<p><strong class=\"re-h1\">T &amp; &lt;u&gt;</strong></p>\
             <p><span class=\"re-num\">1.</span> <strong>a</strong> <em>b</em><br>\
             <span class=\"re-num\">2.</span> c **d<br>\
             <span class=\"re-num\">3.</span> <strong>x *y</strong> z*</p>\
             <p>&lt;tag&gt; &amp; &quot;q&quot;</p>";

        let first = format_markdown(input);
        assert_eq!(first, expected);
        assert_eq!(format_markdown(input), first);
    }

    #[test]
    fn every_paragraph_is_closed() {
        let html = format_markdown("a\n\nb\n\n**c");
        assert_eq!(html.matches("<p>").count(), html.matches("</p>").count());
    }
}
