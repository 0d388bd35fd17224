//! Decoding of the streaming response body.
//!
//! The body is a sequence of newline-delimited records, each optionally
//! prefixed with `data:` (server-sent events framing) and terminated by an
//! optional `[DONE]` sentinel. Records may arrive split across reads, so
//! [`LineDecoder`] buffers raw bytes until a full line is available. Lines
//! are decoded as UTF-8 only once complete, so a multi-byte character split
//! across two reads is reassembled intact.

use explainer_domain::{GenerateContentResponse, extract_fragment};

/// Literal end-of-stream marker.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Accumulates body bytes and yields complete lines.
#[derive(Debug, Default)]
pub struct LineDecoder {
    buffer: Vec<u8>,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one read's worth of bytes; returns every line it completed.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);

        let mut lines = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line[..line.len() - 1]);
            lines.push(line.trim_end_matches('\r').to_string());
        }
        lines
    }

    /// Flush the trailing partial line at end of body, if any.
    pub fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.buffer);
        let line = String::from_utf8_lossy(&rest).trim_end_matches('\r').to_string();
        Some(line)
    }

    /// Bytes held back waiting for a newline.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}

/// What one line of the stream amounts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamRecord {
    /// A text fragment to forward.
    Fragment(String),
    /// A valid record without text, a blank line, or SSE framing.
    Empty,
    /// The sentinel terminator.
    Done,
    /// The prompt was blocked; carries the block reason.
    Blocked(String),
    /// Unparsable data; skipped by the caller.
    Invalid,
}

/// Classify one complete line.
pub fn parse_stream_line(line: &str) -> StreamRecord {
    let line = line.trim();
    if line.is_empty() || line.starts_with(':') {
        return StreamRecord::Empty;
    }
    if ["event:", "id:", "retry:"]
        .iter()
        .any(|field| line.starts_with(field))
    {
        return StreamRecord::Empty;
    }

    let payload = line
        .strip_prefix("data:")
        .map(str::trim_start)
        .unwrap_or(line);

    if payload == DONE_SENTINEL {
        return StreamRecord::Done;
    }

    match serde_json::from_str::<GenerateContentResponse>(payload) {
        Ok(record) => {
            if let Some(reason) = record.block_reason() {
                return StreamRecord::Blocked(reason.to_string());
            }
            match extract_fragment(&record) {
                Some(fragment) => StreamRecord::Fragment(fragment),
                None => StreamRecord::Empty,
            }
        }
        Err(_) => StreamRecord::Invalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(text: &str) -> String {
        serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": text}], "role": "model"}}]
        })
        .to_string()
    }

    #[test]
    fn decoder_buffers_split_lines() {
        let mut decoder = LineDecoder::new();
        let line = format!("data: {}\n", record("hello"));
        let (first, second) = line.as_bytes().split_at(10);

        assert!(decoder.push(first).is_empty());
        assert_eq!(decoder.pending(), 10);

        let lines = decoder.push(second);
        assert_eq!(lines.len(), 1);
        assert_eq!(parse_stream_line(&lines[0]), StreamRecord::Fragment("hello".into()));
        assert_eq!(decoder.pending(), 0);
    }

    #[test]
    fn decoder_reassembles_split_multibyte_char() {
        let mut decoder = LineDecoder::new();
        let bytes = "あい\n".as_bytes();
        // Split inside the first character.
        assert!(decoder.push(&bytes[..1]).is_empty());
        assert_eq!(decoder.push(&bytes[1..]), vec!["あい".to_string()]);
    }

    #[test]
    fn decoder_handles_crlf_and_multiple_lines() {
        let mut decoder = LineDecoder::new();
        let lines = decoder.push(b"a\r\n\r\nb\r\nc");
        assert_eq!(lines, vec!["a", "", "b"]);
        assert_eq!(decoder.finish(), Some("c".to_string()));
        assert_eq!(decoder.finish(), None);
    }

    #[test]
    fn prefix_is_optional() {
        assert_eq!(
            parse_stream_line(&record("plain")),
            StreamRecord::Fragment("plain".into())
        );
        assert_eq!(
            parse_stream_line(&format!("data:{}", record("tight"))),
            StreamRecord::Fragment("tight".into())
        );
    }

    #[test]
    fn sentinel_and_framing() {
        assert_eq!(parse_stream_line("data: [DONE]"), StreamRecord::Done);
        assert_eq!(parse_stream_line("[DONE]"), StreamRecord::Done);
        assert_eq!(parse_stream_line(""), StreamRecord::Empty);
        assert_eq!(parse_stream_line(": keep-alive"), StreamRecord::Empty);
        assert_eq!(parse_stream_line("event: message"), StreamRecord::Empty);
    }

    #[test]
    fn malformed_lines_are_invalid() {
        assert_eq!(parse_stream_line("data: {\"candidates\": [{"), StreamRecord::Invalid);
        assert_eq!(parse_stream_line("garbage"), StreamRecord::Invalid);
    }

    #[test]
    fn blocked_record() {
        let line = serde_json::json!({"promptFeedback": {"blockReason": "OTHER"}}).to_string();
        assert_eq!(
            parse_stream_line(&format!("data: {}", line)),
            StreamRecord::Blocked("OTHER".into())
        );
    }

    #[test]
    fn record_without_text_is_empty() {
        let line = serde_json::json!({
            "candidates": [{"finishReason": "STOP"}],
            "usageMetadata": {"totalTokenCount": 12}
        })
        .to_string();
        assert_eq!(parse_stream_line(&line), StreamRecord::Empty);
    }

    #[test]
    fn valid_fragments_survive_interleaved_garbage() {
        let body = format!(
            "data: {}\n\ngarbage\ndata: {{broken\ndata: {}\n: ping\ndata: {}\ndata: [DONE]\n",
            record("one "),
            record("two "),
            record("three")
        );

        let mut decoder = LineDecoder::new();
        let mut assembled = String::new();
        // Feed in awkward 7-byte reads.
        for chunk in body.as_bytes().chunks(7) {
            for line in decoder.push(chunk) {
                if let StreamRecord::Fragment(text) = parse_stream_line(&line) {
                    assembled.push_str(&text);
                }
            }
        }
        assert_eq!(assembled, "one two three");
    }
}
