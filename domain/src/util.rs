//! Shared utility functions.

/// Truncate a string to approximately `max_bytes` without splitting a UTF-8
/// character boundary.
///
/// Used to keep selections and fragments short in log lines.
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Byte offset reached by moving `count` characters forward from `start`.
///
/// `start` must lie on a character boundary. The result is clamped to
/// `s.len()`, so repeated calls converge on the end of the string.
pub fn advance_chars(s: &str, start: usize, count: usize) -> usize {
    match s[start..].char_indices().nth(count) {
        Some((offset, _)) => start + offset,
        None => s.len(),
    }
}
