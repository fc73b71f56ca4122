//! Byte-budget text truncation that never splits a UTF-8 character.

/// Returns at most `max_bytes` of `text`, cut back to a char boundary.
pub fn truncate_to_boundary(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
