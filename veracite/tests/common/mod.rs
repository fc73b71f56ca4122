//! Shared fixtures for the integration suites.

use std::io::Write;

/// Wraps `text` in the messages-endpoint reply shape the model client
/// expects: one text content block.
pub fn anthropic_reply(text: &str) -> serde_json::Value {
    serde_json::json!({
        "content": [{ "type": "text", "text": text }]
    })
}

/// Writes `content` to a temp file with a `.md` suffix.
pub fn write_markdown(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".md")
        .tempfile()
        .expect("create temp markdown file");
    file.write_all(content.as_bytes())
        .expect("write temp markdown file");
    file
}
