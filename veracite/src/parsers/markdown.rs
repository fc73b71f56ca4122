//! Markdown parsing.
//!
//! The text is the raw file contents; markdown markup survives into the
//! extraction prompt unchanged. References come from reference-style
//! definitions (`[1]: https://…`) and inline `[1] https://…` pairs.

use std::path::Path;

use regex::Regex;
use rustc_hash::FxHashMap;

use super::{ParseError, ParsedDocument, absolute_path, read_file};

pub async fn parse_markdown(path: &Path) -> Result<ParsedDocument, ParseError> {
    let text = read_file(path).await?;
    let references = collect_references(&text)?;
    tracing::debug!(
        path = %path.display(),
        references = references.len(),
        "parsed markdown document"
    );
    Ok(ParsedDocument {
        text,
        references,
        source_path: absolute_path(path)?,
    })
}

/// Collects the reference map, keyed `"[<n>]"`.
///
/// Reference-style definitions win over inline pairs when both bind the
/// same number.
fn collect_references(text: &str) -> Result<FxHashMap<String, String>, ParseError> {
    let inline = pattern(r"\[(\d+)\]\s+(https?://\S+)")?;
    let definition = pattern(r"(?m)^\s*\[(\d+)\]:\s*(https?://\S+)")?;

    let mut references = FxHashMap::default();
    for regex in [inline, definition] {
        for capture in regex.captures_iter(text) {
            let (Some(id), Some(url)) = (capture.get(1), capture.get(2)) else {
                continue;
            };
            references.insert(format!("[{}]", id.as_str()), url.as_str().to_string());
        }
    }
    Ok(references)
}

fn pattern(source: &str) -> Result<Regex, ParseError> {
    Regex::new(source).map_err(|e| ParseError::Pattern {
        detail: e.to_string(),
    })
}
