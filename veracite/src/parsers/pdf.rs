//! PDF parsing.

use std::path::Path;

use regex::Regex;
use rustc_hash::FxHashMap;

use super::{ParseError, ParsedDocument, absolute_path};

pub fn parse_pdf(path: &Path) -> Result<ParsedDocument, ParseError> {
    let text = pdf_extract::extract_text(path).map_err(|source| ParseError::Pdf {
        path: path.display().to_string(),
        source,
    })?;
    let references = collect_references(&text)?;
    tracing::debug!(
        path = %path.display(),
        references = references.len(),
        "parsed pdf document"
    );
    Ok(ParsedDocument {
        text,
        references,
        source_path: absolute_path(path)?,
    })
}

/// Collects `[n] https://…` reference pairs, keyed `"[<n>]"`. PDF text
/// loses markdown's colon syntax, so a bare marker followed by a URL is
/// the only shape that survives extraction.
fn collect_references(text: &str) -> Result<FxHashMap<String, String>, ParseError> {
    let pattern =
        Regex::new(r"\[(\d+)\]\s*(https?://\S+)").map_err(|e| ParseError::Pattern {
            detail: e.to_string(),
        })?;

    let mut references = FxHashMap::default();
    for capture in pattern.captures_iter(text) {
        let (Some(id), Some(url)) = (capture.get(1), capture.get(2)) else {
            continue;
        };
        references.insert(format!("[{}]", id.as_str()), url.as_str().to_string());
    }
    Ok(references)
}
