//! Document parsers.
//!
//! Format adapters that turn a source (local file or URL) into a
//! [`ParsedDocument`]: the raw text to scan for claims plus the reference
//! map collected along the way. Markdown and PDF carry `[1]`-style
//! reference definitions; HTML and URL documents have none.

mod html;
mod markdown;
mod pdf;

use std::path::Path;

use miette::Diagnostic;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::fetch::SourceFetcher;
use crate::models::FetchStatus;

pub use html::{ExtractedPage, extract_page};

/// Parsing failures. These abort a run; a document that cannot be read
/// leaves nothing to verify.
#[derive(Debug, Error, Diagnostic)]
pub enum ParseError {
    #[error("File not found: {path}")]
    #[diagnostic(
        code(veracite::parsers::file_not_found),
        help("Pass a path to an existing .md, .html or .pdf file, or a full URL.")
    )]
    FileNotFound { path: String },

    #[error("Failed to fetch url: {status}")]
    #[diagnostic(code(veracite::parsers::url_fetch))]
    UrlFetch { status: FetchStatus },

    #[error("no text could be extracted from {url}")]
    #[diagnostic(code(veracite::parsers::empty_extraction))]
    EmptyExtraction { url: String },

    #[error("could not read {path}")]
    #[diagnostic(code(veracite::parsers::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not extract text from {path}")]
    #[diagnostic(code(veracite::parsers::pdf))]
    Pdf {
        path: String,
        #[source]
        source: pdf_extract::OutputError,
    },

    #[error("invalid extraction pattern: {detail}")]
    #[diagnostic(code(veracite::parsers::pattern))]
    Pattern { detail: String },
}

/// A document reduced to verifiable material.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// Text handed to the claim extractor.
    pub text: String,
    /// Reference map: `"[1]"` to the URL it points at.
    pub references: FxHashMap<String, String>,
    /// Absolute path or URL the document came from.
    pub source_path: String,
}

/// Parses a source into a [`ParsedDocument`].
///
/// `http(s)://` sources are fetched and reduced to their main text.
/// Local paths dispatch on extension: `.md`, `.html`/`.htm`, `.pdf`;
/// anything else is read as plain text with no references.
///
/// # Errors
///
/// [`ParseError::FileNotFound`] for a missing local file,
/// [`ParseError::UrlFetch`] for an unreachable URL.
pub async fn parse_document(source: &str) -> Result<ParsedDocument, ParseError> {
    if source.starts_with("http://") || source.starts_with("https://") {
        return parse_url(source).await;
    }

    let path = Path::new(source);
    if !path.exists() {
        return Err(ParseError::FileNotFound {
            path: source.to_string(),
        });
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("md") => markdown::parse_markdown(path).await,
        Some("html" | "htm") => html::parse_html_file(path).await,
        Some("pdf") => pdf::parse_pdf(path),
        _ => parse_plain_text(path).await,
    }
}

async fn parse_url(url: &str) -> Result<ParsedDocument, ParseError> {
    let fetched = SourceFetcher::new().fetch(url).await;
    if !fetched.is_success() {
        return Err(ParseError::UrlFetch {
            status: fetched.fetch_status,
        });
    }

    let body = fetched.content.unwrap_or_default();
    let page = html::extract_page(&body)?;
    if page.text.is_empty() {
        return Err(ParseError::EmptyExtraction {
            url: url.to_string(),
        });
    }
    if let Some(title) = &page.title {
        tracing::debug!(%url, title, "parsed url document");
    }

    Ok(ParsedDocument {
        text: page.text,
        references: FxHashMap::default(),
        source_path: url.to_string(),
    })
}

async fn parse_plain_text(path: &Path) -> Result<ParsedDocument, ParseError> {
    let text = read_file(path).await?;
    Ok(ParsedDocument {
        text,
        references: FxHashMap::default(),
        source_path: absolute_path(path)?,
    })
}

pub(crate) async fn read_file(path: &Path) -> Result<String, ParseError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ParseError::Io {
            path: path.display().to_string(),
            source,
        })
}

pub(crate) fn absolute_path(path: &Path) -> Result<String, ParseError> {
    std::path::absolute(path)
        .map(|p| p.display().to_string())
        .map_err(|source| ParseError::Io {
            path: path.display().to_string(),
            source,
        })
}
