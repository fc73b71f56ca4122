//! HTML text extraction.
//!
//! Reduces a page to its readable text: paragraphs inside `<article>` or
//! `<main>` when the page marks its content region, all paragraphs
//! otherwise, skipping navigation and boilerplate subtrees.

use std::path::Path;

use scraper::{ElementRef, Html, Selector};

use super::{ParseError, ParsedDocument, absolute_path, read_file};

/// Main text and title pulled from one HTML page.
#[derive(Debug, Clone)]
pub struct ExtractedPage {
    pub text: String,
    pub title: Option<String>,
}

pub async fn parse_html_file(path: &Path) -> Result<ParsedDocument, ParseError> {
    let html = read_file(path).await?;
    let page = extract_page(&html)?;
    tracing::debug!(
        path = %path.display(),
        title = page.title.as_deref().unwrap_or_default(),
        "parsed html document"
    );
    Ok(ParsedDocument {
        text: page.text,
        references: rustc_hash::FxHashMap::default(),
        source_path: format!("file://{}", absolute_path(path)?),
    })
}

/// Extracts the readable text and title from an HTML document.
///
/// # Errors
///
/// Only [`ParseError::Pattern`] for an unparseable selector.
pub fn extract_page(html: &str) -> Result<ExtractedPage, ParseError> {
    let document = Html::parse_document(html);

    let title_selector = selector("title")?;
    let title = document
        .select(&title_selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty());

    let paragraph_selector = selector("p")?;
    let content_selector = selector("article, main")?;

    let paragraphs: Vec<String> = match document.select(&content_selector).next() {
        Some(region) => region
            .select(&paragraph_selector)
            .filter_map(paragraph_text)
            .collect(),
        None => document
            .select(&paragraph_selector)
            .filter(|p| !inside_boilerplate(p))
            .filter_map(paragraph_text)
            .collect(),
    };

    Ok(ExtractedPage {
        text: paragraphs.join("\n\n"),
        title,
    })
}

fn selector(source: &str) -> Result<Selector, ParseError> {
    Selector::parse(source).map_err(|e| ParseError::Pattern {
        detail: e.to_string(),
    })
}

fn paragraph_text(paragraph: ElementRef) -> Option<String> {
    let text = paragraph.text().collect::<String>().trim().to_string();
    (!text.is_empty()).then_some(text)
}

fn inside_boilerplate(element: &ElementRef) -> bool {
    element.ancestors().any(|node| {
        node.value().as_element().is_some_and(|el| {
            matches!(
                el.name(),
                "nav" | "script" | "style" | "noscript" | "header" | "footer"
            )
        })
    })
}
