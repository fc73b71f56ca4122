//! Report rendering.
//!
//! Three renderings of the same ordered result sequence:
//!
//! - [`format_json_report`]: machine-readable interchange format
//! - [`format_markdown_report`]: report file for humans
//! - [`TerminalReporter`]: ANSI-colored terminal output
//!
//! All three share the summary shape: `total_citations` plus one count per
//! verdict that actually occurred, in verdict declaration order.

mod json;
mod markdown;
mod terminal;

use serde::Serialize;

use crate::models::{Verdict, VerificationResult};

pub use json::{JsonReport, format_json_report, generate_json_report};
pub use markdown::format_markdown_report;
pub use terminal::{FormatterMode, TerminalReporter};

/// Verdict tallies over one report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub total_citations: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_supported: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partial: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inconclusive: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_unavailable: Option<usize>,
}

impl ReportSummary {
    #[must_use]
    pub fn from_results(results: &[VerificationResult]) -> Self {
        let count = |verdict: Verdict| {
            let n = results.iter().filter(|r| r.verdict == verdict).count();
            (n > 0).then_some(n)
        };
        Self {
            total_citations: results.len(),
            supported: count(Verdict::Supported),
            not_supported: count(Verdict::NotSupported),
            partial: count(Verdict::Partial),
            inconclusive: count(Verdict::Inconclusive),
            source_unavailable: count(Verdict::SourceUnavailable),
        }
    }
}

/// One claim's outcome in the interchange format. `source_url` and
/// `source_quote` serialize as explicit nulls when absent.
#[derive(Debug, Clone, Serialize)]
pub struct ClaimReport {
    pub claim: String,
    pub source_url: Option<String>,
    pub verdict: Verdict,
    pub confidence: f32,
    pub explanation: String,
    pub source_quote: Option<String>,
}

impl From<&VerificationResult> for ClaimReport {
    fn from(result: &VerificationResult) -> Self {
        Self {
            claim: result.claim.text.clone(),
            source_url: result.claim.citation_url.clone(),
            verdict: result.verdict,
            confidence: result.confidence,
            explanation: result.explanation.clone(),
            source_quote: result.source_quote.clone(),
        }
    }
}

pub(crate) fn verdict_symbol(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Supported => "[+]",
        Verdict::NotSupported => "[X]",
        Verdict::Partial => "[!]",
        Verdict::Inconclusive => "[?]",
        Verdict::SourceUnavailable => "[-]",
    }
}

/// `not_supported` rendered as `Not Supported`.
pub(crate) fn verdict_title(verdict: Verdict) -> String {
    verdict
        .to_string()
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Nonzero verdict tallies in declaration order.
pub(crate) fn verdict_counts(results: &[VerificationResult]) -> Vec<(Verdict, usize)> {
    Verdict::ALL
        .into_iter()
        .filter_map(|verdict| {
            let count = results.iter().filter(|r| r.verdict == verdict).count();
            (count > 0).then_some((verdict, count))
        })
        .collect()
}

/// Confidence as a whole percent (`0.9` renders `90%`).
pub(crate) fn percent(confidence: f32) -> String {
    format!("{:.0}%", f64::from(confidence) * 100.0)
}
