//! JSON report.

use serde::Serialize;

use crate::models::VerificationResult;
use crate::report::{ClaimReport, ReportSummary};

/// The interchange format: summary plus per-claim records, in input order.
#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub summary: ReportSummary,
    pub results: Vec<ClaimReport>,
}

#[must_use]
pub fn generate_json_report(results: &[VerificationResult]) -> JsonReport {
    JsonReport {
        summary: ReportSummary::from_results(results),
        results: results.iter().map(ClaimReport::from).collect(),
    }
}

/// Renders the report pretty-printed with two-space indentation.
///
/// # Errors
///
/// Propagates `serde_json` serialization failures.
pub fn format_json_report(results: &[VerificationResult]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&generate_json_report(results))
}
