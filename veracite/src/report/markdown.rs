//! Markdown report.

use crate::models::VerificationResult;
use crate::report::{percent, verdict_counts, verdict_symbol, verdict_title};

/// Renders the results as a markdown report.
///
/// Sections: a summary with verdict tallies, then one block per result
/// separated by rules. Empty input renders a single notice line.
#[must_use]
pub fn format_markdown_report(results: &[VerificationResult]) -> String {
    if results.is_empty() {
        return "No verifiable citations found.".to_string();
    }

    let mut lines: Vec<String> = Vec::new();

    lines.push("# Citation Verification Report\n".to_string());
    lines.push("## Summary\n".to_string());

    lines.push(format!("- **Total Citations**: {}", results.len()));
    for (verdict, count) in verdict_counts(results) {
        lines.push(format!(
            "- {} **{}**: {count}",
            verdict_symbol(verdict),
            verdict_title(verdict)
        ));
    }

    lines.push("\n## Detailed Results\n".to_string());

    for (i, result) in results.iter().enumerate() {
        lines.push(format!(
            "### {}. {} {}",
            i + 1,
            verdict_symbol(result.verdict),
            result.verdict.to_string().to_uppercase()
        ));
        lines.push(format!(
            "\n**Confidence**: {}\n",
            percent(result.confidence)
        ));
        lines.push(format!("**Claim**: {}\n", result.claim.text));

        if let Some(url) = non_empty(result.claim.citation_url.as_deref()) {
            lines.push(format!("**Source**: {url}\n"));
        }

        lines.push(format!("**Explanation**: {}\n", result.explanation));

        if let Some(quote) = non_empty(result.source_quote.as_deref()) {
            lines.push(format!("**Quote**: \"{quote}\"\n"));
        }

        lines.push("---\n".to_string());
    }

    lines.join("\n")
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Verdict;
    use crate::report::fixtures;

    #[test]
    fn renders_the_full_layout() {
        let results = vec![fixtures::result(Verdict::Supported, 0.9)];
        let expected = concat!(
            "# Citation Verification Report\n",
            "\n",
            "## Summary\n",
            "\n",
            "- **Total Citations**: 1\n",
            "- [+] **Supported**: 1\n",
            "\n",
            "## Detailed Results\n",
            "\n",
            "### 1. [+] SUPPORTED\n",
            "\n",
            "**Confidence**: 90%\n",
            "\n",
            "**Claim**: GDP grew 3% last year\n",
            "\n",
            "**Source**: https://example.com/gdp\n",
            "\n",
            "**Explanation**: The source states this directly.\n",
            "\n",
            "**Quote**: \"GDP grew by 3.0%\"\n",
            "\n",
            "---\n",
        );

        assert_eq!(format_markdown_report(&results), expected);
    }

    #[test]
    fn verdict_names_keep_their_underscores_in_headings() {
        let results = vec![fixtures::result(Verdict::NotSupported, 0.8)];
        let rendered = format_markdown_report(&results);

        assert!(rendered.contains("### 1. [X] NOT_SUPPORTED"));
        assert!(rendered.contains("- [X] **Not Supported**: 1"));
    }

    #[test]
    fn optional_fields_are_dropped_when_absent() {
        let results = vec![fixtures::unquoted_result(Verdict::Inconclusive, 0.2)];
        let rendered = format_markdown_report(&results);

        assert!(!rendered.contains("**Source**:"));
        assert!(!rendered.contains("**Quote**:"));
        assert!(rendered.contains("**Explanation**: No source to quote."));
    }

    #[test]
    fn empty_results_render_the_notice() {
        assert_eq!(format_markdown_report(&[]), "No verifiable citations found.");
    }
}
