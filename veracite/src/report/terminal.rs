//! Terminal report with ANSI colors.

use std::io::IsTerminal;

use crate::models::{Verdict, VerificationResult};
use crate::report::{percent, verdict_counts, verdict_symbol, verdict_title};

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const BRIGHT_BLACK: &str = "\x1b[90m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// Color mode for terminal reports.
///
/// - [`FormatterMode::Auto`]: detects TTY capability via
///   `stdout.is_terminal()`
/// - [`FormatterMode::Colored`]: always include ANSI codes
/// - [`FormatterMode::Plain`]: never include ANSI codes (piped output)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatterMode {
    /// Auto-detect TTY capability (checks `stdout.is_terminal()`)
    #[default]
    Auto,
    /// Always include ANSI color codes
    Colored,
    /// Never include ANSI color codes
    Plain,
}

impl FormatterMode {
    /// Returns true if this mode should use colored output.
    ///
    /// For `Auto` mode, performs TTY detection on each call.
    #[must_use]
    pub fn is_colored(&self) -> bool {
        match self {
            FormatterMode::Auto => std::io::stdout().is_terminal(),
            FormatterMode::Colored => true,
            FormatterMode::Plain => false,
        }
    }
}

/// Renders verification results for a terminal.
pub struct TerminalReporter {
    mode: FormatterMode,
}

impl TerminalReporter {
    /// Creates a reporter with auto-detected color mode.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mode: FormatterMode::Auto,
        }
    }

    /// Creates a reporter with an explicit color mode.
    #[must_use]
    pub fn with_mode(mode: FormatterMode) -> Self {
        Self { mode }
    }

    fn color<'a>(&self, ansi_code: &'a str) -> &'a str {
        if self.mode.is_colored() { ansi_code } else { "" }
    }

    fn reset(&self) -> &str {
        if self.mode.is_colored() { RESET } else { "" }
    }

    /// Renders the full report as one string ready for stdout.
    #[must_use]
    pub fn format(&self, results: &[VerificationResult]) -> String {
        if results.is_empty() {
            return format!(
                "{}No verifiable citations found.{}\n",
                self.color(YELLOW),
                self.reset()
            );
        }

        let mut lines: Vec<String> = Vec::new();

        lines.push(format!(
            "\n{}Verification Summary{}\n",
            self.color(BOLD),
            self.reset()
        ));
        lines.push(format!("  Total Citations: {}", results.len()));
        for (verdict, count) in verdict_counts(results) {
            lines.push(format!(
                "  {} {}: {}{count}{}",
                verdict_symbol(verdict),
                verdict_title(verdict),
                self.color(verdict_color(verdict)),
                self.reset()
            ));
        }

        lines.push(format!(
            "\n{}Detailed Results{}\n",
            self.color(BOLD),
            self.reset()
        ));

        for (i, result) in results.iter().enumerate() {
            lines.push(format!(
                "{}{}.{} {}{} {}{} (confidence: {})",
                self.color(BOLD),
                i + 1,
                self.reset(),
                self.color(verdict_color(result.verdict)),
                verdict_symbol(result.verdict),
                result.verdict.to_string().to_uppercase(),
                self.reset(),
                percent(result.confidence)
            ));

            lines.push(self.field("Claim", &result.claim.text));
            if let Some(url) = result
                .claim
                .citation_url
                .as_deref()
                .filter(|u| !u.is_empty())
            {
                lines.push(self.field("Source", url));
            }
            lines.push(self.field("Explanation", &result.explanation));
            if let Some(quote) = result.source_quote.as_deref().filter(|q| !q.is_empty()) {
                lines.push(self.field("Quote", &format!("\"{quote}\"")));
            }
            lines.push(String::new());
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    fn field(&self, label: &str, value: &str) -> String {
        format!("   {}{label}:{} {value}", self.color(DIM), self.reset())
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn verdict_color(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Supported => GREEN,
        Verdict::NotSupported => RED,
        Verdict::Partial => YELLOW,
        Verdict::Inconclusive => BLUE,
        Verdict::SourceUnavailable => BRIGHT_BLACK,
    }
}
