//! Core data types shared across the verification pipeline.
//!
//! - [`Claim`] – an assertion extracted from a document, with its citation
//! - [`SourceContent`] – what the fetcher brought back for a citation URL
//! - [`FetchStatus`] – closed vocabulary of fetch outcomes
//! - [`Verdict`] / [`ModelVerdict`] – judgment enums; the model-facing one
//!   deliberately cannot express `source_unavailable`
//! - [`VerificationResult`] – one claim's final judgment, validated at
//!   construction

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Verdict ────────────────────────────────────────────────────────────

/// Final judgment attached to a verified claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The source explicitly states what the claim asserts.
    Supported,
    /// The source contradicts the claim or never addresses the topic.
    NotSupported,
    /// The source supports the claim with differing figures or omitted
    /// nuance.
    Partial,
    /// Insufficient signal in the source to decide either way.
    Inconclusive,
    /// The cited source could not be fetched; nothing was judged.
    SourceUnavailable,
}

impl Verdict {
    /// Every verdict, in declaration order. Reporters iterate this to get
    /// deterministic summary ordering.
    pub const ALL: [Verdict; 5] = [
        Verdict::Supported,
        Verdict::NotSupported,
        Verdict::Partial,
        Verdict::Inconclusive,
        Verdict::SourceUnavailable,
    ];
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Supported => write!(f, "supported"),
            Self::NotSupported => write!(f, "not_supported"),
            Self::Partial => write!(f, "partial"),
            Self::Inconclusive => write!(f, "inconclusive"),
            Self::SourceUnavailable => write!(f, "source_unavailable"),
        }
    }
}

// ── ModelVerdict ───────────────────────────────────────────────────────

/// The four verdicts a language model is allowed to emit.
///
/// `source_unavailable` is reserved for the verifier's own short-circuit,
/// so it is unrepresentable here: a reply claiming it fails to parse
/// instead of smuggling a fetch outcome through the model boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelVerdict {
    Supported,
    NotSupported,
    Partial,
    Inconclusive,
}

impl From<ModelVerdict> for Verdict {
    fn from(v: ModelVerdict) -> Self {
        match v {
            ModelVerdict::Supported => Verdict::Supported,
            ModelVerdict::NotSupported => Verdict::NotSupported,
            ModelVerdict::Partial => Verdict::Partial,
            ModelVerdict::Inconclusive => Verdict::Inconclusive,
        }
    }
}

// ── FetchStatus ────────────────────────────────────────────────────────

/// Outcome of fetching a cited source.
///
/// The `Display` strings are part of the reporting surface (they appear in
/// `source_unavailable` explanations) and must stay stable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    /// Not fetched yet.
    Pending,
    /// 200 with decodable content under the size cap.
    Success,
    /// HTTP 404.
    NotFound,
    /// HTTP 403.
    AccessDenied,
    /// The request did not complete within the configured timeout.
    Timeout,
    /// Any other non-success HTTP status.
    Failed(u16),
    /// A non-HTTP failure, with a short machine-readable detail.
    Error(String),
}

impl FetchStatus {
    /// Status for a URL whose scheme is not `http` or `https`.
    #[must_use]
    pub fn invalid_url_scheme() -> Self {
        Self::Error("invalid_url_scheme".to_string())
    }

    /// Status for a string that does not parse as a URL at all.
    #[must_use]
    pub fn invalid_url() -> Self {
        Self::Error("invalid_url".to_string())
    }

    /// Status for a response body over the size cap, in megabytes.
    #[must_use]
    pub fn content_too_large(size_mb: f64) -> Self {
        Self::Error(format!("content_too_large ({size_mb:.1}MB)"))
    }

    /// Returns `true` if the fetch produced usable content.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl std::fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Success => write!(f, "success"),
            Self::NotFound => write!(f, "not_found"),
            Self::AccessDenied => write!(f, "access_denied"),
            Self::Timeout => write!(f, "timeout"),
            Self::Failed(code) => write!(f, "failed_{code}"),
            Self::Error(detail) => write!(f, "error: {detail}"),
        }
    }
}

// ── Claim ──────────────────────────────────────────────────────────────

/// An assertion extracted from a document together with its citation.
///
/// At least one of `citation_url` / `citation_ref` should be populated for
/// the claim to be worth verifying; `citation_url` may be back-filled from
/// `citation_ref` by the reference resolver, and is never rewritten once
/// set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// The exact assertion made in the document.
    pub text: String,
    /// URL of the cited source, when the document provides one directly.
    pub citation_url: Option<String>,
    /// Non-URL reference (`"[1]"`, `"according to McKinsey"`) when no URL
    /// appears inline.
    pub citation_ref: Option<String>,
    /// The full sentence the claim was lifted from.
    pub context: String,
}

impl Claim {
    /// Creates a claim with no citation attached yet.
    #[must_use]
    pub fn new(text: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            citation_url: None,
            citation_ref: None,
            context: context.into(),
        }
    }

    /// Attaches a citation URL.
    #[must_use]
    pub fn with_citation_url(mut self, url: impl Into<String>) -> Self {
        self.citation_url = Some(url.into());
        self
    }

    /// Attaches a non-URL citation reference.
    #[must_use]
    pub fn with_citation_ref(mut self, reference: impl Into<String>) -> Self {
        self.citation_ref = Some(reference.into());
        self
    }

    /// Returns `true` if the claim points at a fetchable URL.
    #[must_use]
    pub fn has_url(&self) -> bool {
        self.citation_url.is_some()
    }
}

// ── SourceContent ──────────────────────────────────────────────────────

/// What the fetcher brought back for one URL.
///
/// `content` is present exactly when `fetch_status` is [`FetchStatus::Success`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceContent {
    pub url: String,
    pub content: Option<String>,
    pub fetch_status: FetchStatus,
}

impl SourceContent {
    /// A source that has been addressed but not fetched.
    #[must_use]
    pub fn pending(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content: None,
            fetch_status: FetchStatus::Pending,
        }
    }

    /// A successfully fetched source.
    #[must_use]
    pub fn success(url: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content: Some(content.into()),
            fetch_status: FetchStatus::Success,
        }
    }

    /// A source that could not be fetched, with the reason.
    #[must_use]
    pub fn unavailable(url: impl Into<String>, status: FetchStatus) -> Self {
        Self {
            url: url.into(),
            content: None,
            fetch_status: status,
        }
    }

    /// Returns `true` if content was fetched successfully.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.fetch_status.is_success()
    }
}

// ── VerificationResult ─────────────────────────────────────────────────

/// Confidence outside the unit interval, rejected at construction.
#[derive(Debug, Error, Diagnostic)]
#[error("confidence must be within [0.0, 1.0], got {value}")]
#[diagnostic(
    code(veracite::models::confidence_out_of_range),
    help("Verdict confidences are probabilities; check the model reply parsing.")
)]
pub struct ConfidenceError {
    pub value: f32,
}

/// One claim's final judgment.
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationResult {
    pub claim: Claim,
    pub verdict: Verdict,
    /// How certain the judgment is, within `[0.0, 1.0]`.
    pub confidence: f32,
    pub explanation: String,
    /// Exact excerpt from the source backing the verdict, when one exists.
    pub source_quote: Option<String>,
}

impl VerificationResult {
    /// Builds a result, rejecting confidences outside `[0.0, 1.0]`.
    pub fn new(
        claim: Claim,
        verdict: Verdict,
        confidence: f32,
        explanation: impl Into<String>,
        source_quote: Option<String>,
    ) -> Result<Self, ConfidenceError> {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(ConfidenceError { value: confidence });
        }
        Ok(Self {
            claim,
            verdict,
            confidence,
            explanation: explanation.into(),
            source_quote,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_display_matches_serde_names() {
        for verdict in Verdict::ALL {
            let displayed = verdict.to_string();
            let serialized = serde_json::to_value(verdict).unwrap();
            assert_eq!(serialized, serde_json::json!(displayed));
        }
        assert_eq!(Verdict::NotSupported.to_string(), "not_supported");
        assert_eq!(Verdict::SourceUnavailable.to_string(), "source_unavailable");
    }

    #[test]
    fn model_verdict_cannot_express_source_unavailable() {
        let parsed: Result<ModelVerdict, _> =
            serde_json::from_value(serde_json::json!("source_unavailable"));
        assert!(parsed.is_err());

        let parsed: ModelVerdict = serde_json::from_value(serde_json::json!("partial")).unwrap();
        assert_eq!(Verdict::from(parsed), Verdict::Partial);
    }

    #[test]
    fn fetch_status_display_strings() {
        assert_eq!(FetchStatus::Pending.to_string(), "pending");
        assert_eq!(FetchStatus::Success.to_string(), "success");
        assert_eq!(FetchStatus::NotFound.to_string(), "not_found");
        assert_eq!(FetchStatus::AccessDenied.to_string(), "access_denied");
        assert_eq!(FetchStatus::Timeout.to_string(), "timeout");
        assert_eq!(FetchStatus::Failed(503).to_string(), "failed_503");
        assert_eq!(
            FetchStatus::invalid_url_scheme().to_string(),
            "error: invalid_url_scheme"
        );
        assert_eq!(FetchStatus::invalid_url().to_string(), "error: invalid_url");
        assert_eq!(
            FetchStatus::content_too_large(12.34).to_string(),
            "error: content_too_large (12.3MB)"
        );
    }

    #[test]
    fn claim_url_accessors() {
        let with_url = Claim::new("Test claim", "This is a test claim from example.com")
            .with_citation_url("https://example.com");
        assert!(with_url.has_url());
        assert_eq!(with_url.citation_url.as_deref(), Some("https://example.com"));

        let with_ref = Claim::new("Test claim", "Test claim [1]").with_citation_ref("[1]");
        assert!(!with_ref.has_url());
        assert_eq!(with_ref.citation_ref.as_deref(), Some("[1]"));
    }

    #[test]
    fn source_content_constructors_keep_the_invariant() {
        let pending = SourceContent::pending("https://example.com");
        assert_eq!(pending.fetch_status, FetchStatus::Pending);
        assert!(pending.content.is_none());

        let ok = SourceContent::success("https://example.com", "Test content");
        assert!(ok.is_success());
        assert_eq!(ok.content.as_deref(), Some("Test content"));

        let gone = SourceContent::unavailable("https://example.com", FetchStatus::NotFound);
        assert!(!gone.is_success());
        assert!(gone.content.is_none());
    }

    #[test]
    fn verification_result_validates_confidence() {
        let claim = Claim::new("Test", "Test");

        let ok = VerificationResult::new(
            claim.clone(),
            Verdict::Supported,
            0.5,
            "The source supports the claim",
            None,
        )
        .unwrap();
        assert_eq!(ok.confidence, 0.5);
        assert!(ok.source_quote.is_none());

        for bounds in [0.0f32, 1.0] {
            assert!(
                VerificationResult::new(claim.clone(), Verdict::Partial, bounds, "edge", None)
                    .is_ok()
            );
        }

        for bad in [1.5f32, -0.5, f32::NAN] {
            assert!(
                VerificationResult::new(claim.clone(), Verdict::Supported, bad, "bad", None)
                    .is_err()
            );
        }
    }
}
