//! Claim verification.
//!
//! Builds a verification prompt from a claim and its fetched source,
//! invokes the completion model and parses the reply into a
//! [`VerificationResult`]. Sources that never arrived short-circuit to
//! `source_unavailable` without a model call. Long sources are narrowed
//! to the passages most relevant to the claim when a retriever is
//! attached, with hard truncation as the fallback.

use std::sync::Arc;

use miette::Diagnostic;
use serde::Deserialize;
use thiserror::Error;
use vc_ragmill::Retriever;

use crate::llm::{CompletionModel, LlmError};
use crate::models::{
    Claim, ConfidenceError, ModelVerdict, SourceContent, VerificationResult, Verdict,
};
use crate::utils::json_ext::extract_json_object;
use crate::utils::text::truncate_to_boundary;

/// Source length above which the content is narrowed before prompting,
/// in bytes.
pub const RAG_THRESHOLD_CHARS: usize = 8_000;
/// Context budget handed to the retriever for long sources, in bytes.
pub const RAG_CONTEXT_BUDGET_CHARS: usize = 6_000;

/// Verification failures that cannot be folded into a verdict.
///
/// Fetch problems never land here (they become `source_unavailable`
/// results); this covers the model call itself and replies no judgment
/// can be read from. Fabricating a default verdict for those would put
/// wrong data in a report, so the batch stops instead.
#[derive(Debug, Error, Diagnostic)]
pub enum VerifyError {
    #[error("verification model call failed: {0}")]
    #[diagnostic(code(veracite::verify::model_call))]
    ModelCall(#[from] LlmError),

    #[error("model reply held no usable judgment: {reason}")]
    #[diagnostic(
        code(veracite::verify::malformed_reply),
        help("The model must answer with a single JSON object carrying verdict, confidence and explanation.")
    )]
    MalformedReply { reason: String },

    #[error(transparent)]
    #[diagnostic(code(veracite::verify::confidence))]
    Confidence(#[from] ConfidenceError),
}

/// Judges whether fetched sources substantiate their claims.
pub struct Verifier {
    model: Arc<dyn CompletionModel>,
    retriever: Option<Retriever>,
}

impl Verifier {
    /// Creates a verifier that truncates long sources.
    #[must_use]
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        Self {
            model,
            retriever: None,
        }
    }

    /// Attaches a retriever used to pick claim-relevant passages from
    /// sources longer than [`RAG_THRESHOLD_CHARS`].
    #[must_use]
    pub fn with_retriever(mut self, retriever: Retriever) -> Self {
        self.retriever = Some(retriever);
        self
    }

    /// Verifies one claim against its fetched source.
    ///
    /// A source whose fetch did not succeed, or whose content is empty,
    /// yields a `source_unavailable` result with confidence `1.0` and no
    /// model call.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError`] when the model call fails or its reply
    /// cannot be parsed into a judgment.
    pub async fn verify(
        &self,
        claim: &Claim,
        source: &SourceContent,
    ) -> Result<VerificationResult, VerifyError> {
        let content = match source.content.as_deref() {
            Some(content) if source.is_success() && !content.is_empty() => content,
            _ => {
                tracing::debug!(
                    url = %source.url,
                    status = %source.fetch_status,
                    "source unavailable, skipping model call"
                );
                return Ok(VerificationResult::new(
                    claim.clone(),
                    Verdict::SourceUnavailable,
                    1.0,
                    format!("Source unavailable: {}", source.fetch_status),
                    None,
                )?);
            }
        };

        let selected = self.select_content(&claim.text, content).await;
        let prompt = verification_prompt(&claim.text, &selected);
        let reply = self.model.complete(&prompt).await?;
        let judgment = parse_judgment(&reply)?;

        Ok(VerificationResult::new(
            claim.clone(),
            judgment.verdict.into(),
            judgment.confidence,
            judgment.explanation,
            judgment.source_quote,
        )?)
    }

    /// Picks the source content handed to the model.
    ///
    /// At or below [`RAG_THRESHOLD_CHARS`] the full content is used. Above
    /// it, a configured retriever assembles claim-relevant passages within
    /// [`RAG_CONTEXT_BUDGET_CHARS`]; retrieval failures and the
    /// no-retriever case fall back to plain truncation.
    async fn select_content(&self, claim_text: &str, content: &str) -> String {
        if content.len() <= RAG_THRESHOLD_CHARS {
            return content.to_string();
        }

        if let Some(retriever) = &self.retriever {
            match retriever
                .relevant_context(claim_text, content, RAG_CONTEXT_BUDGET_CHARS)
                .await
            {
                Ok(context) => {
                    tracing::debug!(
                        content_bytes = content.len(),
                        context_bytes = context.len(),
                        "narrowed long source to relevant passages"
                    );
                    return context;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "context retrieval failed, truncating instead");
                }
            }
        }

        truncate_to_boundary(content, RAG_THRESHOLD_CHARS).to_string()
    }
}

fn verification_prompt(claim: &str, source_content: &str) -> String {
    format!(
        r#"You are a citation verifier. Your task is to determine whether a cited source actually supports the claim that was made.

CLAIM TO VERIFY:
{claim}

CONTENT OF THE CITED SOURCE:
{source_content}

Analyze whether the source supports the claim. Respond in JSON with this exact format:
{{
    "verdict": "supported|not_supported|partial|inconclusive",
    "confidence": 0.0-1.0,
    "explanation": "A clear explanation of your verdict",
    "source_quote": "The exact quote from the source justifying your verdict (or null)"
}}

Criteria:
- SUPPORTED: the source explicitly states what the claim asserts
- NOT_SUPPORTED: the source contradicts the claim or never mentions the topic
- PARTIAL: the source partially supports it (different figures, omitted nuance)
- INCONCLUSIVE: impossible to determine with certainty

Respond ONLY with the JSON, nothing else."#
    )
}

/// Judgment shape the model must produce. [`ModelVerdict`] keeps
/// `source_unavailable` out of this boundary entirely.
#[derive(Debug, Deserialize)]
struct Judgment {
    verdict: ModelVerdict,
    confidence: f32,
    explanation: String,
    #[serde(default)]
    source_quote: Option<String>,
}

fn parse_judgment(reply: &str) -> Result<Judgment, VerifyError> {
    let json = extract_json_object(reply).ok_or_else(|| VerifyError::MalformedReply {
        reason: "reply did not contain a JSON object".into(),
    })?;
    serde_json::from_str(json).map_err(|e| VerifyError::MalformedReply {
        reason: e.to_string(),
    })
}
