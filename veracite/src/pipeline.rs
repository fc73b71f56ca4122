//! Pipeline orchestration.
//!
//! Sequences the full verification flow for one document:
//! parse, extract claims, resolve references, keep the verifiable claims,
//! then fetch and verify each claim in order. Verification is strictly
//! sequential; one fetch and one model call per claim.

use std::sync::Arc;

use miette::Diagnostic;
use thiserror::Error;
use vc_ragmill::{HashedEmbeddingProvider, Retriever};

use crate::extract::{ClaimExtractor, Extraction};
use crate::fetch::SourceFetcher;
use crate::llm::CompletionModel;
use crate::models::{Claim, SourceContent, VerificationResult};
use crate::parsers::{self, ParseError};
use crate::resolve::resolve_references;
use crate::verify::{Verifier, VerifyError};

/// Failures that abort a document run.
///
/// Per-claim fetch failures never abort; they surface as
/// `source_unavailable` results instead.
#[derive(Debug, Error, Diagnostic)]
pub enum PipelineError {
    #[error(transparent)]
    #[diagnostic(code(veracite::pipeline::parse))]
    Parse(#[from] ParseError),

    #[error(transparent)]
    #[diagnostic(code(veracite::pipeline::verify))]
    Verify(#[from] VerifyError),
}

/// End-to-end document verification.
pub struct Pipeline {
    extractor: ClaimExtractor,
    fetcher: SourceFetcher,
    verifier: Verifier,
}

impl Pipeline {
    /// Creates a pipeline with retrieval enabled for long sources.
    #[must_use]
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        Self::with_rag(model, true)
    }

    /// Creates a pipeline, choosing how long sources are narrowed:
    /// retrieval over hashed embeddings, or plain truncation.
    #[must_use]
    pub fn with_rag(model: Arc<dyn CompletionModel>, use_rag: bool) -> Self {
        let mut verifier = Verifier::new(Arc::clone(&model));
        if use_rag {
            verifier =
                verifier.with_retriever(Retriever::new(Arc::new(HashedEmbeddingProvider::new())));
        }
        Self {
            extractor: ClaimExtractor::new(model),
            fetcher: SourceFetcher::new(),
            verifier,
        }
    }

    /// Parses `source` (a local path or URL), extracts claims, resolves
    /// reference markers and returns the verifiable claims, in document
    /// order.
    ///
    /// Claims that never resolved to a URL are dropped here; they cannot
    /// be fetched. A failed extraction is logged and treated as an empty
    /// claim list.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Parse`] for a missing file or an
    /// unreachable URL document.
    pub async fn process_document(&self, source: &str) -> Result<Vec<Claim>, PipelineError> {
        let document = parsers::parse_document(source).await?;

        let claims = match self.extractor.extract(&document.text).await {
            Extraction::Found(claims) => claims,
            Extraction::Empty => Vec::new(),
            Extraction::Failed { reason } => {
                tracing::warn!(%source, reason, "claim extraction failed, no claims to verify");
                Vec::new()
            }
        };

        let claims = resolve_references(claims, &document.references);
        let verifiable: Vec<Claim> = claims.into_iter().filter(Claim::has_url).collect();
        tracing::info!(%source, claims = verifiable.len(), "document processed");
        Ok(verifiable)
    }

    /// Runs the full machine over `source` and returns one result per
    /// verifiable claim, in claim order.
    ///
    /// # Errors
    ///
    /// Parse failures and unreadable model judgments abort the run; fetch
    /// failures do not.
    pub async fn verify_document(
        &self,
        source: &str,
    ) -> Result<Vec<VerificationResult>, PipelineError> {
        let claims = self.process_document(source).await?;

        let mut results = Vec::with_capacity(claims.len());
        for claim in &claims {
            let result = self.verify_claim(claim).await?;
            tracing::info!(
                claim = %result.claim.text,
                verdict = %result.verdict,
                "claim verified"
            );
            results.push(result);
        }
        Ok(results)
    }

    /// Fetches one claim's cited source and verifies the claim against it.
    ///
    /// A claim with no URL, like any fetch failure, comes back as a
    /// `source_unavailable` result.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Verify`] when the model reply cannot be
    /// read.
    pub async fn verify_claim(&self, claim: &Claim) -> Result<VerificationResult, PipelineError> {
        let source = match claim.citation_url.as_deref() {
            Some(url) => self.fetcher.fetch(url).await,
            None => SourceContent::pending(""),
        };
        Ok(self.verifier.verify(claim, &source).await?)
    }
}
