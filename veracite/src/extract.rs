//! Claim extraction.
//!
//! Sends a document excerpt to the completion model and parses the JSON
//! reply into [`Claim`]s. Extraction never aborts a run: model failures and
//! unparseable replies degrade to [`Extraction::Failed`] so the caller can
//! report them alongside whatever else it produced.

use std::sync::Arc;

use serde::Deserialize;

use crate::llm::CompletionModel;
use crate::models::Claim;
use crate::utils::json_ext::extract_json_object;
use crate::utils::text::truncate_to_boundary;

/// Byte cap on the document slice embedded in the prompt, snapped to a
/// char boundary. Long documents are cut here rather than rejected.
pub const MAX_DOCUMENT_CHARS: usize = 15_000;

/// Outcome of one extraction pass over a document.
#[derive(Debug)]
pub enum Extraction {
    /// At least one cited claim was found.
    Found(Vec<Claim>),
    /// The model replied but reported no cited claims.
    Empty,
    /// The model call failed or the reply was not usable JSON.
    Failed { reason: String },
}

/// Pulls cited claims out of document text via the completion model.
pub struct ClaimExtractor {
    model: Arc<dyn CompletionModel>,
}

impl ClaimExtractor {
    #[must_use]
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        Self { model }
    }

    /// Extracts every claim backed by an explicit citation from `document`.
    pub async fn extract(&self, document: &str) -> Extraction {
        let excerpt = truncate_to_boundary(document, MAX_DOCUMENT_CHARS);
        if excerpt.len() < document.len() {
            tracing::debug!(
                document_bytes = document.len(),
                excerpt_bytes = excerpt.len(),
                "truncated document before extraction"
            );
        }

        let prompt = extraction_prompt(excerpt);
        let reply = match self.model.complete(&prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(model = self.model.model_id(), error = %e, "extraction call failed");
                return Extraction::Failed {
                    reason: e.to_string(),
                };
            }
        };

        match parse_reply(&reply) {
            Some(claims) if claims.is_empty() => Extraction::Empty,
            Some(claims) => {
                tracing::debug!(claims = claims.len(), "extracted cited claims");
                Extraction::Found(claims)
            }
            None => Extraction::Failed {
                reason: "reply did not contain the expected JSON object".into(),
            },
        }
    }
}

fn extraction_prompt(document: &str) -> String {
    format!(
        r#"Analyze this document and extract ALL assertions that cite an external source.

DOCUMENT:
{document}

For each assertion that cites a source (URL, reference, mentioned study), return:
- claim_text: the exact assertion made in the document
- citation_url: the URL of the source (if available)
- citation_ref: the reference when there is no URL (e.g. "[1]", "according to McKinsey", "a Harvard study")
- original_context: the full sentence containing the assertion

Respond ONLY in JSON with this format:
{{
    "claims": [
        {{
            "claim_text": "...",
            "citation_url": "https://..." or null,
            "citation_ref": "..." or null,
            "original_context": "..."
        }}
    ]
}}

Rules:
- Ignore assertions with no cited source
- Ignore internal links (navigation, anchors)
- Include references like [1], [2] when they point to sources
- When a URL appears in the text, extract it exactly as written

Respond ONLY with the JSON."#
    )
}

#[derive(Debug, Deserialize)]
struct ExtractionReply {
    #[serde(default)]
    claims: Vec<ExtractedClaim>,
}

/// Raw reply item. Every field is optional so one malformed entry skips
/// itself instead of sinking the whole reply.
#[derive(Debug, Deserialize)]
struct ExtractedClaim {
    #[serde(default)]
    claim_text: Option<String>,
    #[serde(default)]
    citation_url: Option<String>,
    #[serde(default)]
    citation_ref: Option<String>,
    #[serde(default)]
    original_context: Option<String>,
}

fn parse_reply(reply: &str) -> Option<Vec<Claim>> {
    let json = extract_json_object(reply)?;
    let parsed: ExtractionReply = serde_json::from_str(json).ok()?;
    let claims = parsed
        .claims
        .into_iter()
        .filter_map(|item| {
            let (Some(text), Some(context)) = (item.claim_text, item.original_context) else {
                return None;
            };
            Some(Claim {
                text,
                citation_url: item.citation_url,
                citation_ref: item.citation_ref,
                context,
            })
        })
        .collect();
    Some(claims)
}
