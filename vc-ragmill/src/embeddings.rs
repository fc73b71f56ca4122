//! Embedding providers behind one async trait.
//!
//! Two implementations ship with the crate:
//!
//! - [`HttpEmbeddingProvider`]: an OpenAI-compatible `/v1/embeddings`
//!   endpoint over HTTP, for production retrieval quality.
//! - [`HashedEmbeddingProvider`]: deterministic token-hashing vectors with
//!   no I/O, for offline runs and reproducible tests.
//!
//! A provider is constructed explicitly and handed to
//! [`Retriever::new`](crate::retriever::Retriever::new); there is no lazy,
//! first-call model loading.

use std::hash::{DefaultHasher, Hash, Hasher};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::types::RagError;

const EMBEDDINGS_PATH: &str = "/v1/embeddings";
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);
const ERROR_DETAIL_LIMIT: usize = 200;

/// Turns text into fixed-size numeric vectors.
///
/// One provider instance embeds with one consistent function: identical
/// inputs yield identical vectors for the lifetime of the instance, which
/// keeps retrieval rankings reproducible.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a batch of documents: one vector per input, in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError>;

    /// Embed a single query string.
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, RagError> {
        let query = [text.to_string()];
        let mut vectors = self.embed_batch(&query).await?;
        vectors.pop().ok_or_else(|| RagError::MalformedEmbedding {
            reason: "provider returned no vector for the query".into(),
        })
    }

    /// Dimensionality of the produced vectors.
    fn dimension(&self) -> usize;
}

/// OpenAI-compatible embedding client.
///
/// Posts `{model, input}` to `{base_url}/v1/embeddings` with a bearer key
/// and reads vectors back in the order of the response `index` field, so a
/// provider that reorders rows still maps vectors to the right inputs.
pub struct HttpEmbeddingProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    dimension: usize,
}

impl HttpEmbeddingProvider {
    /// Build a client for the given endpoint.
    ///
    /// `dimension` must match what the configured model produces; it is
    /// reported through [`EmbeddingProvider::dimension`] and never checked
    /// against the endpoint.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        dimension: usize,
    ) -> Result<Self, RagError> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|source| RagError::EmbeddingTransport { source })?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            dimension,
        })
    }

    async fn post_embeddings(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        let url = format!("{}{EMBEDDINGS_PATH}", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({ "model": self.model, "input": texts }))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(map_status_error(status.as_u16(), detail));
        }

        let payload: EmbeddingResponse =
            response
                .json()
                .await
                .map_err(|err| RagError::MalformedEmbedding {
                    reason: err.to_string(),
                })?;

        if payload.data.len() != texts.len() {
            return Err(RagError::EmbeddingCountMismatch {
                expected: texts.len(),
                actual: payload.data.len(),
            });
        }

        let mut rows = payload.data;
        rows.sort_by_key(|row| row.index);
        Ok(rows.into_iter().map(|row| row.embedding).collect())
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let vectors = self.post_embeddings(texts).await?;
        tracing::debug!(
            inputs = texts.len(),
            model = %self.model,
            "embedded batch over http"
        );
        Ok(vectors)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingRow>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingRow {
    index: usize,
    embedding: Vec<f32>,
}

fn map_transport_error(err: reqwest::Error) -> RagError {
    if err.is_timeout() {
        RagError::EmbeddingTimeout
    } else {
        RagError::EmbeddingTransport { source: err }
    }
}

fn map_status_error(status: u16, detail: String) -> RagError {
    match status {
        401 => RagError::EmbeddingAuth,
        429 => RagError::EmbeddingRateLimited,
        _ => RagError::EmbeddingHttp {
            status,
            detail: truncate_detail(detail),
        },
    }
}

fn truncate_detail(detail: String) -> String {
    if detail.len() <= ERROR_DETAIL_LIMIT {
        return detail;
    }
    let mut cut = ERROR_DETAIL_LIMIT;
    while cut > 0 && !detail.is_char_boundary(cut) {
        cut -= 1;
    }
    detail[..cut].to_string()
}

/// Deterministic embedding provider with no external dependencies.
///
/// Tokenizes on whitespace, folds case, strips non-alphanumeric characters,
/// and hashes each token into a bucket-count vector that is then
/// L2-normalized. Shared vocabulary between two texts raises their cosine
/// similarity, which is enough signal for lexical relevance ranking, and the
/// fixed-key hasher makes output identical across runs and processes.
pub struct HashedEmbeddingProvider {
    dimension: usize,
}

impl HashedEmbeddingProvider {
    pub const DEFAULT_DIMENSION: usize = 256;

    #[must_use]
    pub fn new() -> Self {
        Self {
            dimension: Self::DEFAULT_DIMENSION,
        }
    }

    /// Use a custom vector width (minimum 1).
    #[must_use]
    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut buckets = vec![0f32; self.dimension];
        for raw in text.split_whitespace() {
            let token: String = raw
                .chars()
                .filter(|c| c.is_alphanumeric())
                .flat_map(char::to_lowercase)
                .collect();
            if token.is_empty() {
                continue;
            }
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            let bucket = (hasher.finish() % self.dimension as u64) as usize;
            buckets[bucket] += 1.0;
        }

        let norm = buckets.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut buckets {
                *v /= norm;
            }
        }
        buckets
    }
}

impl Default for HashedEmbeddingProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for HashedEmbeddingProvider {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
