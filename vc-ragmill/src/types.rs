//! Shared error type for the retrieval utilities.

use thiserror::Error;

/// Errors produced while embedding text or assembling relevant context.
///
/// Transport and endpoint failures are kept distinct so callers can decide
/// whether to retry, re-authenticate, or fall back to truncation.
#[derive(Debug, Error)]
pub enum RagError {
    /// The embedding endpoint rejected the credentials.
    #[error("embedding request rejected: invalid or missing API key")]
    EmbeddingAuth,

    /// The embedding endpoint throttled the request.
    #[error("embedding provider rate limited the request")]
    EmbeddingRateLimited,

    /// The embedding request did not complete within the client timeout.
    #[error("embedding request timed out")]
    EmbeddingTimeout,

    /// Any other non-success HTTP status from the embedding endpoint.
    #[error("embedding endpoint returned HTTP {status}: {detail}")]
    EmbeddingHttp { status: u16, detail: String },

    /// Connection-level failure before a status was received.
    #[error("embedding transport failure: {source}")]
    EmbeddingTransport {
        #[source]
        source: reqwest::Error,
    },

    /// The endpoint answered 2xx but the payload did not match the schema.
    #[error("malformed embedding response: {reason}")]
    MalformedEmbedding { reason: String },

    /// The endpoint returned a different number of vectors than inputs.
    #[error("expected {expected} embeddings, provider returned {actual}")]
    EmbeddingCountMismatch { expected: usize, actual: usize },
}
