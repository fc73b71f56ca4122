//! Language-model access.
//!
//! [`CompletionModel`] is the single seam between the pipeline and any
//! model backend: one prompt in, one completion out. [`AnthropicModel`]
//! is the production implementation; [`ScriptedModel`] replays queued
//! completions for deterministic tests.

mod anthropic;
mod script;

pub use anthropic::AnthropicModel;
pub use script::ScriptedModel;

use async_trait::async_trait;
use miette::Diagnostic;
use thiserror::Error;

/// Errors produced while obtaining a completion.
#[derive(Debug, Error, Diagnostic)]
pub enum LlmError {
    /// The endpoint rejected the credentials.
    #[error("model request rejected: invalid or missing API key")]
    #[diagnostic(
        code(veracite::llm::auth),
        help("Check ANTHROPIC_API_KEY in the environment or .env file.")
    )]
    Auth,

    /// The endpoint throttled the request.
    #[error("model provider rate limited the request")]
    #[diagnostic(code(veracite::llm::rate_limited))]
    RateLimited,

    /// The request did not complete in time.
    #[error("model request timed out")]
    #[diagnostic(code(veracite::llm::timeout))]
    Timeout,

    /// Any other non-success HTTP status.
    #[error("model endpoint returned HTTP {status}: {detail}")]
    #[diagnostic(code(veracite::llm::http))]
    Http { status: u16, detail: String },

    /// Connection-level failure before a status was received.
    #[error("model transport failure: {source}")]
    #[diagnostic(code(veracite::llm::transport))]
    Transport {
        #[source]
        source: reqwest::Error,
    },

    /// The endpoint answered 2xx but the payload had no usable text.
    #[error("malformed model reply: {reason}")]
    #[diagnostic(code(veracite::llm::malformed_reply))]
    MalformedReply { reason: String },

    /// A [`ScriptedModel`] was asked for more replies than were queued.
    #[error("scripted model ran out of queued replies")]
    #[diagnostic(code(veracite::llm::script_exhausted))]
    ScriptExhausted,
}

/// One-shot prompt-to-completion interface.
///
/// Calls carry no deadline of their own; wrap them in
/// `tokio::time::timeout` when an upper bound is needed.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Sends a single user prompt and returns the model's text reply.
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;

    /// Identifier of the underlying model, for logging and reports.
    fn model_id(&self) -> &str;
}
