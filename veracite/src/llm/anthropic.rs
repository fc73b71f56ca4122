//! Anthropic Messages API client.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::AppConfig;
use crate::llm::{CompletionModel, LlmError};

const MESSAGES_PATH: &str = "/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;
/// Error bodies are truncated to this many bytes in error values.
const ERROR_DETAIL_LIMIT: usize = 200;

/// [`CompletionModel`] backed by the Anthropic `/v1/messages` endpoint.
///
/// The base URL comes from [`AppConfig`], so tests can point the client at
/// a local mock server. Requests carry no client-side timeout; callers that
/// need one wrap the call.
pub struct AnthropicModel {
    client: reqwest::Client,
    config: AppConfig,
}

impl AnthropicModel {
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl CompletionModel for AnthropicModel {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!(
            "{}{MESSAGES_PATH}",
            self.config.base_url.trim_end_matches('/')
        );
        let body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": MAX_TOKENS,
            "messages": [{ "role": "user", "content": prompt }],
        });

        tracing::debug!(
            model = %self.config.model,
            prompt_bytes = prompt.len(),
            "requesting completion"
        );

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(map_status_error(status.as_u16(), detail));
        }

        let payload: MessagesResponse =
            response
                .json()
                .await
                .map_err(|err| LlmError::MalformedReply {
                    reason: err.to_string(),
                })?;

        payload
            .content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or_else(|| LlmError::MalformedReply {
                reason: "no text content block in reply".to_string(),
            })
    }

    fn model_id(&self) -> &str {
        &self.config.model
    }
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

fn map_transport_error(err: reqwest::Error) -> LlmError {
    if err.is_timeout() {
        LlmError::Timeout
    } else {
        LlmError::Transport { source: err }
    }
}

fn map_status_error(status: u16, detail: String) -> LlmError {
    match status {
        401 => LlmError::Auth,
        429 => LlmError::RateLimited,
        _ => LlmError::Http {
            status,
            detail: truncate_detail(detail),
        },
    }
}

fn truncate_detail(mut detail: String) -> String {
    if detail.len() > ERROR_DETAIL_LIMIT {
        let mut end = ERROR_DETAIL_LIMIT;
        while end > 0 && !detail.is_char_boundary(end) {
            end -= 1;
        }
        detail.truncate(end);
    }
    detail
}
