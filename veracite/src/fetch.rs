//! Source fetching.
//!
//! Retrieves cited URLs and folds every outcome into
//! [`SourceContent::fetch_status`]. Fetching never returns an error: bad
//! schemes, timeouts, oversize bodies and non-200 statuses all come back as
//! data so the verifier can short-circuit to `source_unavailable`.

use std::time::Duration;

use url::Url;

use crate::models::{FetchStatus, SourceContent};

const USER_AGENT: &str = concat!("veracite/", env!("CARGO_PKG_VERSION"));

/// Limits applied to every fetch.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Per-request deadline, covering the body read.
    pub timeout: Duration,
    /// Largest body accepted, in megabytes.
    pub max_size_mb: f64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_size_mb: 10.0,
        }
    }
}

/// Fetches citation targets over HTTP(S).
pub struct SourceFetcher {
    client: reqwest::Client,
    config: FetchConfig,
}

impl SourceFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(FetchConfig::default())
    }

    #[must_use]
    pub fn with_config(config: FetchConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Fetches `url`, following redirects.
    ///
    /// Only `http` and `https` schemes reach the network; anything else is
    /// rejected up front. A 200 body over the size cap is discarded and
    /// reported as `content_too_large`.
    pub async fn fetch(&self, url: &str) -> SourceContent {
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(_) => return SourceContent::unavailable(url, FetchStatus::invalid_url()),
        };
        if !matches!(parsed.scheme(), "http" | "https") {
            return SourceContent::unavailable(url, FetchStatus::invalid_url_scheme());
        }

        tracing::debug!(%url, "fetching source");
        let response = match self
            .client
            .get(parsed)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .timeout(self.config.timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return SourceContent::unavailable(url, transport_status(&e)),
        };

        match response.status().as_u16() {
            200 => {}
            403 => return SourceContent::unavailable(url, FetchStatus::AccessDenied),
            404 => return SourceContent::unavailable(url, FetchStatus::NotFound),
            code => return SourceContent::unavailable(url, FetchStatus::Failed(code)),
        }

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => return SourceContent::unavailable(url, transport_status(&e)),
        };

        let size_mb = bytes.len() as f64 / (1024.0 * 1024.0);
        if size_mb > self.config.max_size_mb {
            tracing::warn!(%url, size_mb, "source body over the size cap");
            return SourceContent::unavailable(url, FetchStatus::content_too_large(size_mb));
        }

        SourceContent::success(url, String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl Default for SourceFetcher {
    fn default() -> Self {
        Self::new()
    }
}

fn transport_status(err: &reqwest::Error) -> FetchStatus {
    if err.is_timeout() {
        FetchStatus::Timeout
    } else {
        FetchStatus::Error(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn non_http_schemes_are_rejected_without_a_request() {
        let fetcher = SourceFetcher::new();
        let source = fetcher.fetch("ftp://example.com/report.pdf").await;

        assert_eq!(source.fetch_status.to_string(), "error: invalid_url_scheme");
        assert!(source.content.is_none());
    }

    #[tokio::test]
    async fn unparseable_urls_are_rejected_without_a_request() {
        let fetcher = SourceFetcher::new();
        let source = fetcher.fetch("not a url at all").await;

        assert_eq!(source.fetch_status.to_string(), "error: invalid_url");
        assert!(source.content.is_none());
    }

    #[test]
    fn defaults_match_the_documented_limits() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!((config.max_size_mb - 10.0).abs() < f64::EPSILON);
    }
}
