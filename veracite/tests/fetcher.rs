//! Fetcher behavior against a local mock server.
//!
//! Fetching never returns an error; every outcome lands in
//! `SourceContent::fetch_status` so the verifier can decide what to do
//! with it.

use std::time::Duration;

use httpmock::prelude::*;
use veracite::fetch::{FetchConfig, SourceFetcher};
use veracite::models::FetchStatus;

#[tokio::test]
async fn successful_fetches_carry_the_body() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/article")
                .header("user-agent", concat!("veracite/", env!("CARGO_PKG_VERSION")));
            then.status(200).body("An article about GDP growth.");
        })
        .await;

    let result = SourceFetcher::new().fetch(&server.url("/article")).await;

    assert_eq!(result.fetch_status, FetchStatus::Success);
    assert_eq!(
        result.content.as_deref(),
        Some("An article about GDP growth.")
    );
    assert_eq!(result.url, server.url("/article"));
}

#[tokio::test]
async fn http_statuses_map_to_typed_outcomes() {
    let cases = [
        (404, FetchStatus::NotFound),
        (403, FetchStatus::AccessDenied),
        (500, FetchStatus::Failed(500)),
        (503, FetchStatus::Failed(503)),
    ];

    for (code, expected) in cases {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/page");
                then.status(code);
            })
            .await;

        let result = SourceFetcher::new().fetch(&server.url("/page")).await;
        assert_eq!(result.fetch_status, expected, "status {code}");
        assert!(result.content.is_none(), "status {code}");
    }
}

#[tokio::test]
async fn slow_responses_time_out() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/slow");
            then.status(200).body("late").delay(Duration::from_secs(5));
        })
        .await;

    let config = FetchConfig {
        timeout: Duration::from_millis(200),
        ..FetchConfig::default()
    };
    let result = SourceFetcher::with_config(config)
        .fetch(&server.url("/slow"))
        .await;

    assert_eq!(result.fetch_status, FetchStatus::Timeout);
    assert!(result.content.is_none());
}

#[tokio::test]
async fn oversized_bodies_are_rejected_after_download() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/big");
            then.status(200).body("x".repeat(64 * 1024));
        })
        .await;

    let config = FetchConfig {
        max_size_mb: 0.01,
        ..FetchConfig::default()
    };
    let result = SourceFetcher::with_config(config)
        .fetch(&server.url("/big"))
        .await;

    match result.fetch_status {
        FetchStatus::Error(detail) => assert!(detail.starts_with("content_too_large")),
        other => panic!("expected content_too_large, got {other}"),
    }
    assert!(result.content.is_none());
}
