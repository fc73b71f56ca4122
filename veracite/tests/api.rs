//! REST surface tests over a live server.
//!
//! Each test binds an ephemeral port, serves the real router on it and
//! talks to it over HTTP. Model traffic goes to a mock completion
//! endpoint, keyed on prompt markers.

mod common;

use httpmock::prelude::*;
use serde_json::Value;
use tokio::net::TcpListener;
use veracite::api::{AppState, router};
use veracite::config::AppConfig;

use common::{anthropic_reply, write_markdown};

async fn start_api(
    config: AppConfig,
) -> Result<(String, tokio::task::JoinHandle<()>), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let server = tokio::spawn(async move {
        let service = router(AppState::new(config)).into_make_service();
        if let Err(err) = axum::serve(listener, service).await {
            tracing::error!("test api server error: {err:?}");
        }
    });
    Ok((format!("http://{addr}"), server))
}

#[tokio::test(flavor = "multi_thread")]
async fn service_info_and_health_respond() -> Result<(), Box<dyn std::error::Error>> {
    let (base, server) = start_api(AppConfig::new("test-key")?).await?;
    let client = reqwest::Client::new();

    let info: Value = client.get(format!("{base}/")).send().await?.json().await?;
    assert_eq!(info["message"], "Citation Verifier API");
    assert_eq!(info["version"], env!("CARGO_PKG_VERSION"));
    assert!(info["docs"].is_null());
    assert_eq!(info["health"], "/health");

    let health: Value = client
        .get(format!("{base}/health"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(health["status"], "healthy");
    assert!(health["timestamp"].is_string());

    server.abort();
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn verify_document_returns_summary_results_and_timing()
-> Result<(), Box<dyn std::error::Error>> {
    let mock = MockServer::start_async().await;
    mock.mock_async(|when, then| {
        when.method(GET).path("/gdp");
        then.status(200)
            .body("The bureau reported that GDP grew by 3.0% in 2024.");
    })
    .await;
    mock.mock_async(|when, then| {
        when.method(POST)
            .path("/v1/messages")
            .body_contains("Analyze this document");
        then.status(200).json_body(anthropic_reply(
            r#"{"claims": [{"claim_text": "GDP grew 3% in 2024", "citation_url": null, "citation_ref": "[1]", "original_context": "GDP grew 3% in 2024 [1]."}]}"#,
        ));
    })
    .await;
    mock.mock_async(|when, then| {
        when.method(POST)
            .path("/v1/messages")
            .body_contains("CLAIM TO VERIFY");
        then.status(200).json_body(anthropic_reply(
            r#"{"verdict": "supported", "confidence": 0.92, "explanation": "The source states the figure directly.", "source_quote": "GDP grew by 3.0% in 2024"}"#,
        ));
    })
    .await;

    let config = AppConfig::new("test-key")?.with_base_url(mock.base_url());
    let (base, server) = start_api(config).await?;

    let file = write_markdown(&format!(
        "GDP grew 3% in 2024 [1].\n\n[1]: {}\n",
        mock.url("/gdp")
    ));
    let response = reqwest::Client::new()
        .post(format!("{base}/verify/document"))
        .json(&serde_json::json!({ "source": file.path().display().to_string() }))
        .send()
        .await?;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await?;
    assert_eq!(body["summary"]["total_citations"], 1);
    assert_eq!(body["summary"]["supported"], 1);
    assert!(body["summary"].get("not_supported").is_none());
    assert_eq!(body["results"][0]["verdict"], "supported");
    assert_eq!(body["results"][0]["source_url"], mock.url("/gdp"));
    assert!(body["processing_time_seconds"].is_number());

    server.abort();
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_documents_map_to_404() -> Result<(), Box<dyn std::error::Error>> {
    let (base, server) = start_api(AppConfig::new("test-key")?).await?;

    let response = reqwest::Client::new()
        .post(format!("{base}/verify/document"))
        .json(&serde_json::json!({ "source": "/no/such/file.md" }))
        .send()
        .await?;

    assert_eq!(response.status(), 404);
    let body: Value = response.json().await?;
    assert_eq!(body["detail"], "File not found: /no/such/file.md");

    server.abort();
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn unfetchable_claim_sources_are_results_not_errors()
-> Result<(), Box<dyn std::error::Error>> {
    // Nothing is mocked, so the cited URL 404s; the claim endpoint still
    // answers 200 with a source_unavailable verdict.
    let mock = MockServer::start_async().await;
    let config = AppConfig::new("test-key")?.with_base_url(mock.base_url());
    let (base, server) = start_api(config).await?;

    let response = reqwest::Client::new()
        .post(format!("{base}/verify/claim"))
        .json(&serde_json::json!({
            "claim": "The treaty was signed in 1848",
            "source_url": mock.url("/gone"),
        }))
        .send()
        .await?;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await?;
    assert_eq!(body["verdict"], "source_unavailable");
    assert_eq!(body["explanation"], "Source unavailable: not_found");
    assert_eq!(body["confidence"], 1.0);

    server.abort();
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn claim_requests_forward_the_model_override() -> Result<(), Box<dyn std::error::Error>> {
    let mock = MockServer::start_async().await;
    mock.mock_async(|when, then| {
        when.method(GET).path("/treaty");
        then.status(200)
            .body("The treaty was signed in 1848 in Guadalupe Hidalgo.");
    })
    .await;
    let verification_mock = mock
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/messages")
                .body_contains("CLAIM TO VERIFY")
                .json_body_partial(r#"{"model": "claude-sonnet-4-20250514"}"#);
            then.status(200).json_body(anthropic_reply(
                r#"{"verdict": "supported", "confidence": 0.8, "explanation": "Stated verbatim.", "source_quote": null}"#,
            ));
        })
        .await;

    let config = AppConfig::new("test-key")?.with_base_url(mock.base_url());
    let (base, server) = start_api(config).await?;

    let response = reqwest::Client::new()
        .post(format!("{base}/verify/claim"))
        .json(&serde_json::json!({
            "claim": "The treaty was signed in 1848",
            "source_url": mock.url("/treaty"),
            "model": "claude-sonnet-4-20250514",
        }))
        .send()
        .await?;

    assert_eq!(response.status(), 200);
    verification_mock.assert_async().await;
    let body: Value = response.json().await?;
    assert_eq!(body["verdict"], "supported");

    server.abort();
    Ok(())
}
