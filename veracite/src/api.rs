//! REST API.
//!
//! Thin presentation layer over [`Pipeline`]: request DTOs in, the
//! interchange format out. Every error renders as `{"detail": <message>}`
//! with its mapped status code.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AppConfig;
use crate::llm::AnthropicModel;
use crate::models::Claim;
use crate::parsers::ParseError;
use crate::pipeline::{Pipeline, PipelineError};
use crate::report::{ClaimReport, ReportSummary};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Shared handler state. Pipelines are built per request so a request's
/// `model` override never leaks into other requests.
#[derive(Clone)]
pub struct AppState {
    config: AppConfig,
}

impl AppState {
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    fn pipeline(&self, model_override: Option<String>) -> Pipeline {
        let mut config = self.config.clone();
        if let Some(model) = model_override.filter(|m| !m.trim().is_empty()) {
            config = config.with_model(model);
        }
        Pipeline::new(Arc::new(AnthropicModel::new(config)))
    }
}

/// Startup failures for the API server.
#[derive(Debug, Error, Diagnostic)]
pub enum ServeError {
    #[error("could not bind {addr}")]
    #[diagnostic(
        code(veracite::api::bind),
        help("Is the port already in use, or the address unavailable?")
    )]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("api server error")]
    #[diagnostic(code(veracite::api::serve))]
    Serve {
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Deserialize)]
pub struct VerifyDocumentRequest {
    /// Path or URL of the document to verify.
    pub source: String,
    /// Optional model id, overriding the configured default.
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyClaimRequest {
    pub claim: String,
    pub source_url: String,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DocumentVerificationResponse {
    pub summary: ReportSummary,
    pub results: Vec<ClaimReport>,
    /// Wall-clock duration of the run, rounded to two decimals.
    pub processing_time_seconds: f64,
}

#[derive(Debug, Serialize)]
struct ServiceInfo {
    message: &'static str,
    version: &'static str,
    docs: Option<&'static str>,
    health: &'static str,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error envelope for handlers.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn not_found(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            detail: detail.into(),
        }
    }

    fn internal(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "detail": self.detail }));
        (self.status, body).into_response()
    }
}

fn map_pipeline_error(err: PipelineError, source: &str) -> ApiError {
    match err {
        PipelineError::Parse(ParseError::FileNotFound { .. }) => {
            ApiError::not_found(format!("File not found: {source}"))
        }
        other => ApiError::internal(format!("Verification failed: {other}")),
    }
}

/// Builds the API router.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(service_info))
        .route("/health", get(health))
        .route("/verify/document", post(verify_document))
        .route("/verify/claim", post(verify_claim))
        .with_state(state)
}

/// Binds `host:port` and serves the API until ctrl-c.
///
/// # Errors
///
/// Returns [`ServeError`] when the address cannot be bound or the server
/// fails while running.
pub async fn serve(config: AppConfig, host: &str, port: u16) -> Result<(), ServeError> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| ServeError::Bind {
            addr: addr.clone(),
            source,
        })?;
    tracing::info!(%addr, version = VERSION, "serving the verification api");

    axum::serve(listener, router(AppState::new(config)).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|source| ServeError::Serve { source })
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutdown signal received, draining connections");
    }
}

async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "Citation Verifier API",
        version: VERSION,
        docs: None,
        health: "/health",
    })
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: VERSION,
        timestamp: chrono::Utc::now(),
    })
}

async fn verify_document(
    State(state): State<AppState>,
    Json(request): Json<VerifyDocumentRequest>,
) -> Result<Json<DocumentVerificationResponse>, ApiError> {
    let started = Instant::now();
    tracing::info!(source = %request.source, "verify document request");

    let pipeline = state.pipeline(request.model);
    let results = pipeline
        .verify_document(&request.source)
        .await
        .map_err(|e| map_pipeline_error(e, &request.source))?;

    let elapsed = started.elapsed().as_secs_f64();
    Ok(Json(DocumentVerificationResponse {
        summary: ReportSummary::from_results(&results),
        results: results.iter().map(ClaimReport::from).collect(),
        processing_time_seconds: (elapsed * 100.0).round() / 100.0,
    }))
}

async fn verify_claim(
    State(state): State<AppState>,
    Json(request): Json<VerifyClaimRequest>,
) -> Result<Json<ClaimReport>, ApiError> {
    tracing::info!(source_url = %request.source_url, "verify claim request");

    let pipeline = state.pipeline(request.model);
    let claim = Claim::new(&request.claim, &request.claim).with_citation_url(&request.source_url);
    let result = pipeline
        .verify_claim(&claim)
        .await
        .map_err(|e| ApiError::internal(format!("Verification failed: {e}")))?;

    Ok(Json(ClaimReport::from(&result)))
}
