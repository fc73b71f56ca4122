//! # Veracite: Citation Verification Pipeline
//!
//! Veracite reads a document, asks a language model to pull out the claims
//! that cite external sources, fetches each cited source over HTTP, then
//! asks the model to judge every claim against the source it cites. Each
//! claim ends with one of five verdicts: `supported`, `not_supported`,
//! `partial`, `inconclusive`, or `source_unavailable` when the citation
//! could not be fetched.
//!
//! ## Flow
//!
//! ```text
//! path or URL ──► parsers::parse_document ──► text + reference map
//!                        │
//!                        ▼
//!              extract::ClaimExtractor ──► Vec<Claim>
//!                        │
//!                        ▼
//!         resolve::resolve_references   ([1] markers get their URLs)
//!                        │
//!                        ▼
//!               fetch::SourceFetcher ──► SourceContent per claim
//!                        │
//!                        ▼
//!                 verify::Verifier ──► VerificationResult per claim
//!                        │              (long sources narrowed by vc-ragmill)
//!                        ▼
//!      report::{terminal, markdown, json}   or the REST api
//! ```
//!
//! [`pipeline::Pipeline`] wires the stages together; everything below it is
//! usable on its own.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use veracite::config::AppConfig;
//! use veracite::llm::AnthropicModel;
//! use veracite::pipeline::Pipeline;
//!
//! # async fn run() -> miette::Result<()> {
//! let config = AppConfig::from_env()?;
//! let pipeline = Pipeline::new(Arc::new(AnthropicModel::new(config)));
//!
//! let results = pipeline.verify_document("notes.md").await?;
//! for result in &results {
//!     println!(
//!         "{} {} ({:.0}%)",
//!         result.verdict,
//!         result.claim.text,
//!         f64::from(result.confidence) * 100.0,
//!     );
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Guide
//!
//! - [`models`] - Claims, fetched sources, verdicts and results
//! - [`config`] - Environment-backed configuration
//! - [`parsers`] - Markdown, HTML, PDF, plain-text and URL documents
//! - [`extract`] - Model-driven claim extraction
//! - [`resolve`] - Reference-marker to URL resolution
//! - [`fetch`] - Cited-source retrieval over HTTP
//! - [`verify`] - Model verdicts, with retrieval for long sources
//! - [`pipeline`] - End-to-end orchestration
//! - [`report`] - Terminal, Markdown and JSON renderings
//! - [`api`] - REST server over the pipeline
//! - [`llm`] - The [`llm::CompletionModel`] seam and its implementations

pub mod api;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod llm;
pub mod models;
pub mod parsers;
pub mod pipeline;
pub mod report;
pub mod resolve;
pub mod utils;
pub mod verify;
