//! Command-line entry point.
//!
//! `veracite check <SOURCE>` runs the full pipeline over one document and
//! renders the results; `veracite serve` exposes the same pipeline over
//! HTTP.

use std::path::Path;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use miette::Result;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use veracite::api;
use veracite::config::{AppConfig, DEFAULT_MODEL};
use veracite::llm::AnthropicModel;
use veracite::parsers::ParseError;
use veracite::pipeline::Pipeline;
use veracite::report::{TerminalReporter, format_json_report, format_markdown_report};

#[derive(Parser)]
#[command(
    name = "veracite",
    version,
    about = "AI-powered citation verification: check every claim a document makes against the source it cites"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Verify citations in a document
    Check {
        /// Path to a document (.md, .html, .pdf) or URL to verify
        source: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Terminal)]
        output: OutputFormat,

        /// Model used for claim extraction and verification
        #[arg(short, long, default_value = DEFAULT_MODEL)]
        model: String,

        /// Show detailed progress
        #[arg(short, long)]
        verbose: bool,

        /// Disable retrieval for long sources and truncate them instead.
        /// Use this on systems with limited memory.
        #[arg(long)]
        no_rag: bool,
    },
    /// Serve the verification pipeline as a REST API
    Serve {
        /// Address to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(long, default_value_t = 8000)]
        port: u16,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    /// Colored report on the terminal
    Terminal,
    /// Pretty-printed JSON
    Json,
    /// Markdown report
    Markdown,
}

#[tokio::main]
async fn main() -> Result<()> {
    miette::set_panic_hook();

    match Cli::parse().command {
        Command::Check {
            source,
            output,
            model,
            verbose,
            no_rag,
        } => {
            init_tracing(if verbose {
                "veracite=debug,vc_ragmill=debug,warn"
            } else {
                "warn"
            });
            check(&source, output, &model, no_rag).await
        }
        Command::Serve { host, port } => {
            init_tracing("veracite=info,warn");
            serve(&host, port).await
        }
    }
}

/// Logs go to stderr so piped report output stays clean.
fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn check(source: &str, output: OutputFormat, model: &str, no_rag: bool) -> Result<()> {
    // Catch path typos before asking for credentials.
    let is_url = source.starts_with("http://") || source.starts_with("https://");
    if !is_url && !Path::new(source).exists() {
        return Err(ParseError::FileNotFound {
            path: source.to_string(),
        }
        .into());
    }

    let config = AppConfig::from_env()?.with_model(model);
    let pipeline = Pipeline::with_rag(Arc::new(AnthropicModel::new(config)), !no_rag);

    eprintln!("Verifying citations in {source}...");
    let results = pipeline.verify_document(source).await?;

    match output {
        OutputFormat::Terminal => print!("{}", TerminalReporter::new().format(&results)),
        OutputFormat::Json => {
            let report = format_json_report(&results)
                .map_err(|e| miette::miette!("could not render the JSON report: {e}"))?;
            println!("{report}");
        }
        OutputFormat::Markdown => println!("{}", format_markdown_report(&results)),
    }
    Ok(())
}

async fn serve(host: &str, port: u16) -> Result<()> {
    let config = AppConfig::from_env()?;
    api::serve(config, host, port).await?;
    Ok(())
}
