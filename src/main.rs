//! # fiscal-audit CLI entry point
//!
//! Parses command-line arguments and dispatches to the batch auditor or the
//! HTTP server.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use fiscal_audit::api::{AppState, create_router};
use fiscal_audit::batch::audit_files;
use fiscal_audit::config::RateTableLoader;

/// Tax divergence auditor for NF-e and CT-e documents.
#[derive(Parser, Debug)]
#[command(name = "fiscal-audit", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Audit XML files and print the batch result as JSON.
    Audit(AuditArgs),

    /// Serve the audit HTTP API.
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
struct RateArgs {
    /// Rate table file (JSON or YAML). Tried before the default locations.
    #[arg(long, env = "FISCAL_AUDIT_RATES")]
    rates: Option<PathBuf>,
}

impl RateArgs {
    fn loader(&self) -> RateTableLoader {
        let loader = match &self.rates {
            Some(path) => RateTableLoader::new().with_file(path.clone()),
            None => RateTableLoader::new(),
        };
        loader.with_default_candidates()
    }
}

#[derive(Args, Debug)]
struct AuditArgs {
    /// NF-e or CT-e XML files, audited in the order given.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    #[command(flatten)]
    rates: RateArgs,
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: SocketAddr,

    #[command(flatten)]
    rates: RateArgs,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Audit(args) => run_audit(args).await,
        Commands::Serve(args) => run_serve(args).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

async fn run_audit(args: AuditArgs) -> Result<()> {
    let loader = args.rates.loader();
    let result = audit_files(&loader, &args.files)
        .await
        .context("Failed to audit files")?;

    let json = serde_json::to_string_pretty(&result).context("Failed to serialize batch result")?;
    println!("{}", json);
    Ok(())
}

async fn run_serve(args: ServeArgs) -> Result<()> {
    let loader = args.rates.loader();

    // Fail at startup rather than on the first request.
    loader.load().await.context("Failed to load rate table")?;

    let app = create_router(AppState::new(loader));
    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("Failed to bind {}", args.addr))?;

    info!(addr = %args.addr, "Serving audit API");
    axum::serve(listener, app).await.context("Server error")
}
