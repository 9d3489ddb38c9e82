//! CLI for site-pulse.
//!
//! Reads the site configuration, resolves freshness metadata for every
//! configured site, and writes the JSON snapshot consumed by the dashboard.

use clap::Parser;
use site_pulse::{RunSummary, Runner, RunnerConfig, RunnerError};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Site Pulse - Snapshot freshness metadata for tracked repositories and images.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the site configuration file.
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Path the JSON snapshot is written to.
    #[arg(long, default_value = "data/sites.json")]
    output: PathBuf,

    /// GitHub Personal Access Token for the authenticated API tier.
    #[arg(long, env = "GITHUB_TOKEN")]
    token: Option<String>,

    /// Per-site resolution timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    init_tracing();

    // Parse arguments
    let args = Args::parse();

    // Run the main logic
    let code = match run(args).await {
        Ok(summary) => {
            print_summary(&summary);
            ExitCode::from(0)
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(1)
        }
    };

    // Grace delay so console output flushes before the process exits
    tokio::time::sleep(Duration::from_millis(200)).await;
    code
}

/// Initializes tracing with environment filter support.
///
/// Sets up the global tracing subscriber with:
/// - Compact log formatting (single-line output)
/// - Log level filtering via `RUST_LOG` env var (defaults to "info")
fn init_tracing() {
    tracing_subscriber::registry()
        // Use compact formatting without module target paths for cleaner output
        .with(fmt::layer().compact().with_target(false))
        // Allow runtime log filtering via RUST_LOG env var (e.g., RUST_LOG=debug)
        // Falls back to "info" level if RUST_LOG is not set or invalid
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        // Register as the global default subscriber
        .init();
}

/// Main execution logic.
async fn run(args: Args) -> Result<RunSummary, RunnerError> {
    let config = RunnerConfig::new(args.config, args.output, args.token)
        .with_site_timeout(Duration::from_secs(args.timeout_secs));
    let runner = Runner::new(config)?;
    runner.run().await
}

/// Prints the final run summary.
fn print_summary(summary: &RunSummary) {
    println!("\nSummary:");
    println!("  Sites processed: {}", summary.total_sites);
    println!("  Succeeded: {}", summary.succeeded);
    println!("  Failed: {}", summary.failed);
    println!("  Snapshot written to: {}", summary.output_path.display());
}
