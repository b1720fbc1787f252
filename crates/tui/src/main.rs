//! Entry point for the taskdeck dashboard.

use clap::Parser;
use std::process;
use tracing_subscriber::EnvFilter;

use taskdeck_client::{ApiClient, DEFAULT_BASE_URL};
use taskdeck_tui::{App, TuiResult};

/// Environment variable naming the data service base URL
const API_URL_ENV: &str = "TASKDECK_API_URL";

/// taskdeck - terminal dashboard for the task/bug data service
#[derive(Parser)]
#[command(name = "taskdeck")]
#[command(version = "0.1.0")]
#[command(about = "Terminal project-management dashboard", long_about = None)]
struct Args {
    /// Base URL of the data service (can also be set via TASKDECK_API_URL env var)
    #[arg(long)]
    api_url: Option<String>,
}

/// Get the data service base URL from command line, environment, or default.
///
/// Priority:
/// 1. Command line --api-url argument
/// 2. TASKDECK_API_URL environment variable (if non-empty)
/// 3. Default URL (http://localhost:8321)
fn resolve_base_url(cli_url: Option<String>) -> String {
    // First priority: explicit command line argument
    if let Some(url) = cli_url {
        return url;
    }

    // Second priority: environment variable (if set and non-empty)
    if let Ok(env_url) = std::env::var(API_URL_ENV)
        && !env_url.is_empty()
    {
        return env_url;
    }

    // Third priority: default URL
    DEFAULT_BASE_URL.to_string()
}

/// Initialize logging based on the RUST_LOG environment variable
///
/// Examples:
/// - `RUST_LOG=debug` - show debug and above
/// - `RUST_LOG=taskdeck_client=trace` - trace the service client only
///
/// Defaults to `warn` so the terminal UI stays clean.
fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .init();
}

#[tokio::main]
async fn main() {
    init_logging();

    if let Err(e) = run_app().await {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

/// Main application logic - separated for testability
async fn run_app() -> TuiResult<()> {
    let args = Args::parse();
    let base_url = resolve_base_url(args.api_url);

    let client = ApiClient::new(base_url)?;
    let mut app = App::new(client).await;
    app.run().await
}
