//! Wayfarer CLI: the main entry point.
//!
//! ```text
//! wayfarer "Plan a 3-day trip to Osaka, budget $1000"
//! ```
//!
//! The transcript goes to stdout; progress, warnings and logs go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use wayfarer_config::StoreBackend;

mod plan;
mod presenter;

#[derive(Parser)]
#[command(
    name = "wayfarer",
    about = "Wayfarer: autonomous AI travel planner",
    version,
    author
)]
struct Cli {
    /// The trip to plan, in plain language
    message: Option<String>,

    /// Turn budget for this run (overrides config)
    #[arg(short, long)]
    turns: Option<u32>,

    /// Model to plan with (overrides config)
    #[arg(short, long)]
    model: Option<String>,

    /// Path to a config file (default: ~/.wayfarer/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where the run's history is kept: memory or file
    #[arg(long)]
    store: Option<StoreBackend>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is fine; variables may come from the shell.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let Some(message) = cli.message.filter(|m| !m.trim().is_empty()) else {
        eprintln!("Please provide a message");
        return ExitCode::FAILURE;
    };

    let options = plan::PlanOptions {
        turns: cli.turns,
        model: cli.model,
        config: cli.config,
        store: cli.store,
    };

    match plan::run(options, message).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\n[ERROR] {e}");
            ExitCode::FAILURE
        }
    }
}
