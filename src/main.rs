//! thinkloop - think/act/observe agent
//!
//! Main entry point for the CLI application.

use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;
use thinkloop::cli::{resolve_query, run_once};
use thinkloop::{AgentLoop, Config};
use tracing_subscriber::EnvFilter;

/// Ask a hosted model to resolve a query, letting it run shell commands
#[derive(Parser, Debug)]
#[command(name = "thinkloop")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Query to resolve (defaults to listing the current directory)
    #[arg(allow_hyphen_values = true)]
    query: Option<String>,
}

fn init_logging(debug: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug {
            EnvFilter::new("thinkloop=debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let config = Config::load().context("Failed to load configuration")?;
    init_logging(config.agent.debug);

    let agent = AgentLoop::from_config(&config).context("Failed to start agent")?;

    let query = resolve_query(args.query);
    let exit = run_once(&agent, &query).await;
    Ok(exit.code())
}
