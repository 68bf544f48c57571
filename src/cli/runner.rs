//! One-shot runner
//!
//! Runs a single session and races it against an interrupt. An interrupt
//! abandons the in-flight request without cleanup.

use std::future::Future;
use std::process::ExitCode;

use crate::agent::AgentLoop;

/// Query used when none is given on the command line
pub const DEFAULT_QUERY: &str = "List files in current directory";

/// Use the given query, falling back to the default when absent or empty
pub fn resolve_query(arg: Option<String>) -> String {
    arg.filter(|q| !q.is_empty())
        .unwrap_or_else(|| DEFAULT_QUERY.to_string())
}

/// How the process should end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunExit {
    /// The model produced a final answer
    Completed,
    /// The loop hit a terminal error
    Aborted,
    /// The user interrupted the session
    Interrupted,
}

impl RunExit {
    /// Process exit code: interrupts are a clean exit
    pub fn code(self) -> ExitCode {
        match self {
            RunExit::Completed | RunExit::Interrupted => ExitCode::SUCCESS,
            RunExit::Aborted => ExitCode::FAILURE,
        }
    }
}

/// Run a session until it ends or `shutdown` resolves
pub async fn run_until<F>(agent: &AgentLoop, query: &str, shutdown: F) -> RunExit
where
    F: Future<Output = ()>,
{
    tokio::select! {
        result = agent.run(query) => {
            if result.is_completed() {
                RunExit::Completed
            } else {
                RunExit::Aborted
            }
        }
        _ = shutdown => {
            println!("\n👋 Goodbye!");
            RunExit::Interrupted
        }
    }
}

/// Run a session until it ends or Ctrl+C is pressed
pub async fn run_once(agent: &AgentLoop, query: &str) -> RunExit {
    run_until(agent, query, interrupt()).await
}

/// Resolves on Ctrl+C; never resolves if the handler cannot be installed
async fn interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for interrupt: {}", e);
        std::future::pending::<()>().await;
    }
}
