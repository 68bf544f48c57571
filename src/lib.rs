//! thinkloop - a think/act/observe agent loop
//!
//! Sends a query to a hosted language model, reads back one JSON step at a
//! time, and drives a reason/act/finish cycle with local tools.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, and error handling
//! - **LLM**: Completion provider abstraction with an Anthropic implementation
//! - **Tools**: Tool registry and the shell execution tool
//! - **Agent**: Step decoding, conversation history, and the loop controller
//! - **CLI**: One-shot runner with interrupt handling
//!
//! # Usage
//!
//! ```rust,no_run
//! use thinkloop::{AgentLoop, Config};
//!
//! #[tokio::main]
//! async fn main() -> thinkloop::Result<()> {
//!     let agent = AgentLoop::from_config(&Config::load()?)?;
//!     let answer = agent.run("List files in current directory").await.into_result()?;
//!     println!("{}", answer);
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod core;
pub mod llm;
pub mod tools;

// Re-export commonly used items
pub use agent::{AgentLoop, TerminalResult};
pub use core::{AgentError, Config, Result};
