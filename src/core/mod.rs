//! Core module - shared infrastructure for thinkloop
//!
//! Foundational types, configuration, and error handling used by the
//! agent loop, the completion client, and the tools.

pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::{AgentError, Result};
pub use types::*;
