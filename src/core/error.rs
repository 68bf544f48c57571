//! Error types for the agent loop
//!
//! One enum covers every failure the loop can observe. Only tool execution
//! failures are recoverable; the loop folds them back as observations.

use thiserror::Error;

/// Main error type for thinkloop operations
#[derive(Error, Debug)]
pub enum AgentError {
    /// Completion endpoint unreachable or rejected the request
    #[error("Transport error: {0}")]
    Transport(String),

    /// Model reply was not valid JSON
    #[error("Failed to parse JSON response: {message}\n{raw}")]
    Parse { raw: String, message: String },

    /// Valid JSON, but not a recognised step
    #[error("Unexpected response format: {0}")]
    Format(String),

    /// Action step referenced a tool that is not registered
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// A registered tool failed
    #[error("Tool execution failed: {0}")]
    ToolExecution(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience Result type for thinkloop operations
pub type Result<T> = std::result::Result<T, AgentError>;

impl AgentError {
    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a parse error carrying the offending text
    pub fn parse(raw: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            raw: raw.into(),
            message: message.into(),
        }
    }

    /// Create a format error
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    /// Create a tool execution error
    pub fn tool(msg: impl Into<String>) -> Self {
        Self::ToolExecution(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<reqwest::Error> for AgentError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_shows_raw_text() {
        let err = AgentError::parse("not json", "expected value at line 1 column 1");
        let text = err.to_string();
        assert!(text.contains("not json"));
        assert!(text.contains("expected value"));
    }
}
