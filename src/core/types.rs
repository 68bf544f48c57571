//! Shared types used across thinkloop modules
//!
//! Contains the conversation message structure and tool outcomes.

use serde::Serialize;

/// Who sent a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    /// Role of the message sender
    pub role: Role,
    /// Content of the message
    pub content: String,
}

impl Message {
    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Result of invoking a tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolResult {
    /// Whether the invocation succeeded
    pub success: bool,
    /// Output on success, error message on failure
    pub text: String,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            success: true,
            text: text.into(),
        }
    }

    /// Create a failed result
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            text: error.into(),
        }
    }

    /// Render as the observation fed back to the model
    pub fn observation(&self) -> String {
        if self.success {
            format!("OBSERVE: {}", self.text)
        } else {
            format!("OBSERVE: Error - {}", self.text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_serializes_lowercase_role() {
        let json = serde_json::to_value(Message::assistant("hi")).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "hi");
    }

    #[test]
    fn test_observation_text() {
        assert_eq!(
            ToolResult::success("stdout: a").observation(),
            "OBSERVE: stdout: a"
        );
        assert_eq!(
            ToolResult::failure("exit 1").observation(),
            "OBSERVE: Error - exit 1"
        );
    }
}
