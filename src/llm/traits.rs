//! Completion provider trait
//!
//! The agent loop only sees this trait, so tests can script replies and
//! other backends can be dropped in.

use async_trait::async_trait;

use crate::core::{Message, Result};

/// A single completion call: fixed system instruction plus the full history
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    /// System instruction sent with every call
    pub system: &'a str,
    /// Conversation so far, oldest first
    pub messages: &'a [Message],
}

/// Trait for completion backends
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send the request and return the reply text.
    ///
    /// Any failure to obtain a reply is a `Transport` error.
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String>;

    /// Get the provider name
    fn name(&self) -> &str;
}
