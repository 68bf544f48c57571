//! LLM module - completion endpoint integration
//!
//! Provides the provider abstraction the agent loop talks to, with the
//! Anthropic Messages API as the hosted implementation.

pub mod anthropic;
pub mod traits;

pub use anthropic::AnthropicClient;
pub use traits::{CompletionProvider, CompletionRequest};
