//! Progress events emitted by the agent loop
//!
//! The loop reports what it is doing through an [`EventSink`]; the console
//! sink prints each event with a distinguishing marker.

use crate::core::AgentError;

/// Something observable happened in the loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentEvent {
    /// Session started with this query
    Started { query: String },
    /// Model reasoned
    Think { content: String },
    /// Model requested a tool
    Action { tool: String, input: String },
    /// Tool finished successfully
    Observe { output: String },
    /// Tool failed; the error is fed back to the model
    ToolFailed { tool: String, error: String },
    /// Final answer
    Output { content: String },
    /// Session ended on a terminal error
    Aborted { reason: String },
}

/// Receiver for loop events
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &AgentEvent);
}

/// Prints events to stdout/stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl EventSink for ConsoleSink {
    fn emit(&self, event: &AgentEvent) {
        match event {
            AgentEvent::Started { query } => println!("🚀 Starting query: {}", query),
            AgentEvent::Think { content } => println!("🧠 THINK: {}", content),
            AgentEvent::Action { tool, input } => {
                println!("⛏️ ACTION: Calling {} with input: {}", tool, input)
            }
            AgentEvent::Observe { output } => println!("📋 OBSERVE: {}", output),
            AgentEvent::ToolFailed { error, .. } => {
                eprintln!("❌ Tool execution failed: {}", error)
            }
            AgentEvent::Output { content } => println!("🤖 OUTPUT: {}", content),
            AgentEvent::Aborted { reason } => eprintln!("❌ {}", reason),
        }
    }
}

/// Discards all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: &AgentEvent) {}
}

impl AgentEvent {
    pub(crate) fn aborted(error: &AgentError) -> Self {
        Self::Aborted {
            reason: error.to_string(),
        }
    }
}
