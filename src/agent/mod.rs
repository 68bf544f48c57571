//! Agent module - the think/act/observe loop
//!
//! Contains the loop controller, step decoding, conversation history, and
//! progress reporting.

pub mod controller;
pub mod conversation;
pub mod events;
pub mod prompt;
pub mod step;

pub use controller::{AgentLoop, Flow, TerminalResult};
pub use conversation::{ConversationHistory, CONTINUE_PROMPT};
pub use events::{AgentEvent, ConsoleSink, EventSink, NullSink};
pub use step::Step;
