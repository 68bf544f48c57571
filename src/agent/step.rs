//! Step records decoded from model replies
//!
//! Every reply must be a single JSON object tagged by its `step` field.
//! Decoding happens in two stages so the loop can record the raw reply
//! between "is it JSON" and "is it a step".

use serde::Deserialize;
use serde_json::Value;

use crate::core::{AgentError, Result};

/// One unit of model output
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "step", rename_all = "lowercase")]
pub enum Step {
    /// Intermediate reasoning
    Think { content: String },
    /// Request to invoke a tool
    Action { tool: String, input: String },
    /// Final answer
    Output { content: String },
}

impl Step {
    /// Decode raw reply text into JSON. Fails with `Parse`.
    pub fn decode(raw: &str) -> Result<Value> {
        serde_json::from_str(raw).map_err(|e| AgentError::parse(raw, e.to_string()))
    }

    /// Interpret decoded JSON as a step. Fails with `Format`.
    pub fn from_value(value: Value) -> Result<Self> {
        let tag = match value.get("step") {
            Some(Value::String(tag)) => tag.clone(),
            Some(other) => {
                return Err(AgentError::format(format!(
                    "'step' is not a string: {}",
                    other
                )))
            }
            None => {
                return Err(AgentError::format(format!(
                    "missing 'step' field: {}",
                    value
                )))
            }
        };

        serde_json::from_value(value)
            .map_err(|e| AgentError::format(format!("invalid '{}' step: {}", tag, e)))
    }

    /// Decode and interpret in one go
    pub fn parse(raw: &str) -> Result<Self> {
        Self::from_value(Self::decode(raw)?)
    }

    /// Lowercase tag as it appears on the wire
    pub fn kind(&self) -> &'static str {
        match self {
            Step::Think { .. } => "think",
            Step::Action { .. } => "action",
            Step::Output { .. } => "output",
        }
    }
}
