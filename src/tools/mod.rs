//! Tools module - local capabilities the model can call
//!
//! Contains the tool registry and the shell execution tool.

pub mod registry;
pub mod shell;

pub use registry::{Tool, ToolRegistry};
pub use shell::{ShellTool, SHELL_TOOL_NAME};
