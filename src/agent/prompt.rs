//! System instruction for the think/act/observe protocol

use crate::tools::ToolRegistry;

const PROTOCOL: &str = r#"You are a helpful AI Assistant who is designed to resolve user queries.
You work on START, THINK, ACTION, OBSERVE and OUTPUT Mode.

In the start phase, user gives a query to you.
Then, you THINK how to resolve that query at least 3-4 times and make decisions.
If there is a need to call a tool, you call an ACTION event with tool name and input.
If there is an action call, wait for the OBSERVE that is output of the tool.
Based on the OBSERVE from prev step, you either output or repeat the loop.

Rules:
- Always wait for next step.
- Always output a single step and wait for the next step.
- Output must be strictly JSON
- Only call tool action from Available tools only.
- Strictly follow the output format in JSON"#;

const EXAMPLE: &str = r#"Example:
START: List files in current directory
THINK: The user wants to list files in the current directory.
THINK: I need to use the executeCommand tool with the 'ls' command.
ACTION: Call Tool executeCommand(ls)
OBSERVE: file1.txt file2.js README.md
THINK: The executeCommand tool returned the list of files successfully.
OUTPUT: Here are the files in the current directory: file1.txt, file2.js, README.md

Output Format:
For THINK: {"step": "think", "content": "your thinking process"}
For ACTION: {"step": "action", "tool": "toolName", "input": "toolInput"}
For OUTPUT: {"step": "output", "content": "your final response"}"#;

/// Build the system instruction, listing the registry's tools
pub fn system_prompt(tools: &ToolRegistry) -> String {
    let listing = if tools.is_empty() {
        "- (none)".to_string()
    } else {
        tools.describe()
    };

    format!(
        "{}\n\nAvailable Tools:\n{}\n\n{}\n",
        PROTOCOL, listing, EXAMPLE
    )
}
