//! Shell command tool
//!
//! Runs the model-supplied string through the system shell. There is no
//! allow-list or sandbox; the optional timeout is the only limit.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::core::config::ToolsConfig;
use crate::tools::registry::Tool;

/// Name the model uses to call this tool
pub const SHELL_TOOL_NAME: &str = "executeCommand";

#[cfg(windows)]
const DEFAULT_SHELL: (&str, &str) = ("cmd", "/C");
#[cfg(not(windows))]
const DEFAULT_SHELL: (&str, &str) = ("sh", "-c");

/// Executes a command line and reports its captured output
#[derive(Debug, Clone)]
pub struct ShellTool {
    program: String,
    flag: String,
    timeout: Option<Duration>,
}

impl ShellTool {
    /// Create a shell tool using the platform shell and no timeout
    pub fn new() -> Self {
        Self {
            program: DEFAULT_SHELL.0.to_string(),
            flag: DEFAULT_SHELL.1.to_string(),
            timeout: None,
        }
    }

    /// Create a shell tool from configuration
    pub fn from_config(config: &ToolsConfig) -> Self {
        let mut tool = Self::new();
        if let Some(ref shell) = config.shell {
            tool.program = shell.clone();
        }
        match config.shell_timeout_secs {
            Some(secs) => tool.with_timeout(Duration::from_secs(secs)),
            None => tool,
        }
    }

    /// Set a timeout after which the command is killed
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Run a command, returning formatted output or an error message
    pub async fn run(&self, command: &str) -> std::result::Result<String, String> {
        let mut cmd = Command::new(&self.program);
        cmd.arg(&self.flag);
        // cmd.exe does its own quote parsing, so the line goes through untouched.
        #[cfg(windows)]
        cmd.raw_arg(command);
        #[cfg(not(windows))]
        cmd.arg(command);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::debug!(shell = %self.program, command, "running shell command");

        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, cmd.output()).await {
                Ok(result) => result,
                Err(_) => {
                    return Err(format!("Command timed out after {:?}: {}", limit, command))
                }
            },
            None => cmd.output().await,
        }
        .map_err(|e| format!("Failed to run command: {}", e))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if output.status.success() {
            Ok(format!("stdout: {}\nstderr: {}", stdout, stderr))
        } else {
            tracing::debug!(status = ?output.status.code(), "shell command failed");
            Err(format!("Command failed: {}\n{}", command, stderr.trim_end()))
        }
    }
}

impl Default for ShellTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for ShellTool {
    fn name(&self) -> &str {
        SHELL_TOOL_NAME
    }

    fn description(&self) -> &str {
        "Executes a given linux command and returns its stdout and stderr"
    }

    async fn invoke(&self, input: &str) -> std::result::Result<String, String> {
        self.run(input).await
    }
}
