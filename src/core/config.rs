//! Configuration management for thinkloop
//!
//! Supports environment variables, a config file, and defaults.
//! The API credential only ever comes from the environment.
//!
//! Config file location: ~/.config/thinkloop/config.toml

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::{AgentError, Result};

/// Environment variable holding the API credential
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Main configuration for thinkloop
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Completion endpoint configuration
    #[serde(default)]
    pub anthropic: AnthropicConfig,
    /// Model configuration
    #[serde(default)]
    pub model: ModelConfig,
    /// Agent loop configuration
    #[serde(default)]
    pub agent: AgentConfig,
    /// Local tool configuration
    #[serde(default)]
    pub tools: ToolsConfig,
}

/// Anthropic endpoint configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnthropicConfig {
    /// Base URL of the API (default: https://api.anthropic.com)
    pub base_url: String,
    /// Value of the `anthropic-version` header
    pub api_version: String,
    /// Request timeout in seconds; unset means wait indefinitely
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// API key, read from the environment once at load time
    #[serde(skip)]
    pub api_key: Option<String>,
}

/// Model selection
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model identifier sent with every request
    pub name: String,
    /// Maximum output tokens per reply
    pub max_tokens: u32,
}

/// Agent loop behaviour
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Whether to show debug logging
    pub debug: bool,
    /// Replaces the built-in system instruction
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Cap on model calls per session; unset means no cap
    #[serde(default)]
    pub max_steps: Option<usize>,
}

/// Local tool configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolsConfig {
    /// Kill shell commands running longer than this
    #[serde(default)]
    pub shell_timeout_secs: Option<u64>,
    /// Shell program used to run commands (default: sh, or cmd on Windows)
    #[serde(default)]
    pub shell: Option<String>,
}

fn env_flag(key: &str) -> bool {
    env::var(key)
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false)
}

fn api_key_from_env() -> Option<String> {
    env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty())
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            base_url: env::var("ANTHROPIC_BASE_URL")
                .unwrap_or_else(|_| "https://api.anthropic.com".to_string()),
            api_version: "2023-06-01".to_string(),
            timeout_secs: None,
            api_key: api_key_from_env(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: env::var("THINKLOOP_MODEL")
                .unwrap_or_else(|_| "claude-3-7-sonnet-20250219".to_string()),
            max_tokens: env::var("THINKLOOP_MAX_TOKENS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1024),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            debug: env_flag("THINKLOOP_DEBUG"),
            system_prompt: None,
            max_steps: None,
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("thinkloop")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from `.env`, the config file, and defaults.
    ///
    /// A missing config file means defaults; a malformed one is an error.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let mut config = Self::load_from(&Self::config_file())?.unwrap_or_default();

        // The file never carries the credential.
        config.anthropic.api_key = api_key_from_env();
        Ok(config)
    }

    /// Load configuration from a TOML file, `None` if it does not exist
    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|e| {
            AgentError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        toml::from_str(&content).map(Some).map_err(|e| {
            AgentError::config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Return the API key, or a config error naming the missing variable
    pub fn require_api_key(&self) -> Result<&str> {
        self.anthropic.api_key.as_deref().ok_or_else(|| {
            AgentError::config(format!("{} is not set", API_KEY_ENV))
        })
    }

    /// Full URL of the messages endpoint
    pub fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.anthropic.base_url.trim_end_matches('/'))
    }
}
