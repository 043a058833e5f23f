use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading or saving configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Configuration for the honeypy analyzer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log loading configuration
    pub input: InputConfig,
    /// Report output configuration
    pub output: OutputConfig,
    /// Narrative analysis service configuration
    pub narrative: NarrativeConfig,
}

/// Log loading configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Largest accepted log file in bytes
    pub max_bytes: u64,
    /// Accepted file extensions; empty accepts any file
    pub extensions: Vec<String>,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "json", "jsonl", or "console"
    pub format: String,
    /// Output file path (stdout when absent)
    pub file_path: Option<PathBuf>,
}

/// Narrative analysis service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeConfig {
    /// Request a narrative for every analyzed log
    pub enabled: bool,
    /// Messages API endpoint
    pub endpoint: String,
    /// Model identifier sent with each request
    pub model: String,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// API key; takes precedence over `api_key_env`
    pub api_key: Option<String>,
    /// Environment variable holding the API key
    pub api_key_env: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig {
            max_bytes: 10 * 1024 * 1024,
            extensions: vec!["log".to_string(), "txt".to_string()],
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            format: "console".to_string(),
            file_path: None,
        }
    }
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        NarrativeConfig {
            enabled: false,
            endpoint: "https://api.anthropic.com/v1/messages".to_string(),
            model: "claude-3-5-haiku-latest".to_string(),
            max_tokens: 1024,
            timeout_secs: 60,
            api_key: None,
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
        }
    }
}

impl NarrativeConfig {
    /// Resolve the API key from the config or the configured environment variable
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.is_empty())
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|key| !key.is_empty())
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}
