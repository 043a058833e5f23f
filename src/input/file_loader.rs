use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::analysis::analyze_log;
use crate::config::InputConfig;
use crate::models::LogReport;

/// Errors raised while reading a log before analysis
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Log file not found: {0}")]
    NotFound(PathBuf),

    #[error("Unsupported log file extension: {0}")]
    UnsupportedExtension(PathBuf),

    #[error("Log file is {size} bytes, above the {limit} byte limit")]
    TooLarge { size: u64, limit: u64 },

    #[error("Log file is not valid UTF-8 text: {0}")]
    NotText(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A complete log held in memory together with its origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLog {
    pub text: String,
    pub source_name: String,
}

impl RawLog {
    pub fn new(text: impl Into<String>, source_name: impl Into<String>) -> Self {
        RawLog {
            text: text.into(),
            source_name: source_name.into(),
        }
    }

    /// Run the analyzer over this log
    pub fn analyze(&self) -> LogReport {
        analyze_log(&self.text, &self.source_name)
    }
}

/// Reads whole honeypot logs from disk.
///
/// Enforces a size cap so a pathological file is rejected before the
/// analyzer sees it.
#[derive(Debug, Clone)]
pub struct LogLoader {
    max_bytes: u64,
    extensions: Vec<String>,
}

impl LogLoader {
    pub const DEFAULT_MAX_BYTES: u64 = 10 * 1024 * 1024;

    /// Create a loader accepting `.log` and `.txt` files up to 10 MiB
    pub fn new() -> Self {
        LogLoader {
            max_bytes: Self::DEFAULT_MAX_BYTES,
            extensions: vec!["log".to_string(), "txt".to_string()],
        }
    }

    /// Create with custom limits. An empty extension list accepts any file.
    pub fn with_limits(max_bytes: u64, extensions: Vec<String>) -> Self {
        LogLoader {
            max_bytes,
            extensions: extensions
                .into_iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    pub fn from_config(config: &InputConfig) -> Self {
        Self::with_limits(config.max_bytes, config.extensions.clone())
    }

    /// Load a log file synchronously
    pub fn load(&self, path: &Path) -> Result<RawLog, InputError> {
        self.check_path(path)?;

        let size = std::fs::metadata(path)?.len();
        self.check_size(size)?;

        let bytes = std::fs::read(path)?;
        let raw = Self::decode(path, bytes)?;
        log::info!("Loaded {} ({} bytes)", raw.source_name, size);
        Ok(raw)
    }

    /// Load a log file on the tokio runtime
    pub async fn load_async(&self, path: &Path) -> Result<RawLog, InputError> {
        self.check_path(path)?;

        let size = tokio::fs::metadata(path).await?.len();
        self.check_size(size)?;

        let bytes = tokio::fs::read(path).await?;
        let raw = Self::decode(path, bytes)?;
        log::info!("Loaded {} ({} bytes)", raw.source_name, size);
        Ok(raw)
    }

    fn check_path(&self, path: &Path) -> Result<(), InputError> {
        if !path.exists() {
            return Err(InputError::NotFound(path.to_path_buf()));
        }

        if self.extensions.is_empty() {
            return Ok(());
        }

        let accepted = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.contains(&ext.to_lowercase()))
            .unwrap_or(false);

        if accepted {
            Ok(())
        } else {
            Err(InputError::UnsupportedExtension(path.to_path_buf()))
        }
    }

    fn check_size(&self, size: u64) -> Result<(), InputError> {
        if size > self.max_bytes {
            return Err(InputError::TooLarge {
                size,
                limit: self.max_bytes,
            });
        }
        Ok(())
    }

    fn decode(path: &Path, bytes: Vec<u8>) -> Result<RawLog, InputError> {
        let text = String::from_utf8(bytes).map_err(|_| InputError::NotText(path.to_path_buf()))?;
        Ok(RawLog::new(text, source_name(path)))
    }
}

impl Default for LogLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// File name component of `path`, or the whole path when there is none
fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
