pub mod analysis;
pub mod config;
pub mod input;
pub mod models;
pub mod narrative;
pub mod output;

// Re-export commonly used types
pub use analysis::{analyze_log, classify};
pub use config::{Config, ConfigError};
pub use input::{InputError, LogLoader, RawLog};
pub use models::{CommandSlot, CountrySlot, LogReport, ThreatLevel};
pub use narrative::{NarrativeClient, NarrativeError};
pub use output::{OutputError, OutputFormat, OutputHandler};

use thiserror::Error;

/// Top-level error for the honeypy pipeline
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Narrative(#[from] NarrativeError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

pub type Result<T> = std::result::Result<T, Error>;
