//! Narrative threat analysis
//!
//! Summarizes a [`LogReport`](crate::models::LogReport) into a prompt for an
//! external text-generation service and splits the markdown it returns
//! into displayable blocks. The service is optional: its failures are
//! reported to the caller and never touch the analyzer.

pub mod client;
pub mod markdown;
pub mod prompt;

pub use client::{NarrativeClient, NarrativeError};
pub use markdown::{split_blocks, Block};
pub use prompt::{build_prompt, NarrativeRequest, SYSTEM_INSTRUCTION};
