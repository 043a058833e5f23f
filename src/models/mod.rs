pub mod report;

pub use report::{CommandSlot, CountrySlot, LogReport, ThreatLevel};
