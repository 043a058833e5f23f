//! Honeypot log analysis
//!
//! Turns a complete log blob into a [`LogReport`]: line segmentation,
//! IP and command extraction, frequency ranking, and command threat
//! classification. Every call owns its own tables; nothing is shared
//! between invocations.

pub mod classifier;
pub mod extract;
pub mod frequency;

pub use classifier::classify;
pub use extract::{extract_commands, extract_ips, segment_lines};
pub use frequency::FrequencyTable;

use crate::models::{CommandSlot, CountrySlot, LogReport};

/// Number of attack sources kept in the report
pub const TOP_COUNTRIES: usize = 5;
/// Number of commands kept in the report
pub const TOP_COMMANDS: usize = 10;
/// Share of attacks reported as blocked
pub const BLOCKED_RATIO: f64 = 0.95;

/// Analyze a complete log and build its report.
///
/// Never fails: input without any recognizable IP or command yields
/// the sentinel rank entries.
pub fn analyze_log(text: &str, source_name: &str) -> LogReport {
    let mut total_attacks = 0usize;
    let mut ips = FrequencyTable::new();
    let mut commands = FrequencyTable::new();

    for line in segment_lines(text) {
        total_attacks += 1;

        for ip in extract_ips(line) {
            ips.record(ip);
        }
        for command in extract_commands(line) {
            commands.record(command);
        }
    }

    let mut top_countries: Vec<CountrySlot> = ips
        .ranked(TOP_COUNTRIES)
        .into_iter()
        .map(|(ip, attacks)| CountrySlot {
            name: ip.to_string(),
            attacks,
            percentage: percentage(attacks, total_attacks),
        })
        .collect();
    if top_countries.is_empty() {
        top_countries.push(CountrySlot::no_data());
    }

    let mut top_commands: Vec<CommandSlot> = commands
        .ranked(TOP_COMMANDS)
        .into_iter()
        .map(|(command, count)| CommandSlot {
            command: command.to_string(),
            count,
            threat: classify(command),
        })
        .collect();
    if top_commands.is_empty() {
        top_commands.push(CommandSlot::no_commands());
    }

    log::debug!(
        "Analyzed {}: {} line(s), {} IP observation(s) from {} unique IP(s), \
         {} command observation(s) of {} distinct command(s)",
        source_name,
        total_attacks,
        ips.total(),
        ips.len(),
        commands.total(),
        commands.len()
    );

    LogReport {
        total_attacks,
        unique_ips: ips.len(),
        blocked_attempts: blocked_estimate(total_attacks),
        commands_captured: commands.len(),
        top_countries,
        top_commands,
        raw_log: source_name.to_string(),
    }
}

/// round(count / total * 100), or 0 when there are no lines
pub fn percentage(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (count as f64 / total as f64 * 100.0).round() as u32
}

/// Estimated blocked attempts, round(0.95 * total)
pub fn blocked_estimate(total_attacks: usize) -> usize {
    (BLOCKED_RATIO * total_attacks as f64).round() as usize
}
