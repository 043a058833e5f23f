use serde::{Deserialize, Serialize};

use crate::models::LogReport;

/// Fixed instruction sent with every narrative request
pub const SYSTEM_INSTRUCTION: &str = "You are a threat intelligence analyst reviewing honeypot \
captures. Write a concise markdown report. Use `## ` for the report title and `### ` for \
section headings, separate every block with a blank line, and write recommendations as a \
numbered list. Cover attack patterns, likely attacker intent, and concrete security \
recommendations. Do not invent data that is not in the metrics.";

/// Prompt pair for the narrative service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeRequest {
    pub system: String,
    pub prompt: String,
}

/// Build the narrative prompt from a report's metrics
pub fn build_prompt(report: &LogReport) -> NarrativeRequest {
    let mut prompt = format!("Analyze these honeypot metrics from {}.\n\n", report.raw_log);

    prompt.push_str(&format!("Total attacks: {}\n", report.total_attacks));
    prompt.push_str(&format!("Unique IPs: {}\n", report.unique_ips));
    prompt.push_str(&format!(
        "Blocked attempts (estimated): {}\n",
        report.blocked_attempts
    ));
    prompt.push_str(&format!(
        "Distinct commands captured: {}\n",
        report.commands_captured
    ));

    prompt.push_str("\nTop attack sources:\n");
    let sources: Vec<_> = report
        .top_countries
        .iter()
        .filter(|slot| !slot.is_sentinel())
        .collect();
    if sources.is_empty() {
        prompt.push_str("- none observed\n");
    }
    for slot in sources {
        prompt.push_str(&format!(
            "- {}: {} attacks ({}%)\n",
            slot.name, slot.attacks, slot.percentage
        ));
    }

    prompt.push_str("\nTop commands:\n");
    let commands: Vec<_> = report
        .top_commands
        .iter()
        .filter(|slot| !slot.is_sentinel())
        .collect();
    if commands.is_empty() {
        prompt.push_str("- none observed\n");
    }
    for slot in commands {
        prompt.push_str(&format!(
            "- `{}` x{} (threat: {})\n",
            slot.command, slot.count, slot.threat
        ));
    }

    NarrativeRequest {
        system: SYSTEM_INSTRUCTION.to_string(),
        prompt,
    }
}
