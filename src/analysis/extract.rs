//! Signal extraction from individual log lines

use once_cell::sync::Lazy;
use regex::Regex;

/// Dotted-quad shaped token; octets are not range checked.
///
/// Boundaries are ASCII-only, so a non-ASCII letter next to the digits
/// does not hide the address.
static IP_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?-u:\b)[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}(?-u:\b)")
        .expect("valid IP pattern")
});

/// `Command:`, `executed:`, `ran:` or `tried:` followed by a value up to `|` or end of line
static LABELED_COMMAND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:command|executed|ran|tried):([^|]*)").expect("valid command pattern")
});

/// Markers that enable token scanning on a line (case-sensitive)
const SHELL_MARKERS: &[&str] = &["$", "sudo", "bash"];

/// Command names recognized at the start of a whitespace token
const COMMAND_PREFIXES: &[&str] = &[
    "ls", "cat", "wget", "curl", "rm", "chmod", "sudo", "bash", "sh", "cd", "pwd", "whoami",
    "id", "uname", "ps", "netstat", "ifconfig", "ping",
];

/// Split raw text into trimmed, non-empty lines, preserving order
pub fn segment_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').map(str::trim).filter(|line| !line.is_empty())
}

/// All IP-shaped tokens in a line, in order of appearance
pub fn extract_ips(line: &str) -> Vec<&str> {
    IP_PATTERN.find_iter(line).map(|m| m.as_str()).collect()
}

/// Candidate command strings from both extraction strategies.
///
/// The labeled value (if any) comes first, followed by every token
/// matching a known command prefix. Overlap between the two is kept.
pub fn extract_commands(line: &str) -> Vec<String> {
    let mut commands = Vec::new();

    if let Some(value) = labeled_command(line) {
        commands.push(value.to_string());
    }
    commands.extend(command_tokens(line).map(str::to_string));

    commands
}

fn labeled_command(line: &str) -> Option<&str> {
    let captures = LABELED_COMMAND.captures(line)?;
    let value = captures.get(1)?.as_str().trim();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn command_tokens(line: &str) -> impl Iterator<Item = &str> {
    let gated = SHELL_MARKERS.iter().any(|marker| line.contains(marker));
    line.split_whitespace()
        .filter(move |_| gated)
        .filter(|token| has_command_prefix(token))
}

fn has_command_prefix(token: &str) -> bool {
    let lower = token.to_lowercase();
    COMMAND_PREFIXES.iter().any(|prefix| lower.starts_with(prefix))
}
