use crate::models::{LogReport, ThreatLevel};
use crate::narrative::Block;
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while writing reports
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Width of the console percentage bar
const BAR_WIDTH: usize = 20;

/// Output handler for log reports
pub struct OutputHandler {
    format: OutputFormat,
    writer: Option<Box<dyn Write + Send>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Jsonl,
    Console,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "jsonl" => OutputFormat::Jsonl,
            "console" => OutputFormat::Console,
            _ => OutputFormat::Json, // Default
        }
    }
}

impl OutputHandler {
    /// Create a new output handler writing to `file_path` (appending) or stdout
    pub fn new(format: OutputFormat, file_path: Option<PathBuf>) -> Result<Self, OutputError> {
        let writer: Option<Box<dyn Write + Send>> = match file_path {
            Some(path) => {
                let file = OpenOptions::new().create(true).append(true).open(path)?;
                Some(Box::new(BufWriter::new(file)))
            }
            None => None,
        };

        Ok(OutputHandler { format, writer })
    }

    /// Create a handler writing into an arbitrary sink
    pub fn with_writer(format: OutputFormat, writer: Box<dyn Write + Send>) -> Self {
        OutputHandler {
            format,
            writer: Some(writer),
        }
    }

    /// Write a log report on its own
    pub fn write_report(&mut self, report: &LogReport) -> Result<(), OutputError> {
        self.write_analysis(report, None)
    }

    /// Write a report together with its narrative blocks, if any.
    ///
    /// JSON formats emit a single document: the bare report when there is
    /// no narrative, otherwise `{"report": ..., "narrative": [...]}`.
    pub fn write_analysis(
        &mut self,
        report: &LogReport,
        narrative: Option<&[Block]>,
    ) -> Result<(), OutputError> {
        let output = match (self.format, narrative) {
            (OutputFormat::Json, None) => format!("{}\n", serde_json::to_string_pretty(report)?),
            (OutputFormat::Jsonl, None) => format!("{}\n", serde_json::to_string(report)?),
            (OutputFormat::Json, Some(blocks)) => format!(
                "{}\n",
                serde_json::to_string_pretty(&combined(report, blocks))?
            ),
            (OutputFormat::Jsonl, Some(blocks)) => {
                format!("{}\n", serde_json::to_string(&combined(report, blocks))?)
            }
            (OutputFormat::Console, None) => render_report(report),
            (OutputFormat::Console, Some(blocks)) => {
                let mut out = render_report(report);
                out.push_str(&render_narrative(blocks));
                out
            }
        };
        self.write_output(&output)
    }

    fn write_output(&mut self, data: &str) -> Result<(), OutputError> {
        match &mut self.writer {
            Some(writer) => {
                writer.write_all(data.as_bytes())?;
                writer.flush()?;
            }
            None => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(data.as_bytes())?;
                stdout.flush()?;
            }
        }
        Ok(())
    }

    /// Flush any buffered output
    pub fn flush(&mut self) -> Result<(), OutputError> {
        if let Some(writer) = &mut self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}

fn combined(report: &LogReport, blocks: &[Block]) -> serde_json::Value {
    serde_json::json!({ "report": report, "narrative": blocks })
}

fn render_report(report: &LogReport) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "=== Honeypot Threat Report: {} ({}) ===\n",
        report.raw_log,
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!(
        "Total attacks: {}  Unique IPs: {}  Blocked: {}  Commands captured: {}\n",
        report.total_attacks, report.unique_ips, report.blocked_attempts, report.commands_captured
    ));

    out.push_str("\nTop attack sources:\n");
    for slot in &report.top_countries {
        out.push_str(&format!(
            "  {:<18} {:>6}  {:<width$} {:>3}%\n",
            slot.name,
            slot.attacks,
            percentage_bar(slot.percentage),
            slot.percentage,
            width = BAR_WIDTH
        ));
    }

    out.push_str("\nTop commands:\n");
    for slot in &report.top_commands {
        out.push_str(&format!(
            "  [{:<8}] {:>6}  {}\n",
            threat_label(slot.threat),
            slot.count,
            slot.command
        ));
    }

    out
}

fn render_narrative(blocks: &[Block]) -> String {
    let mut out = String::from("\n");
    for block in blocks {
        let text = block.text();
        match block {
            Block::Heading(_) => out.push_str(&format!("{}\n{}\n", text, underline(text, '='))),
            Block::Subheading(_) => {
                out.push_str(&format!("{}\n{}\n", text, underline(text, '-')))
            }
            Block::ListItem(_) => out.push_str(&format!("  {}\n", text)),
            Block::Paragraph(_) => out.push_str(&format!("{}\n", text)),
        }
        out.push('\n');
    }
    out
}

fn underline(text: &str, marker: char) -> String {
    marker.to_string().repeat(text.chars().count())
}

fn percentage_bar(percentage: u32) -> String {
    let filled = (percentage.min(100) as usize * BAR_WIDTH + 50) / 100;
    "#".repeat(filled)
}

fn threat_label(threat: ThreatLevel) -> String {
    threat.as_str().to_uppercase()
}
