use std::path::{Path, PathBuf};
use structopt::StructOpt;

use honeypy::config::Config;
use honeypy::input::LogLoader;
use honeypy::narrative::{split_blocks, NarrativeClient};
use honeypy::output::{OutputFormat, OutputHandler};

/// Honeypot log threat analyzer
#[derive(StructOpt, Debug)]
#[structopt(name = "honeypy", about = "Honeypot audit log threat analyzer")]
pub enum Cli {
    /// Analyze a honeypot log and print its threat report
    Analyze {
        /// Path to the log file (cmd_audits.log, creds_audits.log, http_audit.log, ...)
        #[structopt(short, long)]
        file: PathBuf,
        /// Path to configuration file
        #[structopt(short, long)]
        config: Option<PathBuf>,
        /// Output format: json, jsonl or console (overrides config)
        #[structopt(long)]
        format: Option<String>,
        /// Append output to this file instead of stdout (overrides config)
        #[structopt(short, long)]
        output: Option<PathBuf>,
        /// Request a narrative analysis from the configured service
        #[structopt(short, long)]
        narrate: bool,
    },
    /// Generate a default configuration file
    Config {
        /// Output path for the configuration file
        #[structopt(short, long, default_value = "honeypy.toml")]
        output: PathBuf,
    },
    /// Print the threat level of one or more commands
    Classify {
        /// Commands to classify
        #[structopt(required = true)]
        commands: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let cli = Cli::from_args();

    match cli {
        Cli::Analyze {
            file,
            config,
            format,
            output,
            narrate,
        } => {
            let config = load_config(config.as_deref())?;
            if let Err(e) = analyze(&file, config, format, output, narrate).await {
                log::error!("Analysis failed: {}", e);
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Cli::Config { output } => {
            let config = Config::default();
            config.to_file(&output)?;
            println!("Default configuration written to: {:?}", output);
        }
        Cli::Classify { commands } => {
            for command in commands {
                println!("{:<8} {}", honeypy::classify(&command), command);
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> honeypy::Result<Config> {
    match path {
        Some(path) => Ok(Config::from_file(path)?),
        None => {
            log::debug!("No config file given, using defaults");
            Ok(Config::default())
        }
    }
}

async fn analyze(
    file: &Path,
    config: Config,
    format: Option<String>,
    output: Option<PathBuf>,
    narrate: bool,
) -> honeypy::Result<()> {
    let loader = LogLoader::from_config(&config.input);
    let raw = loader.load_async(file).await?;
    let report = raw.analyze();

    log::info!(
        "{}: {} attack line(s), {} unique IP(s), {} command(s), max threat {}",
        report.raw_log,
        report.total_attacks,
        report.unique_ips,
        report.commands_captured,
        report.max_threat()
    );

    if !report.has_data() {
        log::warn!(
            "No IP addresses or commands recognized in {}",
            report.raw_log
        );
    }

    let narrative = if narrate || config.narrative.enabled {
        // Narrative failures are reported but do not fail the analysis
        let markdown = match NarrativeClient::new(config.narrative) {
            Ok(client) => client.analyze(&report).await,
            Err(e) => Err(e),
        };

        match markdown {
            Ok(markdown) => Some(split_blocks(&markdown)),
            Err(e) => {
                log::error!("Narrative analysis failed: {}", e);
                eprintln!("Narrative analysis failed: {}", e);
                None
            }
        }
    } else {
        None
    };

    let format = OutputFormat::from_str(format.as_deref().unwrap_or(&config.output.format));
    let mut output_handler = OutputHandler::new(format, output.or(config.output.file_path))?;
    output_handler.write_analysis(&report, narrative.as_deref())?;
    output_handler.flush()?;
    Ok(())
}
