pub mod config;
pub mod logging;

pub use config::{Config, ConfigError, DispatchMode, LogFormat, LogLevel};
pub use logging::{InitializationError, LoggingSystem, setup_logging};

use crate::domain::{LevelTag, LogEvent, Outcome, ReporterError};
use crate::reporter::Reporter;
use anyhow::Context;
use clap::Parser;
use tokio::io::AsyncReadExt;
use tracing::{info, warn};

/// Command line of the `errorstream-reporter` binary.
#[derive(Parser, Debug)]
#[command(author, version, about = "Forwards log lines read from stdin to ErrorStream", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub config: Config,

    /// Level tag attached to every forwarded entry
    #[arg(long, default_value = "error")]
    pub tag: String,

    /// Forward all of stdin as a single multi-line entry
    #[arg(long)]
    pub whole_input: bool,
}

impl Cli {
    pub fn load<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut cli = Cli::try_parse_from(args)?;

        if let Some(config_file) = cli.config.config_file.clone() {
            cli.config = Config::from_file(&config_file)?;
        } else {
            cli.config.post_process()?;
            cli.config.validate()?;
        }

        Ok(cli)
    }
}

/// Splits stdin into log events, one per non-empty line unless `whole_input`.
pub fn entries_from_input(input: &str, tag: &str, whole_input: bool) -> Vec<LogEvent> {
    let level = LevelTag::from(tag);

    if whole_input {
        let text = input.trim_end_matches(['\n', '\r']);
        if text.trim().is_empty() {
            return Vec::new();
        }
        return vec![LogEvent::new(text, level)];
    }

    input
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| LogEvent::new(line, level.clone()))
        .collect()
}

pub async fn run(cli: Cli) -> Result<(), ReporterError> {
    let Cli {
        mut config,
        tag,
        whole_input,
    } = cli;

    setup_logging(&config)?;

    // The process exits right after reading stdin, so background sends would be lost
    if config.dispatch != DispatchMode::Inline {
        info!("forcing inline dispatch for stdin forwarding");
        config.dispatch = DispatchMode::Inline;
    }

    let reporter = Reporter::new(&config)?;

    let mut input = String::new();
    if let Err(e) = tokio::io::stdin().read_to_string(&mut input).await {
        warn!(error = %e, "failed to read stdin");
        return Ok(());
    }

    let entries = entries_from_input(&input, &tag, whole_input);
    let outcomes = reporter.report_logs(&entries).await;
    let delivered = outcomes.iter().filter(|o| o.is_delivered()).count();
    let suppressed = outcomes
        .iter()
        .filter(|o| matches!(o, Outcome::Suppressed(_)))
        .count();

    info!(
        entries = entries.len(),
        delivered,
        suppressed,
        dropped = entries.len() - delivered - suppressed,
        "stdin forwarded"
    );

    Ok(())
}

pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// Main entry point for the binary
pub async fn main() -> anyhow::Result<()> {
    let cli = match Cli::load(std::env::args_os()) {
        Ok(cli) => cli,
        Err(ConfigError::Cli(e)) => e.exit(),
        Err(e) => return Err(e).context("failed to load configuration"),
    };

    run(cli)
        .await
        .with_context(|| format!("errorstream-reporter {} failed", get_version()))
}
