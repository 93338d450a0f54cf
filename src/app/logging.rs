use super::config::{Config, LogFormat, LogLevel};
use clap::ValueEnum;
use parking_lot::RwLock;
use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Error, Debug)]
pub enum InitializationError {
    #[error("Invalid log directive '{directive}': {reason}")]
    InvalidDirective { directive: String, reason: String },

    #[error("Logging initialization failed: {details}")]
    LoggingInitFailed {
        details: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// A single `target=level` filter directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogDirective {
    pub target: String,
    pub level: LogLevel,
}

impl LogDirective {
    pub fn new(target: impl Into<String>, level: LogLevel) -> Self {
        Self {
            target: target.into(),
            level,
        }
    }

    pub fn parse(directive: &str) -> Result<Self, InitializationError> {
        let invalid = |reason: &str| InitializationError::InvalidDirective {
            directive: directive.to_string(),
            reason: reason.to_string(),
        };

        let (target, level) = directive
            .split_once('=')
            .ok_or_else(|| invalid("expected 'target=level'"))?;

        let target = target.trim();
        if target.is_empty() {
            return Err(invalid("empty target"));
        }

        let level = LogLevel::from_str(level.trim(), true).map_err(|_| invalid("unknown level"))?;

        Ok(Self::new(target, level))
    }

    pub fn to_filter_string(&self) -> String {
        format!("{}={}", self.target, self.level.as_str())
    }
}

/// Builds and installs the reporter's own tracing subscriber.
pub struct LoggingSystem {
    directives: RwLock<Vec<LogDirective>>,
    format: LogFormat,
}

impl LoggingSystem {
    pub fn new(format: LogFormat) -> Self {
        Self {
            directives: RwLock::new(Vec::new()),
            format,
        }
    }

    pub fn add_directive(&self, directive: &str) -> Result<(), InitializationError> {
        let directive = LogDirective::parse(directive)?;
        self.directives.write().push(directive);
        Ok(())
    }

    /// Quiets the HTTP stack so only the reporter's own events show up.
    pub fn add_default_directives(&self) {
        let mut directives = self.directives.write();
        for target in ["hyper", "hyper_util", "reqwest", "h2", "rustls"] {
            directives.push(LogDirective::new(target, LogLevel::Warn));
        }
    }

    pub fn build_filter_string(&self, default_level: LogLevel) -> String {
        let directives = self.directives.read();

        std::iter::once(default_level.as_str().to_string())
            .chain(directives.iter().map(LogDirective::to_filter_string))
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn directive_count(&self) -> usize {
        self.directives.read().len()
    }

    /// Installs the global subscriber. `RUST_LOG`, when set, overrides the
    /// configured filter.
    pub fn initialize(&self, default_level: LogLevel) -> Result<(), InitializationError> {
        let filter_string = self.build_filter_string(default_level);

        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::try_new(&filter_string).map_err(|e| {
                InitializationError::LoggingInitFailed {
                    details: format!("Failed to create EnvFilter with '{filter_string}'"),
                    source: Box::new(e),
                }
            })?,
        };

        let registry = tracing_subscriber::registry().with(env_filter);
        let result = match self.format {
            LogFormat::Compact => registry
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(std::io::stderr)
                        .compact(),
                )
                .try_init(),
            LogFormat::Json => registry
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_writer(std::io::stderr)
                        .json(),
                )
                .try_init(),
        };

        result.map_err(|e| InitializationError::LoggingInitFailed {
            details: "Failed to set global tracing subscriber".to_string(),
            source: Box::new(e),
        })
    }
}

/// Sets up logging for the binary from its configuration.
pub fn setup_logging(config: &Config) -> Result<(), InitializationError> {
    let logging_system = LoggingSystem::new(config.log_format);
    logging_system.add_default_directives();
    logging_system.initialize(config.log_level)
}
