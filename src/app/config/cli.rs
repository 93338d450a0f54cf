use super::env_helpers::{
    deserialize_list, load_env_enum, load_env_list, load_env_path_opt, load_env_string,
    load_env_var,
};
use super::{ConfigError, DispatchMode, LogFormat, LogLevel};
use crate::domain::LevelTag;
use crate::normalizer::policy::{DEFAULT_SUPPRESSED_MARKER, DEFAULT_SUPPRESSED_STATUS};
use crate::normalizer::{NormalizerSettings, SuppressionPolicy};
use crate::sender::ClientConfig;
use crate::sender::client::DEFAULT_ENDPOINT;
use clap::{ArgAction, Parser};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_USER_AGENT: &str = concat!("errorstream-reporter/", env!("CARGO_PKG_VERSION"));

#[derive(Parser, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// ErrorStream report endpoint; credentials are appended as query parameters
    #[arg(long, env = "ERRORSTREAM_URL", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// ErrorStream API token
    #[arg(long, env = "ERRORSTREAM_API_TOKEN", default_value = "", hide_env_values = true)]
    pub api_token: String,

    /// ErrorStream project token
    #[arg(long, env = "ERRORSTREAM_PROJECT_TOKEN", default_value = "", hide_env_values = true)]
    pub project_token: String,

    /// Report anything at all
    #[arg(long, env = "ERRORSTREAM_ENABLED", default_value_t = true, action = ArgAction::Set)]
    pub enabled: bool,

    /// Development mode: nothing is reported
    #[arg(long, env = "ERRORSTREAM_DEBUG")]
    pub debug_mode: bool,

    /// Log level tags to report (comma-separated, empty reports all)
    #[arg(long, env = "ERRORSTREAM_LEVELS", value_delimiter = ',')]
    #[serde(deserialize_with = "deserialize_list")]
    pub levels: Vec<String>,

    /// Report raw log events in addition to exceptions
    #[arg(
        long,
        env = "ERRORSTREAM_REPORT_LOG_EVENTS",
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub report_log_events: bool,

    /// Exception status codes that are never reported
    #[arg(
        long,
        env = "ERRORSTREAM_SUPPRESS_STATUS_CODES",
        value_delimiter = ',',
        default_value = DEFAULT_SUPPRESSED_STATUS
    )]
    pub suppress_status_codes: Vec<String>,

    /// Log text markers that are never reported
    #[arg(
        long,
        env = "ERRORSTREAM_SUPPRESS_MARKERS",
        value_delimiter = ',',
        default_value = DEFAULT_SUPPRESSED_MARKER
    )]
    pub suppress_markers: Vec<String>,

    /// Connection timeout in seconds
    #[arg(long, env = "ERRORSTREAM_CONNECT_TIMEOUT_SECS", default_value = "10")]
    pub connect_timeout_secs: u64,

    /// Total request timeout in seconds
    #[arg(long, env = "ERRORSTREAM_REQUEST_TIMEOUT_SECS", default_value = "10")]
    pub request_timeout_secs: u64,

    /// Skip TLS certificate validation
    #[arg(
        long,
        env = "ERRORSTREAM_ACCEPT_INVALID_CERTS",
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub accept_invalid_certs: bool,

    /// Inline or background delivery
    #[arg(long, env = "ERRORSTREAM_DISPATCH", default_value = "inline")]
    pub dispatch: DispatchMode,

    /// Maximum concurrent background deliveries
    #[arg(long, env = "ERRORSTREAM_MAX_IN_FLIGHT", default_value = "32")]
    pub max_in_flight: usize,

    /// User-Agent sent with every report
    #[arg(long, env = "ERRORSTREAM_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Log level of the reporter itself
    #[arg(long, env = "ERRORSTREAM_LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Log format of the reporter itself
    #[arg(long, env = "ERRORSTREAM_LOG_FORMAT", default_value = "compact")]
    pub log_format: LogFormat,

    /// Configuration file path (optional)
    #[arg(long, env = "ERRORSTREAM_CONFIG_FILE")]
    pub config_file: Option<PathBuf>,

    /// Derived fields (not CLI arguments)
    #[serde(skip)]
    #[arg(skip)]
    pub connect_timeout: Duration,

    #[serde(skip)]
    #[arg(skip)]
    pub request_timeout: Duration,

    #[serde(skip)]
    #[arg(skip)]
    pub level_filter: Option<HashSet<LevelTag>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_token: String::new(),
            project_token: String::new(),
            enabled: true,
            debug_mode: false,
            levels: Vec::new(),
            report_log_events: true,
            suppress_status_codes: vec![DEFAULT_SUPPRESSED_STATUS.to_string()],
            suppress_markers: vec![DEFAULT_SUPPRESSED_MARKER.to_string()],
            connect_timeout_secs: 10,
            request_timeout_secs: 10,
            accept_invalid_certs: true,
            dispatch: DispatchMode::Inline,
            max_in_flight: 32,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            log_level: LogLevel::Info,
            log_format: LogFormat::Compact,
            config_file: None,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(10),
            level_filter: None,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("endpoint", &self.endpoint)
            .field("api_token", &"<redacted>")
            .field("project_token", &"<redacted>")
            .field("enabled", &self.enabled)
            .field("debug_mode", &self.debug_mode)
            .field("levels", &self.levels)
            .field("report_log_events", &self.report_log_events)
            .field("suppress_status_codes", &self.suppress_status_codes)
            .field("suppress_markers", &self.suppress_markers)
            .field("connect_timeout", &self.connect_timeout)
            .field("request_timeout", &self.request_timeout)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .field("dispatch", &self.dispatch)
            .field("max_in_flight", &self.max_in_flight)
            .field("log_level", &self.log_level)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut config = Config::try_parse_from(args)?;
        config.post_process()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        // A whole TOML document takes precedence over individual variables
        if let Ok(document) = std::env::var("ERRORSTREAM_CONFIG") {
            return Self::from_toml_str(&document);
        }

        let mut config = Config::default();

        load_env_string("ERRORSTREAM_URL", &mut config.endpoint);
        load_env_string("ERRORSTREAM_API_TOKEN", &mut config.api_token);
        load_env_string("ERRORSTREAM_PROJECT_TOKEN", &mut config.project_token);
        load_env_var("ERRORSTREAM_ENABLED", &mut config.enabled)?;
        load_env_var("ERRORSTREAM_DEBUG", &mut config.debug_mode)?;
        load_env_list("ERRORSTREAM_LEVELS", &mut config.levels);
        load_env_var("ERRORSTREAM_REPORT_LOG_EVENTS", &mut config.report_log_events)?;
        load_env_list(
            "ERRORSTREAM_SUPPRESS_STATUS_CODES",
            &mut config.suppress_status_codes,
        );
        load_env_list("ERRORSTREAM_SUPPRESS_MARKERS", &mut config.suppress_markers);
        load_env_var(
            "ERRORSTREAM_CONNECT_TIMEOUT_SECS",
            &mut config.connect_timeout_secs,
        )?;
        load_env_var(
            "ERRORSTREAM_REQUEST_TIMEOUT_SECS",
            &mut config.request_timeout_secs,
        )?;
        load_env_var(
            "ERRORSTREAM_ACCEPT_INVALID_CERTS",
            &mut config.accept_invalid_certs,
        )?;
        load_env_enum("ERRORSTREAM_DISPATCH", &mut config.dispatch)?;
        load_env_var("ERRORSTREAM_MAX_IN_FLIGHT", &mut config.max_in_flight)?;
        load_env_string("ERRORSTREAM_USER_AGENT", &mut config.user_agent);
        load_env_enum("ERRORSTREAM_LOG_LEVEL", &mut config.log_level)?;
        load_env_enum("ERRORSTREAM_LOG_FORMAT", &mut config.log_format)?;
        load_env_path_opt("ERRORSTREAM_CONFIG_FILE", &mut config.config_file);

        config.post_process()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(document: &str) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(document)?;
        config.post_process()?;
        config.validate()?;
        Ok(config)
    }

    pub fn post_process(&mut self) -> Result<(), ConfigError> {
        self.connect_timeout = Duration::from_secs(self.connect_timeout_secs);
        self.request_timeout = Duration::from_secs(self.request_timeout_secs);

        let levels: HashSet<LevelTag> = self
            .levels
            .iter()
            .map(|tag| tag.trim())
            .filter(|tag| !tag.is_empty())
            .map(LevelTag::from)
            .collect();
        self.level_filter = (!levels.is_empty()).then_some(levels);

        Ok(())
    }

    /// Whether the configuration lets anything reach the network.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.debug_mode
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            endpoint: self.endpoint.clone(),
            api_token: self.api_token.clone(),
            project_token: self.project_token.clone(),
            timeout: self.request_timeout,
            connection_timeout: self.connect_timeout,
            user_agent: self.user_agent.clone(),
            accept_invalid_certs: self.accept_invalid_certs,
        }
    }

    pub fn normalizer_settings(&self) -> NormalizerSettings {
        NormalizerSettings {
            enabled: self.enabled,
            debug_mode: self.debug_mode,
            report_log_events: self.report_log_events,
            levels: self.level_filter.clone(),
            policy: SuppressionPolicy {
                status_codes: self.suppress_status_codes.clone(),
                markers: self.suppress_markers.clone(),
            },
        }
    }
}
