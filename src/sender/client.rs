use reqwest::{Client, ClientBuilder};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://www.errorstream.com/api/1.0/errors/create";

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

#[derive(Clone)]
pub struct ClientConfig {
    pub endpoint: String,
    pub api_token: String,
    pub project_token: String,
    /// Upper bound for the whole request, connect included.
    pub timeout: Duration,
    pub connection_timeout: Duration,
    pub user_agent: String,
    pub accept_invalid_certs: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_token: String::new(),
            project_token: String::new(),
            timeout: Duration::from_secs(10),
            connection_timeout: Duration::from_secs(10),
            user_agent: format!("errorstream-reporter/{}", env!("CARGO_PKG_VERSION")),
            accept_invalid_certs: true,
        }
    }
}

// Credentials must not end up in log output.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("api_token", &"<redacted>")
            .field("project_token", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("connection_timeout", &self.connection_timeout)
            .field("user_agent", &self.user_agent)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionStats {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub average_response_time: Duration,
}

#[derive(Debug, Default)]
pub struct ClientStats {
    total_requests: AtomicU64,
    successful_requests: AtomicU64,
    failed_requests: AtomicU64,
    total_response_time: AtomicU64,
}

impl ClientStats {
    pub fn record_request(&self, success: bool, response_time: Duration) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.total_response_time
            .fetch_add(response_time.as_millis() as u64, Ordering::Relaxed);

        if success {
            self.successful_requests.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed_requests.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> ConnectionStats {
        let total_requests = self.total_requests.load(Ordering::Relaxed);
        let total_response_time = self.total_response_time.load(Ordering::Relaxed);

        let average_response_time = if total_requests > 0 {
            Duration::from_millis(total_response_time / total_requests)
        } else {
            Duration::ZERO
        };

        ConnectionStats {
            total_requests,
            successful_requests: self.successful_requests.load(Ordering::Relaxed),
            failed_requests: self.failed_requests.load(Ordering::Relaxed),
            average_response_time,
        }
    }
}

/// Pre-configured HTTP client pointed at the report endpoint.
#[derive(Debug, Clone)]
pub struct HttpClient {
    pub client: Client,
    pub config: ClientConfig,
    report_url: Url,
    pub stats: Arc<ClientStats>,
}

impl HttpClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let report_url =
            build_report_url(&config.endpoint, &config.api_token, &config.project_token)?;

        let client = ClientBuilder::new()
            .timeout(config.timeout)
            .connect_timeout(config.connection_timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            config,
            report_url,
            stats: Arc::new(ClientStats::default()),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Endpoint with both credentials appended as query parameters.
    pub fn report_url(&self) -> &Url {
        &self.report_url
    }

    pub fn connection_stats(&self) -> ConnectionStats {
        self.stats.snapshot()
    }
}

/// Appends `api_token` and `project_token` to the base URL, keeping any
/// query the base URL already carries.
pub fn build_report_url(
    endpoint: &str,
    api_token: &str,
    project_token: &str,
) -> Result<Url, ClientError> {
    let mut url = Url::parse(endpoint).map_err(|e| {
        ClientError::InvalidConfiguration(format!("Invalid endpoint URL '{endpoint}': {e}"))
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::InvalidConfiguration(format!(
            "Unsupported endpoint scheme '{}'",
            url.scheme()
        )));
    }

    url.query_pairs_mut()
        .append_pair("api_token", api_token)
        .append_pair("project_token", project_token);

    Ok(url)
}
