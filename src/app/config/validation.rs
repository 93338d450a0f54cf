use super::{Config, ConfigError};
use tokio::sync::Semaphore;
use url::Url;

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.endpoint).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid endpoint URL '{}': {}", self.endpoint, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl(format!(
                "Endpoint URL '{}' must use http or https",
                self.endpoint
            )));
        }

        // Credentials only matter once something can actually be sent
        if self.is_active() {
            if self.api_token.trim().is_empty() {
                return Err(ConfigError::InvalidConfig(
                    "API token must be set when reporting is enabled".to_string(),
                ));
            }
            if self.project_token.trim().is_empty() {
                return Err(ConfigError::InvalidConfig(
                    "Project token must be set when reporting is enabled".to_string(),
                ));
            }
        }

        if self.connect_timeout_secs == 0 {
            return Err(ConfigError::InvalidConfig(
                "Connection timeout must be greater than 0".to_string(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidConfig(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        if self.max_in_flight == 0 {
            return Err(ConfigError::InvalidConfig(
                "Max in-flight reports must be greater than 0".to_string(),
            ));
        }

        if self.max_in_flight > Semaphore::MAX_PERMITS {
            return Err(ConfigError::InvalidConfig(format!(
                "Max in-flight reports must not exceed {}",
                Semaphore::MAX_PERMITS
            )));
        }

        Ok(())
    }
}
