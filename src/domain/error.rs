use crate::app::config::ConfigError;
use crate::app::logging::InitializationError;
use crate::sender::{ClientError, SerializationError, TransmissionError};
use thiserror::Error;

/// Top-level error type for construction-time failures.
///
/// Nothing on the reporting path returns this; it only surfaces while the
/// host is wiring the reporter up.
#[derive(Error, Debug)]
pub enum ReporterError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Logging initialization error: {0}")]
    Logging(#[from] InitializationError),

    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),

    #[error("Transmission error: {0}")]
    Transmission(#[from] TransmissionError),
}
