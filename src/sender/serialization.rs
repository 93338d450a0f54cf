use crate::domain::Report;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SerializationError {
    #[error("JSON serialization failed: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Serializes reports into the JSON body the remote service expects.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportSerializer;

impl ReportSerializer {
    pub fn new() -> Self {
        Self
    }

    pub fn serialize(&self, report: &Report) -> Result<Vec<u8>, SerializationError> {
        Ok(serde_json::to_vec(report)?)
    }
}
