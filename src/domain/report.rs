use serde::{Deserialize, Serialize};
use std::fmt;

/// File name used when the originating file is unknown (plain log lines).
pub const UNKNOWN_FILE: &str = "N/A";

/// Ordinal severity understood by the remote service. Higher is more severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Severity {
    Info = 1,
    Warning = 2,
    Error = 3,
}

impl Severity {
    pub const MAX: Severity = Severity::Error;

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl From<Severity> for u8 {
    fn from(severity: Severity) -> Self {
        severity.as_u8()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidSeverity(pub u8);

impl fmt::Display for InvalidSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "severity {} is outside 1..=3", self.0)
    }
}

impl TryFrom<u8> for Severity {
    type Error = InvalidSeverity;

    fn try_from(value: u8) -> Result<Self, InvalidSeverity> {
        match value {
            1 => Ok(Severity::Info),
            2 => Ok(Severity::Warning),
            3 => Ok(Severity::Error),
            other => Err(InvalidSeverity(other)),
        }
    }
}

/// A fully normalized error report ready for transmission.
///
/// Built fresh for every inbound event and dropped after the send attempt.
/// All fields are always populated; text fields never contain raw newlines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub error_group: String,
    pub line_number: u32,
    pub file_name: String,
    pub message: String,
    pub stack_trace: String,
    pub severity: Severity,
}
