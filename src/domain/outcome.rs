use std::fmt;

/// Why an event was intentionally not reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuppressReason {
    /// Structured exception carried a suppressed status code (e.g. "404").
    StatusCode(String),
    /// Log text contained a suppression marker.
    Marker(String),
}

/// Why an event was dropped without being delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    Disabled,
    DebugMode,
    /// Structured exception was missing a required field.
    Malformed(&'static str),
    /// Log level tag is outside the configured level filter.
    LevelFiltered(String),
    /// Raw log reporting is switched off.
    LogEventsDisabled,
    /// Background dispatch had no free slot.
    Saturated,
    /// Serialization or network failure while sending.
    DeliveryFailed(String),
}

/// Result of handling a single inbound event.
///
/// Only used internally and by tests; the host-facing interface never
/// surfaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Suppressed(SuppressReason),
    /// The request completed with the given HTTP status (any status counts).
    Delivered { status: u16 },
    /// Handed to a background task; the result is never observed.
    Dispatched,
    Dropped(DropReason),
}

impl Outcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Outcome::Delivered { .. })
    }
}

impl fmt::Display for SuppressReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuppressReason::StatusCode(code) => write!(f, "status code {code}"),
            SuppressReason::Marker(marker) => write!(f, "marker '{marker}'"),
        }
    }
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::Disabled => f.write_str("reporting disabled"),
            DropReason::DebugMode => f.write_str("debug mode"),
            DropReason::Malformed(field) => write!(f, "missing field '{field}'"),
            DropReason::LevelFiltered(tag) => write!(f, "level '{tag}' filtered"),
            DropReason::LogEventsDisabled => f.write_str("log event reporting disabled"),
            DropReason::Saturated => f.write_str("too many reports in flight"),
            DropReason::DeliveryFailed(err) => write!(f, "delivery failed: {err}"),
        }
    }
}
