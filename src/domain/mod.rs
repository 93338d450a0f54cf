//! Domain layer for errorstream-reporter.
//!
//! Contains the canonical types shared across all modules:
//! - `Report`: The only record ever sent to the remote service
//! - `Severity`: Ordinal severity carried on the wire (1..=3)
//! - `ExceptionEvent` / `LogEvent`: The two inbound event shapes
//! - `Outcome`: What happened to a single inbound event
//! - `ReporterError`: Top-level error type

pub mod error;
pub mod event;
pub mod outcome;
pub mod report;

pub use error::ReporterError;
pub use event::{ExceptionEvent, LevelTag, LogEvent};
pub use outcome::{DropReason, Outcome, SuppressReason};
pub use report::{Report, Severity, UNKNOWN_FILE};
