//! Report normalization.
//!
//! Turns the two inbound event shapes into a canonical [`Report`], applying
//! the activation gate, level filter and suppression policy on the way.
//! Nothing here returns an error: every rejection is a [`Normalized`] value.

pub mod policy;
pub mod severity;
pub mod text;

pub use policy::SuppressionPolicy;
pub use severity::severity_for;
pub use text::{LINE_DELIMITER, join_frames, join_lines};

use crate::domain::{
    DropReason, ExceptionEvent, LevelTag, LogEvent, Outcome, Report, Severity, SuppressReason,
    UNKNOWN_FILE,
};
use std::collections::HashSet;

/// Immutable settings injected into the normalizer at construction.
#[derive(Debug, Clone)]
pub struct NormalizerSettings {
    pub enabled: bool,
    pub debug_mode: bool,
    pub report_log_events: bool,
    /// `None` accepts every level tag.
    pub levels: Option<HashSet<LevelTag>>,
    pub policy: SuppressionPolicy,
}

impl Default for NormalizerSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            debug_mode: false,
            report_log_events: true,
            levels: None,
            policy: SuppressionPolicy::default(),
        }
    }
}

/// Result of normalizing one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    Ready(Report),
    Suppressed(SuppressReason),
    Dropped(DropReason),
}

impl Normalized {
    /// Converts a non-ready result into its final outcome.
    pub fn into_report(self) -> Result<Report, Outcome> {
        match self {
            Normalized::Ready(report) => Ok(report),
            Normalized::Suppressed(reason) => Err(Outcome::Suppressed(reason)),
            Normalized::Dropped(reason) => Err(Outcome::Dropped(reason)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    settings: NormalizerSettings,
}

impl Normalizer {
    pub fn new(settings: NormalizerSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &NormalizerSettings {
        &self.settings
    }

    /// Returns why nothing may be reported at all, if anything.
    ///
    /// Checked first on every path so a disabled reporter does no work.
    pub fn inactive_reason(&self) -> Option<DropReason> {
        if !self.settings.enabled {
            Some(DropReason::Disabled)
        } else if self.settings.debug_mode {
            Some(DropReason::DebugMode)
        } else {
            None
        }
    }

    pub fn is_active(&self) -> bool {
        self.inactive_reason().is_none()
    }

    pub fn normalize_exception(&self, event: &ExceptionEvent) -> Normalized {
        if let Some(reason) = self.inactive_reason() {
            return Normalized::Dropped(reason);
        }

        let Some(message) = event.message.as_deref() else {
            return Normalized::Dropped(DropReason::Malformed("message"));
        };
        let Some(file) = event.file.as_deref() else {
            return Normalized::Dropped(DropReason::Malformed("file"));
        };
        let Some(line) = event.line else {
            return Normalized::Dropped(DropReason::Malformed("line"));
        };

        if let Some(reason) = self.settings.policy.check_status(event.status_code.as_deref()) {
            return Normalized::Suppressed(reason);
        }

        let message = join_lines(message);
        let stack_trace = if event.trace_frames.is_empty() {
            message.clone()
        } else {
            join_frames(&event.trace_frames)
        };

        Normalized::Ready(Report {
            error_group: format!("{message}:{line}"),
            line_number: line,
            file_name: join_lines(file),
            message,
            stack_trace,
            severity: Severity::MAX,
        })
    }

    pub fn normalize_log(&self, event: &LogEvent) -> Normalized {
        if let Some(reason) = self.inactive_reason() {
            return Normalized::Dropped(reason);
        }

        if !self.settings.report_log_events {
            return Normalized::Dropped(DropReason::LogEventsDisabled);
        }

        if let Some(levels) = &self.settings.levels
            && !levels.contains(&event.level)
        {
            return Normalized::Dropped(DropReason::LevelFiltered(event.level.to_string()));
        }

        let message = join_lines(&event.text);

        if let Some(reason) = self.settings.policy.check_text(&message) {
            return Normalized::Suppressed(reason);
        }

        let stack_trace = message.clone();
        Normalized::Ready(Report {
            error_group: message.clone(),
            line_number: 0,
            file_name: UNKNOWN_FILE.to_string(),
            message,
            stack_trace,
            severity: severity_for(&event.level),
        })
    }
}
