use crate::app::config::Config;
use crate::domain::{DropReason, ExceptionEvent, LogEvent, Outcome, ReporterError};
use crate::normalizer::{Normalized, Normalizer};
use crate::sender::{Dispatcher, ReportSender};
use tracing::{debug, info};

/// Interface the host's event dispatcher calls into.
///
/// Neither method can fail: whatever happens to an event stays inside the
/// reporter.
pub trait ErrorSink: Send + Sync {
    fn on_exception(&self, event: ExceptionEvent) -> impl Future<Output = ()> + Send;
    fn on_log_batch(&self, entries: Vec<LogEvent>) -> impl Future<Output = ()> + Send;
}

/// Normalizes host events and hands the resulting reports to the dispatcher.
#[derive(Debug, Clone)]
pub struct Reporter {
    normalizer: Normalizer,
    dispatcher: Option<Dispatcher>,
}

impl Reporter {
    /// Builds a reporter from configuration.
    ///
    /// When reporting is disabled or in debug mode no HTTP client is created.
    pub fn new(config: &Config) -> Result<Self, ReporterError> {
        let normalizer = Normalizer::new(config.normalizer_settings());

        let dispatcher = if normalizer.is_active() {
            let sender = ReportSender::new(config.client_config())?;
            Some(Dispatcher::new(sender, config.dispatch, config.max_in_flight))
        } else {
            info!(
                enabled = config.enabled,
                debug_mode = config.debug_mode,
                "error reporting inactive"
            );
            None
        };

        Ok(Self::from_parts(normalizer, dispatcher))
    }

    pub fn from_parts(normalizer: Normalizer, dispatcher: Option<Dispatcher>) -> Self {
        Self {
            normalizer,
            dispatcher,
        }
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn dispatcher(&self) -> Option<&Dispatcher> {
        self.dispatcher.as_ref()
    }

    pub async fn report_exception(&self, event: &ExceptionEvent) -> Outcome {
        let normalized = self.normalizer.normalize_exception(event);
        self.forward(normalized).await
    }

    pub async fn report_log(&self, event: &LogEvent) -> Outcome {
        let normalized = self.normalizer.normalize_log(event);
        self.forward(normalized).await
    }

    /// Reports each entry in order; one outcome per entry.
    pub async fn report_logs(&self, entries: &[LogEvent]) -> Vec<Outcome> {
        let mut outcomes = Vec::with_capacity(entries.len());
        for entry in entries {
            outcomes.push(self.report_log(entry).await);
        }
        outcomes
    }

    async fn forward(&self, normalized: Normalized) -> Outcome {
        let report = match normalized.into_report() {
            Ok(report) => report,
            Err(outcome) => {
                debug!(?outcome, "event not reported");
                return outcome;
            }
        };

        match &self.dispatcher {
            Some(dispatcher) => dispatcher.dispatch(report).await,
            None => Outcome::Dropped(DropReason::Disabled),
        }
    }
}

impl ErrorSink for Reporter {
    async fn on_exception(&self, event: ExceptionEvent) {
        self.report_exception(&event).await;
    }

    async fn on_log_batch(&self, entries: Vec<LogEvent>) {
        if !self.normalizer.is_active() {
            return;
        }
        self.report_logs(&entries).await;
    }
}
