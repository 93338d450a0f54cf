use super::ReportSender;
use crate::app::config::DispatchMode;
use crate::domain::{DropReason, Outcome, Report};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::Semaphore;
use tracing::{debug, warn};
use uuid::Uuid;

/// Hands reports to the sender, either inline or on bounded background tasks.
///
/// In background mode at most `max_in_flight` sends run at once; anything
/// beyond that is dropped rather than queued. Spawned tasks are detached and
/// never awaited, so shutting down does not wait for them.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    sender: ReportSender,
    mode: DispatchMode,
    slots: Arc<Semaphore>,
    max_in_flight: usize,
}

impl Dispatcher {
    pub fn new(sender: ReportSender, mode: DispatchMode, max_in_flight: usize) -> Self {
        let max_in_flight = max_in_flight.clamp(1, Semaphore::MAX_PERMITS);
        Self {
            sender,
            mode,
            slots: Arc::new(Semaphore::new(max_in_flight)),
            max_in_flight,
        }
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    pub fn sender(&self) -> &ReportSender {
        &self.sender
    }

    /// Number of background sends currently running.
    pub fn in_flight(&self) -> usize {
        self.max_in_flight - self.slots.available_permits()
    }

    pub async fn dispatch(&self, report: Report) -> Outcome {
        let report_id = Uuid::new_v4().to_string();
        debug!(
            report_id,
            severity = report.severity.as_u8(),
            mode = ?self.mode,
            "dispatching report"
        );

        // The HTTP client needs a Tokio reactor and timer on either path
        let Ok(handle) = Handle::try_current() else {
            warn!(report_id, "no async runtime available, dropping report");
            return Outcome::Dropped(DropReason::DeliveryFailed(
                "no async runtime available".to_string(),
            ));
        };

        match self.mode {
            DispatchMode::Inline => self.sender.deliver(&report, &report_id).await,
            DispatchMode::Background => self.spawn_delivery(&handle, report, report_id),
        }
    }

    fn spawn_delivery(&self, handle: &Handle, report: Report, report_id: String) -> Outcome {
        let Ok(permit) = Arc::clone(&self.slots).try_acquire_owned() else {
            warn!(
                report_id,
                max_in_flight = self.max_in_flight,
                "too many reports in flight, dropping report"
            );
            return Outcome::Dropped(DropReason::Saturated);
        };

        let sender = self.sender.clone();
        handle.spawn(async move {
            let _permit = permit;
            sender.deliver(&report, &report_id).await;
        });

        Outcome::Dispatched
    }
}
