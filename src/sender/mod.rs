pub mod client;
pub mod dispatcher;
pub mod serialization;
pub mod transmission;

pub use client::{ClientConfig, ClientError, ConnectionStats, HttpClient};
pub use dispatcher::Dispatcher;
pub use serialization::{ReportSerializer, SerializationError};
pub use transmission::{ReportTransmitter, TransmissionError, TransmissionResult};

use crate::domain::{DropReason, Outcome, Report};
use tracing::warn;

/// Delivery client that never fails.
///
/// Every error below this point is logged and turned into
/// [`Outcome::Dropped`]; there is no retry and no queue.
#[derive(Debug, Clone)]
pub struct ReportSender {
    transmitter: ReportTransmitter,
}

impl ReportSender {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let client = HttpClient::new(config)?;
        Ok(Self::from_client(client))
    }

    pub fn from_client(client: HttpClient) -> Self {
        Self {
            transmitter: ReportTransmitter::new(client),
        }
    }

    pub async fn deliver(&self, report: &Report, report_id: &str) -> Outcome {
        match self.transmitter.send_report(report, report_id).await {
            Ok(result) => Outcome::Delivered {
                status: result.status_code,
            },
            Err(err) => {
                warn!(report_id, error = %err, "dropping report after failed delivery");
                Outcome::Dropped(DropReason::DeliveryFailed(err.to_string()))
            }
        }
    }

    pub fn client(&self) -> &HttpClient {
        &self.transmitter.client
    }

    pub fn connection_stats(&self) -> ConnectionStats {
        self.transmitter.client.connection_stats()
    }
}
