use super::HttpClient;
use super::serialization::{ReportSerializer, SerializationError};
use crate::domain::Report;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderMap, HeaderValue};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum TransmissionError {
    #[error("Serialization failed: {0}")]
    SerializationFailed(#[from] SerializationError),
    #[error("Transmission timeout: {0}")]
    Timeout(reqwest::Error),
    #[error("Connection failed: {0}")]
    ConnectionFailed(reqwest::Error),
    #[error("Request error: {0}")]
    RequestError(reqwest::Error),
}

impl From<reqwest::Error> for TransmissionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransmissionError::Timeout(err)
        } else if err.is_connect() {
            TransmissionError::ConnectionFailed(err)
        } else {
            TransmissionError::RequestError(err)
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransmissionResult {
    pub success: bool,
    pub status_code: u16,
    pub latency: Duration,
    pub bytes_sent: usize,
}

/// Performs the single POST for one report.
#[derive(Debug, Clone)]
pub struct ReportTransmitter {
    pub client: HttpClient,
    serializer: ReportSerializer,
}

impl ReportTransmitter {
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            serializer: ReportSerializer::new(),
        }
    }

    pub async fn send_report(
        &self,
        report: &Report,
        report_id: &str,
    ) -> Result<TransmissionResult, TransmissionError> {
        let start = Instant::now();

        let payload = self.serializer.serialize(report)?;
        let bytes_sent = payload.len();
        let headers = build_headers(bytes_sent);

        debug!(report_id, bytes = bytes_sent, "sending report");

        let result = self
            .client
            .client
            .post(self.client.report_url().clone())
            .headers(headers)
            .body(payload)
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                self.client.stats.record_request(false, start.elapsed());
                return Err(err.into());
            }
        };

        let latency = start.elapsed();
        let status_code = response.status().as_u16();
        let success = response.status().is_success();

        self.client.stats.record_request(success, latency);

        if success {
            debug!(
                report_id,
                status = status_code,
                latency_ms = latency.as_millis() as u64,
                "report accepted"
            );
        } else {
            warn!(report_id, status = status_code, "report rejected by remote service");
        }

        Ok(TransmissionResult {
            success,
            status_code,
            latency,
            bytes_sent,
        })
    }
}

/// Declares a JSON body of exactly `content_length` bytes.
pub fn build_headers(content_length: usize) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_LENGTH, HeaderValue::from(content_length));
    headers
}
