mod test_delivery;

use errorstream_reporter::sender::ClientConfig;
use errorstream_reporter::{Report, Severity};
use std::time::Duration;
use wiremock::MockServer;

pub const REPORT_PATH: &str = "/api/1.0/errors/create";

pub fn client_config(server: &MockServer) -> ClientConfig {
    ClientConfig {
        endpoint: format!("{}{}", server.uri(), REPORT_PATH),
        api_token: "api-123".to_string(),
        project_token: "proj-456".to_string(),
        timeout: Duration::from_secs(2),
        connection_timeout: Duration::from_secs(2),
        ..ClientConfig::default()
    }
}

pub fn sample_report() -> Report {
    Report {
        error_group: "Division by zero:42".to_string(),
        line_number: 42,
        file_name: "calc.ext".to_string(),
        message: "Division by zero".to_string(),
        stack_trace: "frame1<br>frame2".to_string(),
        severity: Severity::Error,
    }
}
