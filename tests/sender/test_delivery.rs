use super::{REPORT_PATH, client_config, sample_report};
use errorstream_reporter::domain::{DropReason, Outcome};
use errorstream_reporter::sender::{ClientConfig, ReportSender, ReportSerializer};
use serde_json::json;
use std::time::{Duration, Instant};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path, query_param},
};

#[tokio::test]
async fn test_report_is_posted_with_credentials_and_exact_length() {
    let mock_server = MockServer::start().await;
    let report = sample_report();
    let body_len = ReportSerializer::new().serialize(&report).unwrap().len();

    Mock::given(method("POST"))
        .and(path(REPORT_PATH))
        .and(query_param("api_token", "api-123"))
        .and(query_param("project_token", "proj-456"))
        .and(header("content-type", "application/json"))
        .and(header("content-length", body_len.to_string().as_str()))
        .and(body_json(json!({
            "error_group": "Division by zero:42",
            "line_number": 42,
            "file_name": "calc.ext",
            "message": "Division by zero",
            "stack_trace": "frame1<br>frame2",
            "severity": 3
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let sender = ReportSender::new(client_config(&mock_server)).unwrap();
    let outcome = sender.deliver(&report, "test-report").await;

    assert_eq!(outcome, Outcome::Delivered { status: 200 });

    let stats = sender.connection_stats();
    assert_eq!(stats.total_requests, 1);
    assert_eq!(stats.successful_requests, 1);
    assert_eq!(stats.failed_requests, 0);
}

#[tokio::test]
async fn test_error_status_is_absorbed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(REPORT_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let sender = ReportSender::new(client_config(&mock_server)).unwrap();
    let outcome = sender.deliver(&sample_report(), "test-report").await;

    // Any status counts as delivered; nothing is retried.
    assert_eq!(outcome, Outcome::Delivered { status: 500 });
    assert_eq!(sender.connection_stats().failed_requests, 1);
}

#[tokio::test]
async fn test_slow_service_is_cut_off_by_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
        .mount(&mock_server)
        .await;

    let config = ClientConfig {
        timeout: Duration::from_millis(200),
        ..client_config(&mock_server)
    };
    let sender = ReportSender::new(config).unwrap();

    let start = Instant::now();
    let outcome = sender.deliver(&sample_report(), "test-report").await;

    assert!(start.elapsed() < Duration::from_secs(2));
    match outcome {
        Outcome::Dropped(DropReason::DeliveryFailed(msg)) => {
            assert!(msg.to_lowercase().contains("timeout"), "unexpected: {msg}");
        }
        other => panic!("Expected a dropped report, got: {other:?}"),
    }
    assert_eq!(sender.connection_stats().failed_requests, 1);
}

#[tokio::test]
async fn test_unreachable_endpoint_returns_within_bound() {
    // Bind then release a port so nothing is listening on it.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let config = ClientConfig {
        endpoint: format!("http://127.0.0.1:{port}{REPORT_PATH}"),
        api_token: "api-123".to_string(),
        project_token: "proj-456".to_string(),
        timeout: Duration::from_secs(1),
        connection_timeout: Duration::from_secs(1),
        ..ClientConfig::default()
    };
    let sender = ReportSender::new(config).unwrap();

    let start = Instant::now();
    let outcome = sender.deliver(&sample_report(), "test-report").await;

    assert!(start.elapsed() < Duration::from_secs(3));
    assert!(matches!(
        outcome,
        Outcome::Dropped(DropReason::DeliveryFailed(_))
    ));
}
