use errorstream_reporter::LevelTag;
use errorstream_reporter::app::{Config, ConfigError, DispatchMode, LogFormat, LogLevel};
use serial_test::serial;
use std::env;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

// Helper function to clean all environment variables before and after tests
fn clean_all_env_vars() {
    let env_vars = [
        "ERRORSTREAM_CONFIG",
        "ERRORSTREAM_URL",
        "ERRORSTREAM_API_TOKEN",
        "ERRORSTREAM_PROJECT_TOKEN",
        "ERRORSTREAM_ENABLED",
        "ERRORSTREAM_DEBUG",
        "ERRORSTREAM_LEVELS",
        "ERRORSTREAM_REPORT_LOG_EVENTS",
        "ERRORSTREAM_SUPPRESS_STATUS_CODES",
        "ERRORSTREAM_SUPPRESS_MARKERS",
        "ERRORSTREAM_CONNECT_TIMEOUT_SECS",
        "ERRORSTREAM_REQUEST_TIMEOUT_SECS",
        "ERRORSTREAM_ACCEPT_INVALID_CERTS",
        "ERRORSTREAM_DISPATCH",
        "ERRORSTREAM_MAX_IN_FLIGHT",
        "ERRORSTREAM_USER_AGENT",
        "ERRORSTREAM_LOG_LEVEL",
        "ERRORSTREAM_LOG_FORMAT",
        "ERRORSTREAM_CONFIG_FILE",
    ];

    unsafe {
        for var in &env_vars {
            env::remove_var(var);
        }
    }
}

#[test]
#[serial]
fn test_config_defaults_from_minimal_args() {
    clean_all_env_vars();

    let config = Config::from_args([
        "errorstream-reporter",
        "--api-token",
        "api",
        "--project-token",
        "project",
    ])
    .unwrap();

    assert_eq!(
        config.endpoint,
        "https://www.errorstream.com/api/1.0/errors/create"
    );
    assert!(config.enabled);
    assert!(!config.debug_mode);
    assert!(config.report_log_events);
    assert!(config.accept_invalid_certs);
    assert_eq!(config.suppress_status_codes, vec!["404".to_string()]);
    assert_eq!(
        config.suppress_markers,
        vec!["exception.CHttpException.404".to_string()]
    );
    assert_eq!(config.connect_timeout, Duration::from_secs(10));
    assert_eq!(config.request_timeout, Duration::from_secs(10));
    assert_eq!(config.dispatch, DispatchMode::Inline);
    assert_eq!(config.max_in_flight, 32);
    assert!(config.level_filter.is_none());
}

#[test]
#[serial]
fn test_config_from_args() {
    clean_all_env_vars();

    let config = Config::from_args([
        "errorstream-reporter",
        "--endpoint",
        "http://localhost:8080/errors",
        "--api-token",
        "api",
        "--project-token",
        "project",
        "--levels",
        "info,error",
        "--enabled",
        "true",
        "--accept-invalid-certs",
        "false",
        "--dispatch",
        "background",
        "--max-in-flight",
        "4",
        "--request-timeout-secs",
        "3",
        "--log-level",
        "debug",
    ])
    .unwrap();

    assert_eq!(config.endpoint, "http://localhost:8080/errors");
    assert!(!config.accept_invalid_certs);
    assert_eq!(config.dispatch, DispatchMode::Background);
    assert_eq!(config.max_in_flight, 4);
    assert_eq!(config.request_timeout, Duration::from_secs(3));
    assert_eq!(config.log_level, LogLevel::Debug);

    let levels = config.level_filter.as_ref().unwrap();
    assert_eq!(levels.len(), 2);
    assert!(levels.contains(&LevelTag::Info));
    assert!(levels.contains(&LevelTag::Error));

    let client = config.client_config();
    assert_eq!(client.timeout, Duration::from_secs(3));
    assert!(!client.accept_invalid_certs);
}

#[test]
#[serial]
fn test_config_from_args_requires_tokens() {
    clean_all_env_vars();

    let result = Config::from_args(["errorstream-reporter"]);
    assert!(matches!(result, Err(ConfigError::InvalidConfig(_))));

    // Tokens are irrelevant when nothing can be sent.
    let config = Config::from_args(["errorstream-reporter", "--debug-mode"]).unwrap();
    assert!(config.debug_mode);
    assert!(!config.is_active());
}

#[test]
#[serial]
fn test_config_rejects_unknown_flags() {
    clean_all_env_vars();

    let result = Config::from_args(["errorstream-reporter", "--no-such-flag"]);
    assert!(matches!(result, Err(ConfigError::Cli(_))));
}

#[test]
#[serial]
fn test_config_from_environment() {
    clean_all_env_vars();

    unsafe {
        env::set_var("ERRORSTREAM_URL", "http://collector.internal/errors");
        env::set_var("ERRORSTREAM_API_TOKEN", "env-api");
        env::set_var("ERRORSTREAM_PROJECT_TOKEN", "env-project");
        env::set_var("ERRORSTREAM_LEVELS", "error, warning");
        env::set_var("ERRORSTREAM_SUPPRESS_STATUS_CODES", "404,410");
        env::set_var("ERRORSTREAM_DISPATCH", "Background");
        env::set_var("ERRORSTREAM_CONNECT_TIMEOUT_SECS", "5");
        env::set_var("ERRORSTREAM_LOG_FORMAT", "json");
    }

    let config = Config::from_env().unwrap();

    assert_eq!(config.endpoint, "http://collector.internal/errors");
    assert_eq!(config.api_token, "env-api");
    assert_eq!(config.project_token, "env-project");
    assert_eq!(
        config.suppress_status_codes,
        vec!["404".to_string(), "410".to_string()]
    );
    assert_eq!(config.dispatch, DispatchMode::Background);
    assert_eq!(config.connect_timeout, Duration::from_secs(5));
    assert_eq!(config.log_format, LogFormat::Json);

    let settings = config.normalizer_settings();
    assert_eq!(settings.policy.status_codes.len(), 2);
    assert_eq!(settings.levels.unwrap().len(), 2);

    clean_all_env_vars();
}

#[test]
#[serial]
fn test_config_from_environment_rejects_bad_values() {
    clean_all_env_vars();

    unsafe {
        env::set_var("ERRORSTREAM_API_TOKEN", "api");
        env::set_var("ERRORSTREAM_PROJECT_TOKEN", "project");
        env::set_var("ERRORSTREAM_MAX_IN_FLIGHT", "many");
    }
    assert!(matches!(Config::from_env(), Err(ConfigError::EnvError(_))));

    unsafe {
        env::remove_var("ERRORSTREAM_MAX_IN_FLIGHT");
        env::set_var("ERRORSTREAM_DISPATCH", "sideways");
    }
    assert!(matches!(Config::from_env(), Err(ConfigError::EnvError(_))));

    clean_all_env_vars();
}

#[test]
#[serial]
fn test_config_from_toml_environment_document() {
    clean_all_env_vars();

    unsafe {
        env::set_var(
            "ERRORSTREAM_CONFIG",
            r#"
api_token = "doc-api"
project_token = "doc-project"
enabled = false
levels = ["info", "error", "warning"]
"#,
        );
        // Individual variables are ignored when a whole document is given
        env::set_var("ERRORSTREAM_API_TOKEN", "ignored");
    }

    let config = Config::from_env().unwrap();
    assert_eq!(config.api_token, "doc-api");
    assert!(!config.enabled);
    assert_eq!(config.level_filter.unwrap().len(), 3);

    clean_all_env_vars();
}

#[test]
fn test_config_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
endpoint = "https://errors.example.com/api/1.0/errors/create"
api_token = "file-api"
project_token = "file-project"
suppress_markers = []
request_timeout_secs = 4
dispatch = "background"
"#
    )
    .unwrap();

    let config = Config::from_file(file.path()).unwrap();

    assert!(config.level_filter.is_none());
    assert_eq!(
        config.endpoint,
        "https://errors.example.com/api/1.0/errors/create"
    );
    assert!(config.suppress_markers.is_empty());
    assert_eq!(config.request_timeout, Duration::from_secs(4));
    assert_eq!(config.dispatch, DispatchMode::Background);
    // Unspecified keys keep their defaults
    assert_eq!(config.connect_timeout, Duration::from_secs(10));
    assert_eq!(config.suppress_status_codes, vec!["404".to_string()]);
}

#[test]
fn test_config_from_file_errors() {
    assert!(matches!(
        Config::from_file("/nonexistent/errorstream.toml"),
        Err(ConfigError::FileError(_))
    ));

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "api_token = [unterminated").unwrap();
    assert!(matches!(
        Config::from_file(file.path()),
        Err(ConfigError::ParseError(_))
    ));
}

#[test]
fn test_config_debug_output_hides_tokens() {
    let config = Config {
        api_token: "very-secret-api".to_string(),
        project_token: "very-secret-project".to_string(),
        ..Config::default()
    };

    let rendered = format!("{config:?}");
    assert!(!rendered.contains("very-secret"));
    assert!(rendered.contains("<redacted>"));
}

#[test]
fn test_config_from_file_accepts_joined_levels() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
api_token = "file-api"
project_token = "file-project"
levels = "info, error, warning"
"#
    )
    .unwrap();

    let config = Config::from_file(file.path()).unwrap();

    assert_eq!(config.levels, vec!["info", "error", "warning"]);
    let levels = config.level_filter.unwrap();
    assert_eq!(levels.len(), 3);
    assert!(levels.contains(&LevelTag::Warning));
}
