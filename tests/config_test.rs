//! Integration tests for configuration loading

use chrono::Duration;
use proctor_core::infra::{Config, ReportFormat};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_load_config_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();

    let config_content = r#"
[session]
candidate_name = "Test Candidate"

[policy]
unauthorized_labels = ["cell phone", "book", "laptop"]
focus_lost_threshold_ms = 3000
no_face_threshold_ms = 8000
dedup_window_ms = 4000
gaze_ratio = 1.5

[scoring]
focus_lost_penalty = 2
suspicious_penalty = 20
max_score = 50

[report]
file = "out/report.json"
format = "json"

[metrics]
log_every_frames = 300
"#;

    temp_file.write_all(config_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = Config::from_file(temp_file.path()).unwrap();

    assert_eq!(config.candidate_name(), Some("Test Candidate"));
    assert_eq!(config.unauthorized_labels(), &["cell phone", "book", "laptop"]);
    assert_eq!(config.focus_lost_threshold(), Duration::seconds(3));
    assert_eq!(config.no_face_threshold(), Duration::seconds(8));
    assert_eq!(config.dedup_window(), Duration::seconds(4));
    assert_eq!(config.gaze_ratio(), 1.5);
    assert_eq!(config.focus_lost_penalty(), 2);
    assert_eq!(config.suspicious_penalty(), 20);
    assert_eq!(config.max_score(), 50);
    assert_eq!(config.report_file(), "out/report.json");
    assert_eq!(config.report_format(), ReportFormat::Json);
    assert_eq!(config.metrics_log_every_frames(), 300);
    assert_eq!(config.config_file(), temp_file.path().display().to_string());
}

#[test]
fn test_empty_file_uses_defaults() {
    let temp_file = NamedTempFile::new().unwrap();

    let config = Config::from_file(temp_file.path()).unwrap();

    assert_eq!(config.unauthorized_labels(), &["cell phone", "book"]);
    assert_eq!(config.focus_lost_threshold(), Duration::seconds(5));
    assert_eq!(config.candidate_name(), None);
}

#[test]
fn test_invalid_toml_is_error() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"[policy\nunauthorized_labels = 3").unwrap();
    temp_file.flush().unwrap();

    let err = Config::from_file(temp_file.path()).unwrap_err();

    assert!(format!("{err:#}").contains("Failed to parse config file"));
}

#[test]
fn test_load_from_path_fallback() {
    let config = Config::load_from_path("/nonexistent/config.toml");
    assert_eq!(config.config_file(), "default");
    assert_eq!(config.dedup_window(), Duration::seconds(5));
    assert_eq!(config.report_format(), ReportFormat::Csv);
}

#[test]
fn test_shipped_default_config_matches_builtin_defaults() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/default.toml");
    let config = Config::from_file(path).unwrap();
    let builtin = Config::default();

    assert_eq!(config.unauthorized_labels(), builtin.unauthorized_labels());
    assert_eq!(config.focus_lost_threshold(), builtin.focus_lost_threshold());
    assert_eq!(config.no_face_threshold(), builtin.no_face_threshold());
    assert_eq!(config.dedup_window(), builtin.dedup_window());
    assert_eq!(config.max_score(), builtin.max_score());
}
