//! Configuration loading from TOML files
//!
//! Config file is selected via:
//! 1. --config <path> command line argument
//! 2. PROCTOR_CONFIG environment variable
//! 3. Default: config/default.toml

use anyhow::Context;
use chrono::Duration;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use tracing::warn;

/// Default config path when neither argument nor environment selects one
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Report serialization format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Csv,
    Json,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SessionConfig {
    /// Candidate name written to the report summary
    #[serde(default)]
    pub candidate_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PolicyConfig {
    /// Object labels that are not allowed in frame
    #[serde(default = "default_unauthorized_labels")]
    pub unauthorized_labels: Vec<String>,
    /// Continuous off-center gaze required before "User Looking Away"
    #[serde(default = "default_focus_lost_threshold_ms")]
    pub focus_lost_threshold_ms: u64,
    /// Continuous face absence required before "No Face Detected"
    #[serde(default = "default_no_face_threshold_ms")]
    pub no_face_threshold_ms: u64,
    /// Minimum gap between two log entries of the same event type
    #[serde(default = "default_dedup_window_ms")]
    pub dedup_window_ms: u64,
    /// Eye-to-nose distance asymmetry that counts as a turned head
    #[serde(default = "default_gaze_ratio")]
    pub gaze_ratio: f32,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            unauthorized_labels: default_unauthorized_labels(),
            focus_lost_threshold_ms: default_focus_lost_threshold_ms(),
            no_face_threshold_ms: default_no_face_threshold_ms(),
            dedup_window_ms: default_dedup_window_ms(),
            gaze_ratio: default_gaze_ratio(),
        }
    }
}

fn default_unauthorized_labels() -> Vec<String> {
    vec!["cell phone".to_string(), "book".to_string()]
}

fn default_focus_lost_threshold_ms() -> u64 {
    5000
}

fn default_no_face_threshold_ms() -> u64 {
    10000
}

fn default_dedup_window_ms() -> u64 {
    5000
}

fn default_gaze_ratio() -> f32 {
    1.2
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_focus_lost_penalty")]
    pub focus_lost_penalty: u32,
    #[serde(default = "default_suspicious_penalty")]
    pub suspicious_penalty: u32,
    #[serde(default = "default_max_score")]
    pub max_score: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            focus_lost_penalty: default_focus_lost_penalty(),
            suspicious_penalty: default_suspicious_penalty(),
            max_score: default_max_score(),
        }
    }
}

fn default_focus_lost_penalty() -> u32 {
    5
}

fn default_suspicious_penalty() -> u32 {
    10
}

fn default_max_score() -> u32 {
    100
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Output path for the session report
    #[serde(default = "default_report_file")]
    pub file: String,
    #[serde(default = "default_report_format")]
    pub format: ReportFormat,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { file: default_report_file(), format: default_report_format() }
    }
}

fn default_report_file() -> String {
    "proctoring_report.csv".to_string()
}

fn default_report_format() -> ReportFormat {
    ReportFormat::Csv
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct MetricsConfig {
    /// Log a metrics summary every N frames (0 to log only at session end)
    #[serde(default)]
    pub log_every_frames: u64,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Millisecond setting as a `Duration`, saturating values beyond `i64::MAX`
fn millis(ms: u64) -> Duration {
    Duration::milliseconds(i64::try_from(ms).unwrap_or(i64::MAX))
}

/// Main configuration struct used throughout the application
#[derive(Debug, Clone)]
pub struct Config {
    candidate_name: Option<String>,
    unauthorized_labels: Vec<String>,
    focus_lost_threshold_ms: u64,
    no_face_threshold_ms: u64,
    dedup_window_ms: u64,
    gaze_ratio: f32,
    focus_lost_penalty: u32,
    suspicious_penalty: u32,
    max_score: u32,
    report_file: String,
    report_format: ReportFormat,
    metrics_log_every_frames: u64,
    config_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default(), "default".to_string())
    }
}

impl Config {
    fn from_toml(toml_config: TomlConfig, config_file: String) -> Self {
        Self {
            candidate_name: toml_config.session.candidate_name,
            unauthorized_labels: toml_config.policy.unauthorized_labels,
            focus_lost_threshold_ms: toml_config.policy.focus_lost_threshold_ms,
            no_face_threshold_ms: toml_config.policy.no_face_threshold_ms,
            dedup_window_ms: toml_config.policy.dedup_window_ms,
            gaze_ratio: toml_config.policy.gaze_ratio,
            focus_lost_penalty: toml_config.scoring.focus_lost_penalty,
            suspicious_penalty: toml_config.scoring.suspicious_penalty,
            max_score: toml_config.scoring.max_score,
            report_file: toml_config.report.file,
            report_format: toml_config.report.format,
            metrics_log_every_frames: toml_config.metrics.log_every_frames,
            config_file,
        }
    }

    /// Determine config file path from an explicit argument or environment
    pub fn resolve_config_path(arg: Option<&str>) -> String {
        if let Some(path) = arg {
            return path.to_string();
        }

        if let Ok(path) = env::var("PROCTOR_CONFIG") {
            return path;
        }

        DEFAULT_CONFIG_PATH.to_string()
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let toml_config: TomlConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(Self::from_toml(toml_config, path.display().to_string()))
    }

    /// Load configuration - tries TOML file first, falls back to defaults
    pub fn load_from_path(path: &str) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %format!("{e:#}"), "config_load_failed_using_defaults");
                Self::default()
            }
        }
    }

    // Getters for all config fields
    pub fn candidate_name(&self) -> Option<&str> {
        self.candidate_name.as_deref()
    }

    pub fn unauthorized_labels(&self) -> &[String] {
        &self.unauthorized_labels
    }

    pub fn focus_lost_threshold(&self) -> Duration {
        millis(self.focus_lost_threshold_ms)
    }

    pub fn no_face_threshold(&self) -> Duration {
        millis(self.no_face_threshold_ms)
    }

    pub fn dedup_window(&self) -> Duration {
        millis(self.dedup_window_ms)
    }

    pub fn gaze_ratio(&self) -> f32 {
        self.gaze_ratio
    }

    pub fn focus_lost_penalty(&self) -> u32 {
        self.focus_lost_penalty
    }

    pub fn suspicious_penalty(&self) -> u32 {
        self.suspicious_penalty
    }

    pub fn max_score(&self) -> u32 {
        self.max_score
    }

    pub fn report_file(&self) -> &str {
        &self.report_file
    }

    pub fn report_format(&self) -> ReportFormat {
        self.report_format
    }

    pub fn metrics_log_every_frames(&self) -> u64 {
        self.metrics_log_every_frames
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    /// Builder method to override the candidate name (CLI takes precedence)
    pub fn with_candidate_name(mut self, name: impl Into<String>) -> Self {
        self.candidate_name = Some(name.into());
        self
    }

    /// Builder method to override the report destination
    pub fn with_report_file(mut self, file: impl Into<String>) -> Self {
        self.report_file = file.into();
        self
    }

    pub fn with_report_format(mut self, format: ReportFormat) -> Self {
        self.report_format = format;
        self
    }

    pub fn with_unauthorized_labels(mut self, labels: Vec<String>) -> Self {
        self.unauthorized_labels = labels;
        self
    }

    pub fn with_focus_lost_threshold_ms(mut self, ms: u64) -> Self {
        self.focus_lost_threshold_ms = ms;
        self
    }

    pub fn with_no_face_threshold_ms(mut self, ms: u64) -> Self {
        self.no_face_threshold_ms = ms;
        self
    }

    pub fn with_dedup_window_ms(mut self, ms: u64) -> Self {
        self.dedup_window_ms = ms;
        self
    }

    pub fn with_gaze_ratio(mut self, ratio: f32) -> Self {
        self.gaze_ratio = ratio;
        self
    }
}
