//! Proctor - replays recorded perception output through the integrity core
//!
//! Reads a JSONL capture (one frame per line), evaluates every frame in
//! order, then writes the session report.
//!
//! Module structure:
//! - `domain/` - Perception and event types
//! - `services/` - Event log, trackers, evaluator, report builder
//! - `io/` - Perception traits, capture replay, report writer
//! - `infra/` - Config, Metrics

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use proctor_core::infra::{Config, Metrics, ReportFormat};
use proctor_core::io::{read_capture, ReplayPerception, ReportWriter};
use proctor_core::services::Session;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")");

/// Proctor - interview integrity event detection and scoring
#[derive(Parser, Debug)]
#[command(name = "proctor", version = VERSION, about)]
struct Args {
    /// Recorded perception capture (JSONL, one frame per line)
    #[arg(long)]
    capture: String,

    /// Path to TOML configuration file (falls back to PROCTOR_CONFIG, then config/default.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Candidate name for the report (overrides [session] candidate_name)
    #[arg(long)]
    candidate: Option<String>,

    /// Report output path (overrides [report] file)
    #[arg(short, long)]
    output: Option<String>,

    /// Report format (overrides [report] format)
    #[arg(long, value_enum)]
    format: Option<ReportFormat>,
}

fn main() -> anyhow::Result<()> {
    // Initialize structured logging with configurable level via RUST_LOG env var
    // Default: INFO, use RUST_LOG=debug for timer transitions and suppressed events
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .init();

    info!(version = %VERSION, "proctor starting");

    let args = Args::parse();

    let config_path = Config::resolve_config_path(args.config.as_deref());
    let mut config = Config::load_from_path(&config_path);
    if let Some(candidate) = args.candidate {
        config = config.with_candidate_name(candidate);
    }
    if let Some(output) = args.output {
        config = config.with_report_file(output);
    }
    if let Some(format) = args.format {
        config = config.with_report_format(format);
    }

    info!(
        config_file = %config.config_file(),
        unauthorized_labels = ?config.unauthorized_labels(),
        focus_lost_threshold_ms = %config.focus_lost_threshold().num_milliseconds(),
        no_face_threshold_ms = %config.no_face_threshold().num_milliseconds(),
        dedup_window_ms = %config.dedup_window().num_milliseconds(),
        report_file = %config.report_file(),
        report_format = %config.report_format().as_str(),
        "config_loaded"
    );

    let frames = read_capture(&args.capture)?;

    let metrics = Arc::new(Metrics::new());
    let started_at = frames.first().map(|f| f.ts).unwrap_or_else(Utc::now);
    let ended_at = frames.last().map(|f| f.ts).unwrap_or(started_at);

    let mut session = Session::start(&config, metrics.clone(), started_at);
    let mut detector = ReplayPerception;
    let mut landmarker = ReplayPerception;
    let log_every = config.metrics_log_every_frames();

    for (i, frame) in frames.iter().enumerate() {
        session.observe(frame, frame.ts, &mut detector, &mut landmarker);

        if log_every > 0 && (i as u64 + 1) % log_every == 0 {
            metrics.report().log();
        }
    }

    let report = session.finish(ended_at).context("Failed to build session report")?;

    for (kind, count) in report.breakdown() {
        info!(event = %kind, count = %count, "event_breakdown");
    }

    ReportWriter::new(config.report_file(), config.report_format()).write(&report)?;
    metrics.report().log();

    info!(file = %config.report_file(), score = %report.score_label(), "proctor finished");
    Ok(())
}
