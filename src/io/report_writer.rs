//! Session report persistence
//!
//! CSV layout (compatible with earlier report files):
//! summary table with header, one blank line, then the event log table
//! with header. The log header is written even when there are no events.

use crate::infra::config::ReportFormat;
use crate::services::report::SessionReport;
use anyhow::Context;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Summary table columns
pub const SUMMARY_HEADER: [&str; 5] = [
    "Candidate Name",
    "Interview Duration (seconds)",
    "Number of times focus lost",
    "Suspicious Events Count",
    "Final Integrity Score",
];

/// Event log table columns
pub const LOG_HEADER: [&str; 2] = ["timestamp", "event"];

/// Timestamp format used in the event log table
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Write the two-table CSV report
pub fn write_csv<W: Write>(report: &SessionReport, mut out: W) -> anyhow::Result<()> {
    {
        let mut summary = csv::Writer::from_writer(&mut out);
        summary.write_record(SUMMARY_HEADER)?;
        summary.write_record([
            report.candidate_name.clone(),
            report.duration_secs.to_string(),
            report.focus_lost_count.to_string(),
            report.suspicious_event_count.to_string(),
            report.score_label(),
        ])?;
        summary.flush()?;
    }

    out.write_all(b"\n")?;

    {
        let mut log = csv::Writer::from_writer(&mut out);
        log.write_record(LOG_HEADER)?;
        for record in &report.events {
            log.write_record([
                record.timestamp.format(LOG_TIMESTAMP_FORMAT).to_string(),
                record.kind.to_string(),
            ])?;
        }
        log.flush()?;
    }

    Ok(())
}

/// Write the report as pretty-printed JSON
pub fn write_json<W: Write>(report: &SessionReport, mut out: W) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut out, report)?;
    out.write_all(b"\n")?;
    Ok(())
}

/// Writes reports to a file in the configured format
pub struct ReportWriter {
    path: PathBuf,
    format: ReportFormat,
}

impl ReportWriter {
    pub fn new(path: impl AsRef<Path>, format: ReportFormat) -> Self {
        Self { path: path.as_ref().to_path_buf(), format }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write (replacing any existing file), creating parent directories
    pub fn write(&self, report: &SessionReport) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create report directory {}", parent.display())
                })?;
            }
        }

        let file = File::create(&self.path)
            .with_context(|| format!("Failed to create report file {}", self.path.display()))?;
        let mut writer = BufWriter::new(file);

        match self.format {
            ReportFormat::Csv => write_csv(report, &mut writer),
            ReportFormat::Json => write_json(report, &mut writer),
        }
        .with_context(|| format!("Failed to write report {}", self.path.display()))?;
        writer.flush()?;

        info!(
            file = %self.path.display(),
            format = %self.format.as_str(),
            events = %report.events.len(),
            "report_written"
        );
        Ok(())
    }
}
