//! Session report reduction and integrity scoring
//!
//! Pure reduction over a finished event log. "User Looking Away" records
//! count as focus lost; every other record is suspicious.
//!
//! integrity_score = clamp(max_score - focus_lost_penalty * focus_lost
//!                                   - suspicious_penalty * suspicious, 0, max_score)

use crate::domain::{EventKind, EventRecord, Timestamp};
use crate::infra::config::Config;
use crate::services::event_log::EventLog;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    #[error("candidate name is missing")]
    MissingCandidate,
    #[error("session ended before it started ({ended_at} < {started_at})")]
    NegativeDuration { started_at: Timestamp, ended_at: Timestamp },
}

/// Penalty weights for the integrity score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringWeights {
    pub focus_lost_penalty: u32,
    pub suspicious_penalty: u32,
    pub max_score: u32,
}

impl ScoringWeights {
    pub fn from_config(config: &Config) -> Self {
        Self {
            focus_lost_penalty: config.focus_lost_penalty(),
            suspicious_penalty: config.suspicious_penalty(),
            max_score: config.max_score(),
        }
    }

    /// Score for the given counts, never below zero
    pub fn score(&self, focus_lost: usize, suspicious: usize) -> u32 {
        let focus_penalty = self.focus_lost_penalty.saturating_mul(saturating_u32(focus_lost));
        let suspicious_penalty = self.suspicious_penalty.saturating_mul(saturating_u32(suspicious));
        self.max_score.saturating_sub(focus_penalty.saturating_add(suspicious_penalty))
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self { focus_lost_penalty: 5, suspicious_penalty: 10, max_score: 100 }
    }
}

#[inline]
fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Summary of a finished session plus the full event log for audit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionReport {
    pub session_id: Uuid,
    pub candidate_name: String,
    pub started_at: Timestamp,
    pub ended_at: Timestamp,
    pub duration_secs: u64,
    pub focus_lost_count: usize,
    pub suspicious_event_count: usize,
    pub integrity_score: u32,
    pub max_score: u32,
    pub events: Vec<EventRecord>,
}

impl SessionReport {
    /// Score as shown in the summary table, e.g. "65/100"
    pub fn score_label(&self) -> String {
        format!("{}/{}", self.integrity_score, self.max_score)
    }

    /// Records counted as suspicious (everything except looking away)
    pub fn suspicious_events(&self) -> impl Iterator<Item = &EventRecord> {
        self.events.iter().filter(|r| !r.kind.is_focus_lost())
    }

    /// Per event type counts, ordered by first occurrence
    pub fn breakdown(&self) -> Vec<(EventKind, usize)> {
        let mut counts: Vec<(EventKind, usize)> = Vec::new();
        for record in &self.events {
            match counts.iter_mut().find(|(kind, _)| *kind == record.kind) {
                Some((_, n)) => *n += 1,
                None => counts.push((record.kind.clone(), 1)),
            }
        }
        counts
    }
}

/// Reduces an event log into a SessionReport
#[derive(Debug, Clone, Default)]
pub struct ReportBuilder {
    weights: ScoringWeights,
}

impl ReportBuilder {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(ScoringWeights::from_config(config))
    }

    /// Build a report. An empty log is valid and scores the maximum.
    pub fn build(
        &self,
        session_id: Uuid,
        candidate_name: &str,
        started_at: Timestamp,
        ended_at: Timestamp,
        log: &EventLog,
    ) -> Result<SessionReport, ReportError> {
        let candidate_name = candidate_name.trim();
        if candidate_name.is_empty() {
            return Err(ReportError::MissingCandidate);
        }
        if ended_at < started_at {
            return Err(ReportError::NegativeDuration { started_at, ended_at });
        }

        let duration_ms = ended_at.signed_duration_since(started_at).num_milliseconds();
        let duration_secs = (duration_ms as f64 / 1000.0).round() as u64;

        let focus_lost_count = log.iter().filter(|r| r.kind.is_focus_lost()).count();
        let suspicious_event_count = log.len() - focus_lost_count;
        let integrity_score = self.weights.score(focus_lost_count, suspicious_event_count);

        Ok(SessionReport {
            session_id,
            candidate_name: candidate_name.to_string(),
            started_at,
            ended_at,
            duration_secs,
            focus_lost_count,
            suspicious_event_count,
            integrity_score,
            max_score: self.weights.max_score,
            events: log.records().to_vec(),
        })
    }
}
