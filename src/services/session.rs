//! Proctoring session lifecycle
//!
//! A Session owns every piece of mutable detection state for one candidate:
//! the event log, both trackers and the object policy (via FrameEvaluator).
//! Nothing is process-global, so independent sessions can run side by side.

use crate::domain::{FrameObservation, Timestamp};
use crate::infra::config::Config;
use crate::infra::metrics::Metrics;
use crate::io::perception::{FaceLandmarker, ObjectDetector};
use crate::services::evaluator::{FrameEvaluator, FrameOutcome};
use crate::services::event_log::EventLog;
use crate::services::report::{ReportBuilder, ReportError, SessionReport};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

pub struct Session {
    id: Uuid,
    candidate_name: Option<String>,
    started_at: Timestamp,
    evaluator: FrameEvaluator,
    report_builder: ReportBuilder,
}

impl Session {
    /// Start a session at `now` with fresh trackers and an empty log
    pub fn start(config: &Config, metrics: Arc<Metrics>, now: Timestamp) -> Self {
        let id = Uuid::now_v7();
        let candidate_name = config.candidate_name().map(str::to_string);

        info!(
            session_id = %id,
            candidate = %candidate_name.as_deref().unwrap_or("<unset>"),
            started_at = %now.to_rfc3339(),
            "session_started"
        );

        Self {
            id,
            candidate_name,
            started_at: now,
            evaluator: FrameEvaluator::new(config, metrics),
            report_builder: ReportBuilder::from_config(config),
        }
    }

    /// Evaluate perception output that has already been computed
    pub fn evaluate(&mut self, observation: &FrameObservation, now: Timestamp) -> FrameOutcome {
        self.evaluator.evaluate(observation, now)
    }

    /// Run both perception collaborators on `frame`, then evaluate.
    ///
    /// A failing collaborator is treated as reporting nothing for this frame.
    pub fn observe<F, D, L>(
        &mut self,
        frame: &F,
        now: Timestamp,
        detector: &mut D,
        landmarker: &mut L,
    ) -> FrameOutcome
    where
        F: ?Sized,
        D: ObjectDetector<F> + ?Sized,
        L: FaceLandmarker<F> + ?Sized,
    {
        let detections = detector.detect(frame).unwrap_or_else(|e| {
            warn!(session_id = %self.id, error = %format!("{e:#}"), "object_detection_failed");
            self.evaluator.metrics().record_perception_failure();
            Vec::new()
        });
        let faces = landmarker.extract_faces(frame).unwrap_or_else(|e| {
            warn!(session_id = %self.id, error = %format!("{e:#}"), "face_landmarks_failed");
            self.evaluator.metrics().record_perception_failure();
            Vec::new()
        });

        self.evaluate(&FrameObservation::new(detections, faces), now)
    }

    /// Build the report as of `ended_at` without consuming the session
    pub fn report(&self, ended_at: Timestamp) -> Result<SessionReport, ReportError> {
        self.report_builder.build(
            self.id,
            self.candidate_name.as_deref().unwrap_or_default(),
            self.started_at,
            ended_at,
            self.evaluator.event_log(),
        )
    }

    /// End the session and produce its report
    pub fn finish(self, ended_at: Timestamp) -> Result<SessionReport, ReportError> {
        let report = self.report(ended_at)?;
        info!(
            session_id = %report.session_id,
            candidate = %report.candidate_name,
            duration_secs = %report.duration_secs,
            focus_lost = %report.focus_lost_count,
            suspicious = %report.suspicious_event_count,
            score = %report.score_label(),
            "session_finished"
        );
        Ok(report)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    pub fn candidate_name(&self) -> Option<&str> {
        self.candidate_name.as_deref()
    }

    pub fn set_candidate_name(&mut self, name: impl Into<String>) {
        self.candidate_name = Some(name.into());
    }

    pub fn event_log(&self) -> &EventLog {
        self.evaluator.event_log()
    }

    pub fn evaluator(&self) -> &FrameEvaluator {
        &self.evaluator
    }
}

/// Session handle for when frames arrive from more than one thread.
///
/// Each frame is evaluated under the lock, so log order and dedup state
/// always reflect whole frames.
#[derive(Clone)]
pub struct SharedSession {
    inner: Arc<Mutex<Session>>,
}

impl SharedSession {
    pub fn new(session: Session) -> Self {
        Self { inner: Arc::new(Mutex::new(session)) }
    }

    pub fn evaluate(&self, observation: &FrameObservation, now: Timestamp) -> FrameOutcome {
        self.inner.lock().evaluate(observation, now)
    }

    pub fn report(&self, ended_at: Timestamp) -> Result<SessionReport, ReportError> {
        self.inner.lock().report(ended_at)
    }

    /// Run `f` with exclusive access to the session
    pub fn with<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        f(&mut self.inner.lock())
    }
}
