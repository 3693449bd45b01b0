//! Per-frame event orchestration
//!
//! The FrameEvaluator is the central frame processor that coordinates:
//! - Object policy (unauthorized items, every frame)
//! - Presence tracking (no face / multiple faces)
//! - Gaze tracking (only with exactly one face)
//! - Event logging (dedup on append)
//!
//! Candidate events are submitted in a fixed order: object events first,
//! then at most one presence or gaze event.


use crate::domain::{EventKind, FrameObservation, GazeDirection, Timestamp};
use crate::infra::config::Config;
use crate::infra::metrics::Metrics;
use crate::services::event_log::EventLog;
use crate::services::gaze::GazeTracker;
use crate::services::object_policy::ObjectPolicy;
use crate::services::presence::{Presence, PresenceTracker};
use smallvec::SmallVec;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// One event submitted to the log during a frame
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateEvent {
    pub kind: EventKind,
    /// False when the log's dedup window suppressed it
    pub recorded: bool,
}

/// Result of evaluating a single frame
#[derive(Debug, Clone)]
pub struct FrameOutcome {
    pub at: Timestamp,
    pub face_count: usize,
    pub presence: Presence,
    /// Set only when exactly one face was present and could be classified
    pub gaze: Option<GazeDirection>,
    pub candidates: SmallVec<[CandidateEvent; 4]>,
}

impl FrameOutcome {
    /// Events that were actually appended to the log
    pub fn recorded(&self) -> impl Iterator<Item = &EventKind> {
        self.candidates.iter().filter(|c| c.recorded).map(|c| &c.kind)
    }

    pub fn recorded_count(&self) -> usize {
        self.candidates.iter().filter(|c| c.recorded).count()
    }
}

/// Central frame processor owning all per-session detection state
pub struct FrameEvaluator {
    /// Deduplicating event store
    pub(crate) event_log: EventLog,
    /// Sustained off-camera gaze debounce
    pub(crate) gaze: GazeTracker,
    /// No-face debounce and multi-face detection
    pub(crate) presence: PresenceTracker,
    /// Unauthorized object labels
    pub(crate) object_policy: ObjectPolicy,
    /// Asymmetry ratio for gaze classification
    pub(crate) gaze_ratio: f32,
    /// Metrics collector
    pub(crate) metrics: Arc<Metrics>,
}

impl FrameEvaluator {
    /// Create a FrameEvaluator with fresh state from configuration
    pub fn new(config: &Config, metrics: Arc<Metrics>) -> Self {
        Self {
            event_log: EventLog::with_dedup_window(config.dedup_window()),
            gaze: GazeTracker::new(config.focus_lost_threshold()),
            presence: PresenceTracker::new(config.no_face_threshold()),
            object_policy: ObjectPolicy::from_config(config),
            gaze_ratio: config.gaze_ratio(),
            metrics,
        }
    }

    /// Evaluate one frame's perception output at `now`
    pub fn evaluate(&mut self, observation: &FrameObservation, now: Timestamp) -> FrameOutcome {
        let process_start = Instant::now();
        let mut candidates: SmallVec<[CandidateEvent; 4]> = SmallVec::new();

        // Object policy runs on every frame
        let object_events: SmallVec<[EventKind; 4]> =
            self.object_policy.evaluate(&observation.detections).collect();
        for kind in object_events {
            candidates.push(self.submit(kind, now));
        }

        let face_count = observation.face_count();
        let presence = self.presence.update(face_count, now);

        let mut gaze = None;
        let presence_or_gaze_event = match presence {
            Presence::Single => {
                gaze = observation.faces[0].gaze_direction(self.gaze_ratio);
                match gaze {
                    Some(direction) => self.gaze.update(direction, now),
                    None => {
                        debug!("gaze_landmarks_missing");
                        None
                    }
                }
            }
            Presence::Absent { .. } => {
                // Off-center gaze is not observed while no face is visible
                self.gaze.reset();
                presence.event()
            }
            Presence::Multiple(_) => presence.event(),
        };

        if let Some(kind) = presence_or_gaze_event {
            candidates.push(self.submit(kind, now));
        }

        let latency_us = process_start.elapsed().as_micros() as u64;
        self.metrics.record_frame_evaluated(latency_us);

        FrameOutcome { at: now, face_count, presence, gaze, candidates }
    }

    /// Submit a candidate to the log and account for it
    fn submit(&mut self, kind: EventKind, now: Timestamp) -> CandidateEvent {
        let recorded = self.event_log.record(kind.clone(), now);
        if recorded {
            self.metrics.record_event_recorded(kind.tag());
        } else {
            self.metrics.record_event_suppressed();
        }
        CandidateEvent { kind, recorded }
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    pub fn gaze(&self) -> &GazeTracker {
        &self.gaze
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }
}
