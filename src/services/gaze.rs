//! Sustained off-camera gaze detection
//!
//! Converts the per-frame gaze direction of a single visible face into a
//! "User Looking Away" signal. Brief glances are ignored: the direction must
//! stay off-center for longer than the focus-lost threshold. Any centered
//! frame clears the timer.

use super::debounce::{DebounceState, DebounceTimer};
use crate::domain::{EventKind, GazeDirection, Timestamp};
use chrono::Duration;
use tracing::debug;

/// Default focus-lost threshold (5 seconds)
pub const DEFAULT_FOCUS_LOST_THRESHOLD_MS: i64 = 5000;

/// Gaze tracker state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GazeState {
    NotLookingAway,
    Timing,
    LookingAwayConfirmed,
}

impl From<DebounceState> for GazeState {
    fn from(state: DebounceState) -> Self {
        match state {
            DebounceState::Idle => GazeState::NotLookingAway,
            DebounceState::Timing => GazeState::Timing,
            DebounceState::Confirmed => GazeState::LookingAwayConfirmed,
        }
    }
}

/// Per-session gaze debounce
#[derive(Debug, Clone)]
pub struct GazeTracker {
    timer: DebounceTimer,
}

impl GazeTracker {
    pub fn new(focus_lost_threshold: Duration) -> Self {
        Self { timer: DebounceTimer::new(focus_lost_threshold) }
    }

    /// Feed one frame's direction. Returns the event to submit, if any.
    ///
    /// While confirmed, every off-center frame yields an event; the event
    /// log's dedup window limits how many are kept.
    pub fn update(&mut self, direction: GazeDirection, now: Timestamp) -> Option<EventKind> {
        if direction.is_center() {
            if self.timer.clear() {
                debug!("gaze_timer_cleared");
            }
            return None;
        }

        let was_running = self.timer.is_running();
        match self.timer.hold(now) {
            DebounceState::Confirmed => Some(EventKind::LookingAway),
            _ => {
                if !was_running {
                    debug!(direction = %direction.as_str(), "gaze_timer_started");
                }
                None
            }
        }
    }

    /// Drop any running timer (face no longer visible)
    pub fn reset(&mut self) {
        if self.timer.clear() {
            debug!("gaze_timer_reset");
        }
    }

    pub fn state(&self, now: Timestamp) -> GazeState {
        self.timer.state(now).into()
    }

    pub fn off_center_since(&self) -> Option<Timestamp> {
        self.timer.started_at()
    }
}

impl Default for GazeTracker {
    fn default() -> Self {
        Self::new(Duration::milliseconds(DEFAULT_FOCUS_LOST_THRESHOLD_MS))
    }
}
