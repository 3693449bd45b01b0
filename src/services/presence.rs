//! Face presence classification
//!
//! - zero faces: debounced, "No Face Detected" once absence outlasts the threshold
//! - two or more faces: "Multiple Faces Detected" immediately, no debounce
//! - exactly one face: no presence signal, gaze evaluation proceeds

use super::debounce::{DebounceState, DebounceTimer};
use crate::domain::{EventKind, Timestamp};
use chrono::Duration;
use tracing::debug;

/// Default no-face threshold (10 seconds)
pub const DEFAULT_NO_FACE_THRESHOLD_MS: i64 = 10_000;

/// Presence classification for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// No face in frame; `confirmed` once absence outlasted the threshold
    Absent { confirmed: bool },
    /// Exactly one face
    Single,
    /// Two or more faces
    Multiple(usize),
}

impl Presence {
    /// Event to submit for this frame, at most one
    pub fn event(&self) -> Option<EventKind> {
        match self {
            Presence::Absent { confirmed: true } => Some(EventKind::NoFace),
            Presence::Multiple(_) => Some(EventKind::MultipleFaces),
            _ => None,
        }
    }

    /// Gaze is only meaningful with exactly one face
    #[inline]
    pub fn allows_gaze(&self) -> bool {
        matches!(self, Presence::Single)
    }
}

/// Per-session face presence tracker
#[derive(Debug, Clone)]
pub struct PresenceTracker {
    no_face: DebounceTimer,
}

impl PresenceTracker {
    pub fn new(no_face_threshold: Duration) -> Self {
        Self { no_face: DebounceTimer::new(no_face_threshold) }
    }

    pub fn update(&mut self, face_count: usize, now: Timestamp) -> Presence {
        if face_count == 0 {
            let was_running = self.no_face.is_running();
            let confirmed = self.no_face.hold(now) == DebounceState::Confirmed;
            if !was_running {
                debug!("no_face_timer_started");
            }
            return Presence::Absent { confirmed };
        }

        if self.no_face.clear() {
            debug!(face_count = %face_count, "no_face_timer_cleared");
        }

        if face_count == 1 {
            Presence::Single
        } else {
            Presence::Multiple(face_count)
        }
    }

    pub fn absent_since(&self) -> Option<Timestamp> {
        self.no_face.started_at()
    }
}

impl Default for PresenceTracker {
    fn default() -> Self {
        Self::new(Duration::milliseconds(DEFAULT_NO_FACE_THRESHOLD_MS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn at_ms(ms: i64) -> Timestamp {
        Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap() + Duration::milliseconds(ms)
    }

    #[test]
    fn test_absence_below_threshold_emits_nothing() {
        let mut presence = PresenceTracker::default();

        for ms in (0..=10_000).step_by(500) {
            let p = presence.update(0, at_ms(ms));
            assert_eq!(p, Presence::Absent { confirmed: false });
            assert_eq!(p.event(), None);
        }
    }

    #[test]
    fn test_sustained_absence_emits_no_face() {
        let mut presence = PresenceTracker::default();

        presence.update(0, at_ms(0));
        let p = presence.update(0, at_ms(10_001));

        assert_eq!(p, Presence::Absent { confirmed: true });
        assert_eq!(p.event(), Some(EventKind::NoFace));
        assert!(!p.allows_gaze());
    }

    #[test]
    fn test_face_clears_absence_timer() {
        let mut presence = PresenceTracker::default();

        presence.update(0, at_ms(0));
        presence.update(1, at_ms(9_000));
        assert_eq!(presence.absent_since(), None);

        presence.update(0, at_ms(9_500));
        assert_eq!(presence.update(0, at_ms(15_000)).event(), None);
    }

    #[test]
    fn test_multiple_faces_fire_on_first_frame() {
        let mut presence = PresenceTracker::default();

        let p = presence.update(2, at_ms(0));

        assert_eq!(p, Presence::Multiple(2));
        assert_eq!(p.event(), Some(EventKind::MultipleFaces));
        assert!(!p.allows_gaze());
    }

    #[test]
    fn test_multiple_faces_also_clear_absence_timer() {
        let mut presence = PresenceTracker::default();

        presence.update(0, at_ms(0));
        presence.update(3, at_ms(100));

        assert_eq!(presence.absent_since(), None);
    }

    #[test]
    fn test_single_face_allows_gaze() {
        let mut presence = PresenceTracker::default();

        let p = presence.update(1, at_ms(0));

        assert_eq!(p, Presence::Single);
        assert_eq!(p.event(), None);
        assert!(p.allows_gaze());
    }
}
