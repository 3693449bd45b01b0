//! Debounce timer shared by the sustained-condition trackers
//!
//! The timer starts on the first frame a condition is observed and confirms
//! once the condition has been held for strictly longer than the threshold.
//! Clearing discards the interval; a later observation starts a fresh one.

use crate::domain::Timestamp;
use chrono::Duration;

/// Where a debounced condition stands after the latest observation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    /// Condition not being timed
    Idle,
    /// Condition observed, threshold not yet exceeded
    Timing,
    /// Condition held longer than the threshold
    Confirmed,
}

#[derive(Debug, Clone)]
pub struct DebounceTimer {
    started_at: Option<Timestamp>,
    threshold: Duration,
}

impl DebounceTimer {
    pub fn new(threshold: Duration) -> Self {
        Self { started_at: None, threshold }
    }

    /// Register that the condition is observed at `now`
    pub fn hold(&mut self, now: Timestamp) -> DebounceState {
        match self.started_at {
            None => {
                self.started_at = Some(now);
                DebounceState::Timing
            }
            Some(start) if now.signed_duration_since(start) > self.threshold => {
                DebounceState::Confirmed
            }
            Some(_) => DebounceState::Timing,
        }
    }

    /// Stop timing. Returns true if a timer was running.
    pub fn clear(&mut self) -> bool {
        self.started_at.take().is_some()
    }

    /// State as of `now` without registering an observation
    pub fn state(&self, now: Timestamp) -> DebounceState {
        match self.started_at {
            None => DebounceState::Idle,
            Some(start) if now.signed_duration_since(start) > self.threshold => {
                DebounceState::Confirmed
            }
            Some(_) => DebounceState::Timing,
        }
    }

    pub fn started_at(&self) -> Option<Timestamp> {
        self.started_at
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn at_ms(ms: i64) -> Timestamp {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap() + Duration::milliseconds(ms)
    }

    #[test]
    fn test_first_hold_starts_timing() {
        let mut timer = DebounceTimer::new(Duration::seconds(5));

        assert_eq!(timer.state(at_ms(0)), DebounceState::Idle);
        assert_eq!(timer.hold(at_ms(0)), DebounceState::Timing);
        assert_eq!(timer.started_at(), Some(at_ms(0)));
    }

    #[test]
    fn test_confirms_only_after_threshold_exceeded() {
        let mut timer = DebounceTimer::new(Duration::seconds(5));

        timer.hold(at_ms(0));
        assert_eq!(timer.hold(at_ms(5000)), DebounceState::Timing);
        assert_eq!(timer.hold(at_ms(5001)), DebounceState::Confirmed);
        // Start instant is not moved by further holds
        assert_eq!(timer.started_at(), Some(at_ms(0)));
    }

    #[test]
    fn test_clear_restarts_interval() {
        let mut timer = DebounceTimer::new(Duration::seconds(5));

        timer.hold(at_ms(0));
        assert!(timer.clear());
        assert!(!timer.clear());
        assert_eq!(timer.hold(at_ms(6000)), DebounceState::Timing);
        assert_eq!(timer.hold(at_ms(10000)), DebounceState::Timing);
    }

    #[test]
    fn test_zero_threshold_still_needs_second_frame() {
        let mut timer = DebounceTimer::new(Duration::zero());

        assert_eq!(timer.hold(at_ms(0)), DebounceState::Timing);
        assert_eq!(timer.hold(at_ms(1)), DebounceState::Confirmed);
    }
}
