//! Append-only, deduplicating session event log
//!
//! A record is suppressed when it repeats the kind of the most recently
//! appended record within the dedup window. Any change of kind appends
//! immediately regardless of timing.

use crate::domain::{EventKind, EventRecord, Timestamp};
use chrono::Duration;
use tracing::{debug, info};

/// Default minimum gap between two entries of the same event type (5 seconds)
pub const DEFAULT_DEDUP_WINDOW_MS: i64 = 5000;

/// Kind and time of the last appended record
#[derive(Debug, Clone)]
struct LastAppend {
    kind: EventKind,
    at: Timestamp,
}

/// Chronological log of integrity events for one session
#[derive(Debug, Clone)]
pub struct EventLog {
    records: Vec<EventRecord>,
    last: Option<LastAppend>,
    dedup_window: Duration,
}

impl EventLog {
    pub fn new() -> Self {
        Self::with_dedup_window(Duration::milliseconds(DEFAULT_DEDUP_WINDOW_MS))
    }

    pub fn with_dedup_window(dedup_window: Duration) -> Self {
        Self { records: Vec::new(), last: None, dedup_window }
    }

    /// Append `kind` at `now` unless it duplicates the previous record.
    /// Returns true if a record was appended.
    pub fn record(&mut self, kind: EventKind, now: Timestamp) -> bool {
        if let Some(last) = &self.last {
            if last.kind == kind && now.signed_duration_since(last.at) <= self.dedup_window {
                debug!(
                    event = %kind,
                    since_last_ms = %now.signed_duration_since(last.at).num_milliseconds(),
                    "event_suppressed"
                );
                return false;
            }
        }

        info!(event = %kind, ts = %now.format("%Y-%m-%d %H:%M:%S"), "event_recorded");

        self.last = Some(LastAppend { kind: kind.clone(), at: now });
        self.records.push(EventRecord::new(kind, now));
        true
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn dedup_window(&self) -> Duration {
        self.dedup_window
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EventRecord> {
        self.records.iter()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a EventRecord;
    type IntoIter = std::slice::Iter<'a, EventRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 5, 4, 10, 0, 0).unwrap()
    }

    fn at_ms(ms: i64) -> Timestamp {
        t0() + Duration::milliseconds(ms)
    }

    #[test]
    fn test_first_record_appends() {
        let mut log = EventLog::new();

        assert!(log.record(EventKind::NoFace, t0()));
        assert_eq!(log.len(), 1);
        assert_eq!(log.records()[0].kind, EventKind::NoFace);
        assert_eq!(log.records()[0].timestamp, t0());
    }

    #[test]
    fn test_same_kind_within_window_appends_once() {
        let mut log = EventLog::new();

        for ms in (0..=5000).step_by(250) {
            log.record(EventKind::MultipleFaces, at_ms(ms));
        }

        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_same_kind_exactly_at_window_is_suppressed() {
        let mut log = EventLog::new();

        assert!(log.record(EventKind::LookingAway, at_ms(0)));
        assert!(!log.record(EventKind::LookingAway, at_ms(5000)));
        assert!(log.record(EventKind::LookingAway, at_ms(5001)));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_suppressed_call_does_not_extend_window() {
        let mut log = EventLog::new();

        log.record(EventKind::NoFace, at_ms(0));
        log.record(EventKind::NoFace, at_ms(4000));
        // Window is measured from the last append, not the last attempt
        assert!(log.record(EventKind::NoFace, at_ms(5500)));
    }

    #[test]
    fn test_alternating_kinds_always_append() {
        let mut log = EventLog::new();
        let book = EventKind::unauthorized_item("book");

        for i in 0..10 {
            let kind = if i % 2 == 0 { book.clone() } else { EventKind::MultipleFaces };
            assert!(log.record(kind, at_ms(i * 10)));
        }

        assert_eq!(log.len(), 10);
    }

    #[test]
    fn test_distinct_labels_are_distinct_kinds() {
        let mut log = EventLog::new();

        assert!(log.record(EventKind::unauthorized_item("book"), at_ms(0)));
        assert!(log.record(EventKind::unauthorized_item("cell phone"), at_ms(1)));
        assert!(log.record(EventKind::unauthorized_item("book"), at_ms(2)));
    }

    #[test]
    fn test_custom_window() {
        let mut log = EventLog::with_dedup_window(Duration::seconds(1));

        assert!(log.record(EventKind::NoFace, at_ms(0)));
        assert!(!log.record(EventKind::NoFace, at_ms(1000)));
        assert!(log.record(EventKind::NoFace, at_ms(1001)));
    }

    #[test]
    fn test_records_in_insertion_order() {
        let mut log = EventLog::new();
        log.record(EventKind::NoFace, at_ms(0));
        log.record(EventKind::LookingAway, at_ms(100));
        log.record(EventKind::MultipleFaces, at_ms(200));

        let kinds: Vec<_> = log.iter().map(|r| r.kind.clone()).collect();
        assert_eq!(kinds, vec![EventKind::NoFace, EventKind::LookingAway, EventKind::MultipleFaces]);
    }
}
