//! Integrity events recorded during a session

use super::types::Timestamp;
use serde::{Serialize, Serializer};
use std::fmt;

/// Category of an integrity event
///
/// The display form is the exact event-type string written to reports.
/// Two kinds are the same event for deduplication purposes iff they are
/// equal, so unauthorized items with different labels are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    UnauthorizedItem(String),
    MultipleFaces,
    LookingAway,
    NoFace,
}

impl EventKind {
    pub fn unauthorized_item(label: impl Into<String>) -> Self {
        EventKind::UnauthorizedItem(label.into())
    }

    /// Sustained off-camera gaze counts against focus, everything else is suspicious
    #[inline]
    pub fn is_focus_lost(&self) -> bool {
        matches!(self, EventKind::LookingAway)
    }

    /// Short snake_case tag for structured logs
    pub fn tag(&self) -> &'static str {
        match self {
            EventKind::UnauthorizedItem(_) => "unauthorized_item",
            EventKind::MultipleFaces => "multiple_faces",
            EventKind::LookingAway => "looking_away",
            EventKind::NoFace => "no_face",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::UnauthorizedItem(label) => write!(f, "Unauthorized Item: {}", label),
            EventKind::MultipleFaces => f.write_str("Multiple Faces Detected"),
            EventKind::LookingAway => f.write_str("User Looking Away"),
            EventKind::NoFace => f.write_str("No Face Detected"),
        }
    }
}

impl Serialize for EventKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Immutable entry in the session event log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRecord {
    pub timestamp: Timestamp,
    #[serde(rename = "event")]
    pub kind: EventKind,
}

impl EventRecord {
    pub fn new(kind: EventKind, timestamp: Timestamp) -> Self {
        Self { timestamp, kind }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono::Utc;

    #[test]
    fn test_event_kind_display() {
        assert_eq!(EventKind::unauthorized_item("book").to_string(), "Unauthorized Item: book");
        assert_eq!(EventKind::MultipleFaces.to_string(), "Multiple Faces Detected");
        assert_eq!(EventKind::LookingAway.to_string(), "User Looking Away");
        assert_eq!(EventKind::NoFace.to_string(), "No Face Detected");
    }

    #[test]
    fn test_unauthorized_items_distinct_by_label() {
        assert_ne!(EventKind::unauthorized_item("book"), EventKind::unauthorized_item("cell phone"));
        assert_eq!(EventKind::unauthorized_item("book"), EventKind::unauthorized_item("book"));
    }

    #[test]
    fn test_only_looking_away_is_focus_lost() {
        assert!(EventKind::LookingAway.is_focus_lost());
        assert!(!EventKind::NoFace.is_focus_lost());
        assert!(!EventKind::MultipleFaces.is_focus_lost());
        assert!(!EventKind::unauthorized_item("book").is_focus_lost());
    }

    #[test]
    fn test_record_serializes_event_string() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
        let record = EventRecord::new(EventKind::unauthorized_item("cell phone"), ts);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["event"], "Unauthorized Item: cell phone");
        assert_eq!(json["timestamp"], "2026-03-01T09:30:00Z");
    }
}
