//! Unauthorized object filter
//!
//! Stateless: maps a frame's detections to "Unauthorized Item: <label>"
//! events, one per qualifying detection. Flood control across frames is
//! left to the event log's dedup window.

use crate::domain::{Detection, EventKind};
use crate::infra::config::Config;
use rustc_hash::FxHashSet;

/// Set of object labels that must not appear in frame
#[derive(Debug, Clone)]
pub struct ObjectPolicy {
    unauthorized: FxHashSet<String>,
}

impl ObjectPolicy {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { unauthorized: labels.into_iter().map(Into::into).collect() }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.unauthorized_labels().iter().cloned())
    }

    pub fn is_unauthorized(&self, label: &str) -> bool {
        self.unauthorized.contains(label)
    }

    /// Events for every unauthorized detection, in detection order
    pub fn evaluate<'a>(
        &'a self,
        detections: &'a [Detection],
    ) -> impl Iterator<Item = EventKind> + 'a {
        detections
            .iter()
            .filter(|d| self.is_unauthorized(&d.label))
            .map(|d| EventKind::unauthorized_item(d.label.as_str()))
    }
}

impl Default for ObjectPolicy {
    fn default() -> Self {
        Self::new(["cell phone", "book"])
    }
}
