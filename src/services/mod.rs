//! Services - event detection and scoring
//!
//! This module contains the core logic:
//! - `event_log` - Append-only, deduplicating event store
//! - `debounce` - Threshold timer shared by the sustained-condition trackers
//! - `gaze` - Sustained off-camera gaze detection
//! - `presence` - No-face / multiple-faces classification
//! - `object_policy` - Unauthorized object filter
//! - `evaluator` - Per-frame orchestration of the above
//! - `report` - End-of-session reduction and integrity score
//! - `session` - Per-candidate ownership of all session state

pub mod debounce;
pub mod evaluator;
pub mod event_log;
pub mod gaze;
pub mod object_policy;
pub mod presence;
pub mod report;
pub mod session;

// Re-export commonly used types
pub use evaluator::{CandidateEvent, FrameEvaluator, FrameOutcome};
pub use event_log::EventLog;
pub use gaze::{GazeState, GazeTracker};
pub use object_policy::ObjectPolicy;
pub use presence::{Presence, PresenceTracker};
pub use report::{ReportBuilder, ReportError, ScoringWeights, SessionReport};
pub use session::{Session, SharedSession};
