//! Domain models - perception inputs and integrity events
//!
//! This module contains the canonical data types used throughout the system:
//! - `Detection` - one object-detector hit (label, box, confidence)
//! - `FaceLandmarks` - landmark points for one detected face
//! - `GazeDirection` - per-frame head/gaze classification
//! - `EventKind` / `EventRecord` - integrity events written to the session log

pub mod event;
pub mod types;

// Re-export commonly used types at module level
pub use event::{EventKind, EventRecord};
pub use types::{
    BoundingBox, Detection, FaceLandmarks, FrameObservation, GazeDirection, Landmark, Timestamp,
};
