//! IO modules - boundaries with external collaborators
//!
//! This module contains all external IO operations:
//! - `perception` - Capability traits for object detection and face landmarks
//! - `capture` - JSONL replay of recorded perception output
//! - `report_writer` - Session report output (CSV compatibility layout, JSON)

pub mod capture;
pub mod perception;
pub mod report_writer;

// Re-export commonly used types
pub use capture::{read_capture, CapturedFrame, ReplayPerception};
pub use perception::{FaceLandmarker, ObjectDetector};
pub use report_writer::ReportWriter;
