//! Shared types for perception input

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wall-clock instant used for every timing decision within a session
pub type Timestamp = DateTime<Utc>;

/// Face-mesh index of the nose tip
pub const NOSE_TIP: usize = 1;

/// Face-mesh index of the left outer eye corner
pub const LEFT_EYE_OUTER: usize = 33;

/// Face-mesh index of the right outer eye corner
pub const RIGHT_EYE_OUTER: usize = 263;

/// Axis-aligned box in pixel coordinates (x1, y1) top-left, (x2, y2) bottom-right
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

/// Single object-detector hit for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: String,
    #[serde(default, rename = "box")]
    pub bounding_box: BoundingBox,
    #[serde(default)]
    pub confidence: f32,
}

impl Detection {
    pub fn new(label: impl Into<String>, bounding_box: BoundingBox, confidence: f32) -> Self {
        Self { label: label.into(), bounding_box, confidence }
    }
}

/// One landmark point, normalized image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }
}

/// Horizontal head/gaze direction for a single frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GazeDirection {
    Center,
    Left,
    Right,
}

impl GazeDirection {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            GazeDirection::Center => "center",
            GazeDirection::Left => "left",
            GazeDirection::Right => "right",
        }
    }

    #[inline]
    pub fn is_center(&self) -> bool {
        matches!(self, GazeDirection::Center)
    }
}

/// Ordered landmark set for one detected face
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FaceLandmarks {
    pub points: Vec<Landmark>,
}

impl FaceLandmarks {
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    /// Classify gaze from nose-to-eye horizontal asymmetry.
    ///
    /// Returns `None` when the set lacks any of the nose tip or outer eye
    /// corner indices.
    pub fn gaze_direction(&self, ratio: f32) -> Option<GazeDirection> {
        let nose = self.points.get(NOSE_TIP)?;
        let left_eye = self.points.get(LEFT_EYE_OUTER)?;
        let right_eye = self.points.get(RIGHT_EYE_OUTER)?;

        let dist_left = nose.x - left_eye.x;
        let dist_right = right_eye.x - nose.x;

        let direction = if dist_left > dist_right * ratio {
            GazeDirection::Right
        } else if dist_right > dist_left * ratio {
            GazeDirection::Left
        } else {
            GazeDirection::Center
        };
        Some(direction)
    }
}

/// Everything the perception collaborators reported for one frame
#[derive(Debug, Clone, Default)]
pub struct FrameObservation {
    pub detections: Vec<Detection>,
    pub faces: Vec<FaceLandmarks>,
}

impl FrameObservation {
    pub fn new(detections: Vec<Detection>, faces: Vec<FaceLandmarks>) -> Self {
        Self { detections, faces }
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }
}
