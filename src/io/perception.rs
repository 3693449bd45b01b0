//! Perception capability interfaces
//!
//! Object detection and face-landmark extraction are external collaborators.
//! The session only sees them through these traits, so event logic can be
//! driven by recorded or synthetic output without any model inference.

use crate::domain::{Detection, FaceLandmarks};

/// Produces object detections for a frame
pub trait ObjectDetector<F: ?Sized> {
    fn detect(&mut self, frame: &F) -> anyhow::Result<Vec<Detection>>;
}

/// Produces zero or more face landmark sets for a frame
pub trait FaceLandmarker<F: ?Sized> {
    fn extract_faces(&mut self, frame: &F) -> anyhow::Result<Vec<FaceLandmarks>>;
}

impl<F: ?Sized, T: ObjectDetector<F> + ?Sized> ObjectDetector<F> for Box<T> {
    fn detect(&mut self, frame: &F) -> anyhow::Result<Vec<Detection>> {
        (**self).detect(frame)
    }
}

impl<F: ?Sized, T: FaceLandmarker<F> + ?Sized> FaceLandmarker<F> for Box<T> {
    fn extract_faces(&mut self, frame: &F) -> anyhow::Result<Vec<FaceLandmarks>> {
        (**self).extract_faces(frame)
    }
}
