//! Contracts for the two collaborators the worker drives: a capture device
//! that yields frames and a pose extractor that finds landmarks in them.
//!
//! Both are object-safe so a hardware backend can be swapped in for the
//! built-in simulation without touching the worker.

use crate::error::CaptureError;
use crate::perception::frame::Frame;

/// Anything that produces video frames.
///
/// `read` may block for up to one frame interval. A failed read is not fatal;
/// the worker retries on its next iteration. Implementations release the
/// underlying device when dropped.
pub trait FrameSource: Send {
    fn read(&mut self) -> Result<Frame, CaptureError>;

    /// Human-readable device name, for logs.
    fn name(&self) -> &str;
}

/// Black-box body landmark extraction: frame in, landmarks out (if any).
pub trait PoseExtractor: Send {
    fn extract(&mut self, frame: &Frame) -> Option<LandmarkSet>;
}

/// Named body points an extractor may report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Landmark {
    Nose,
    LeftShoulder,
    RightShoulder,
}

/// One tracked point, in normalized image coordinates (0..1, y down).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LandmarkPoint {
    pub x: f32,
    pub y: f32,
    /// Extractor's confidence that the point is visible, 0..1.
    pub visibility: f32,
}

/// The landmarks found in one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LandmarkSet {
    points: Vec<(Landmark, LandmarkPoint)>,
}

impl LandmarkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, landmark: Landmark, point: LandmarkPoint) -> Self {
        self.insert(landmark, point);
        self
    }

    pub fn insert(&mut self, landmark: Landmark, point: LandmarkPoint) {
        match self.points.iter_mut().find(|(l, _)| *l == landmark) {
            Some(slot) => slot.1 = point,
            None => self.points.push((landmark, point)),
        }
    }

    pub fn get(&self, landmark: Landmark) -> Option<LandmarkPoint> {
        self.points
            .iter()
            .find(|(l, _)| *l == landmark)
            .map(|(_, p)| *p)
    }

    /// The point, if present and at least `min_confidence` visible.
    pub fn visible(&self, landmark: Landmark, min_confidence: f32) -> Option<LandmarkPoint> {
        self.get(landmark).filter(|p| p.visibility >= min_confidence)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Landmark, LandmarkPoint)> {
        self.points.iter()
    }
}
