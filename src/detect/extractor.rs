use anyhow::Result;

use crate::frame::Frame;

/// Raw line segment endpoints as reported by the edge extractor, in pixel
/// coordinates. No ordering between the endpoints is guaranteed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawLine {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl RawLine {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }
}

/// Edge/line extraction capability.
///
/// Real implementations are expected to be semantically equivalent to
/// grayscale → 5x5 Gaussian blur → Canny (50/150) → probabilistic Hough
/// (rho=1, theta=pi/180, threshold=80, minLineLength=50, maxLineGap=10).
/// The engine only depends on the output shape, so tests drive the pipeline
/// with scripted segment lists instead of a CV library.
pub trait LineExtractor: Send {
    /// Backend identifier.
    fn name(&self) -> &'static str;

    /// Extract candidate line segments from a frame.
    fn extract_lines(&mut self, frame: &Frame) -> Result<Vec<RawLine>>;
}
