use anyhow::Result;

use crate::frame::Frame;

/// Axis-aligned bounding box in pixel coordinates, origin top-left.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BBox {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl BBox {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

/// Object classes the concept cascade knows how to interpret. Detectors may
/// report anything; everything outside this set falls to `Unknown` and is
/// ignored by every rule.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectClass {
    Person,
    Book,
    Cup,
    CellPhone,
    Bottle,
    Unknown,
}

impl ObjectClass {
    /// Map a detector label (COCO-style, lowercase) onto a known class.
    pub fn from_label(label: &str) -> Self {
        match label {
            "person" => Self::Person,
            "book" => Self::Book,
            "cup" => Self::Cup,
            "cell phone" => Self::CellPhone,
            "bottle" => Self::Bottle,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Book => "book",
            Self::Cup => "cup",
            Self::CellPhone => "cell phone",
            Self::Bottle => "bottle",
            Self::Unknown => "unknown",
        }
    }
}

/// One labeled bounding box from the detector. Immutable; discarded after the
/// tick that produced it.
#[derive(Clone, Debug)]
pub struct Detection {
    /// Raw detector label, kept verbatim for the debug readout.
    pub label: String,
    /// Confidence in [0, 1].
    pub score: f32,
    pub bbox: BBox,
}

impl Detection {
    pub fn new(label: impl Into<String>, score: f32, bbox: BBox) -> Self {
        Self {
            label: label.into(),
            score,
            bbox,
        }
    }

    pub fn class(&self) -> ObjectClass {
        ObjectClass::from_label(&self.label)
    }

    /// Overlay line for the per-tick debug list, e.g. `"book (72%)"`.
    pub fn summary(&self) -> String {
        format!("{} ({:.0}%)", self.label, self.score * 100.0)
    }
}

/// Object detector capability.
///
/// The model behind this trait is a black box to the engine: the loop feeds it
/// frames and consumes bounding boxes. Implementations must not retain the
/// frame beyond the call.
pub trait Detector: Send {
    /// Backend identifier.
    fn name(&self) -> &'static str;

    /// Run detection on a frame.
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>>;

    /// Optional warm-up hook.
    fn warm_up(&mut self) -> Result<()> {
        Ok(())
    }
}
