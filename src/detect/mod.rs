mod backends;
mod detector;
mod extractor;

pub use backends::{ScriptedDetector, ScriptedExtractor, StubDetector, StubExtractor};
pub use detector::{BBox, Detection, Detector, ObjectClass};
pub use extractor::{LineExtractor, RawLine};
