mod scripted;
mod stub;

pub use scripted::{ScriptedDetector, ScriptedExtractor};
pub use stub::{StubDetector, StubExtractor};
