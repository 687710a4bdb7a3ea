//! Frame sources.
//!
//! Camera acquisition proper lives outside this crate; what the engine needs
//! is a steady supply of [`Frame`]s to sample from. Two sources are provided:
//!
//! - `stub://`: synthetic frames that slowly rotate through staged scenes,
//!   for tests and model-less daemon runs
//! - a directory of JPEG stills (feature: `ingest-image`)
//!
//! Sources hand out owned frames and retain nothing.

#[cfg(feature = "ingest-image")]
mod image_dir;
mod stub;

#[cfg(feature = "ingest-image")]
pub use image_dir::ImageDirSource;
pub use stub::StubSource;

use anyhow::Result;

use crate::frame::Frame;

/// Configuration shared by all sources.
#[derive(Clone, Debug)]
pub struct SourceConfig {
    /// `stub://<name>` or a local directory path.
    pub url: String,
    pub width: u32,
    pub height: u32,
    /// Capture rate the daemon paces itself to.
    pub target_fps: u32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: "stub://classroom".to_string(),
            width: 640,
            height: 480,
            target_fps: 30,
        }
    }
}

/// Statistics for a frame source.
#[derive(Clone, Debug)]
pub struct SourceStats {
    pub frames_captured: u64,
    pub url: String,
}

/// Frame source with backend dispatch on the URL scheme.
pub struct FrameSource {
    backend: Backend,
}

enum Backend {
    Stub(StubSource),
    #[cfg(feature = "ingest-image")]
    ImageDir(ImageDirSource),
}

impl FrameSource {
    pub fn open(config: SourceConfig) -> Result<Self> {
        if config.url.starts_with("stub://") {
            return Ok(Self {
                backend: Backend::Stub(StubSource::new(config)),
            });
        }
        #[cfg(feature = "ingest-image")]
        {
            Ok(Self {
                backend: Backend::ImageDir(ImageDirSource::new(config)?),
            })
        }
        #[cfg(not(feature = "ingest-image"))]
        {
            Err(anyhow::anyhow!(
                "source '{}' requires the ingest-image feature (only stub:// is built in)",
                config.url
            ))
        }
    }

    pub fn connect(&mut self) -> Result<()> {
        match &mut self.backend {
            Backend::Stub(source) => source.connect(),
            #[cfg(feature = "ingest-image")]
            Backend::ImageDir(source) => source.connect(),
        }
    }

    /// Capture the next frame.
    pub fn next_frame(&mut self) -> Result<Frame> {
        match &mut self.backend {
            Backend::Stub(source) => source.next_frame(),
            #[cfg(feature = "ingest-image")]
            Backend::ImageDir(source) => source.next_frame(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        match &self.backend {
            Backend::Stub(source) => source.is_healthy(),
            #[cfg(feature = "ingest-image")]
            Backend::ImageDir(source) => source.is_healthy(),
        }
    }

    pub fn stats(&self) -> SourceStats {
        match &self.backend {
            Backend::Stub(source) => source.stats(),
            #[cfg(feature = "ingest-image")]
            Backend::ImageDir(source) => source.stats(),
        }
    }
}
