//! JPEG directory source (feature: `ingest-image`).
//!
//! Plays a directory of still frames in filename order, looping at the end.
//! Useful for replaying a captured classroom session against the engine
//! without any camera plumbing.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

use super::{SourceConfig, SourceStats};
use crate::frame::Frame;

pub struct ImageDirSource {
    config: SourceConfig,
    files: Vec<PathBuf>,
    cursor: usize,
    frame_count: u64,
    healthy: bool,
}

impl ImageDirSource {
    pub fn new(config: SourceConfig) -> Result<Self> {
        if config.url.contains("://") {
            return Err(anyhow!(
                "image ingestion only supports local directory paths (no URL schemes)"
            ));
        }
        Ok(Self {
            config,
            files: Vec::new(),
            cursor: 0,
            frame_count: 0,
            healthy: false,
        })
    }

    pub fn connect(&mut self) -> Result<()> {
        let dir = PathBuf::from(&self.config.url);
        let mut files: Vec<PathBuf> = std::fs::read_dir(&dir)
            .with_context(|| format!("failed to read frame directory {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                matches!(
                    path.extension().and_then(|ext| ext.to_str()),
                    Some("jpg") | Some("jpeg")
                )
            })
            .collect();
        files.sort();
        if files.is_empty() {
            return Err(anyhow!("no JPEG frames found in {}", dir.display()));
        }
        log::info!(
            "ImageDirSource: {} frames queued from {}",
            files.len(),
            dir.display()
        );
        self.files = files;
        self.healthy = true;
        Ok(())
    }

    pub fn next_frame(&mut self) -> Result<Frame> {
        if self.files.is_empty() {
            return Err(anyhow!("image source not connected"));
        }
        let path = &self.files[self.cursor];
        self.cursor = (self.cursor + 1) % self.files.len();

        let decoded = image::open(path)
            .with_context(|| format!("failed to decode {}", path.display()))?
            .into_rgb8();
        self.frame_count += 1;

        let (width, height) = decoded.dimensions();
        Ok(Frame::new(
            decoded.into_raw(),
            width,
            height,
            self.frame_count,
        ))
    }

    pub fn is_healthy(&self) -> bool {
        self.healthy
    }

    pub fn stats(&self) -> SourceStats {
        SourceStats {
            frames_captured: self.frame_count,
            url: self.config.url.clone(),
        }
    }
}
