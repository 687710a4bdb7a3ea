use anyhow::Result;

use super::{SourceConfig, SourceStats};
use crate::frame::Frame;

/// Frames per staged scene before the synthetic source moves on. At 30 fps
/// this holds each scene for a little under two seconds.
const FRAMES_PER_SCENE: u64 = 50;

/// Synthetic frame source for tests and model-less daemon runs.
///
/// Pixels are a pure function of the current scene state, so every frame
/// within one scene window is byte-identical and the digest-driven stub
/// backends see a stable scene instead of per-frame flicker.
pub struct StubSource {
    config: SourceConfig,
    frame_count: u64,
    scene_state: u8,
}

impl StubSource {
    pub fn new(config: SourceConfig) -> Self {
        Self {
            config,
            frame_count: 0,
            scene_state: 0,
        }
    }

    pub fn connect(&mut self) -> Result<()> {
        log::info!("StubSource: connected to {} (synthetic)", self.config.url);
        Ok(())
    }

    pub fn next_frame(&mut self) -> Result<Frame> {
        self.frame_count += 1;
        if self.frame_count % FRAMES_PER_SCENE == 0 {
            self.scene_state = self.scene_state.wrapping_add(1);
        }

        let pixel_count = (self.config.width * self.config.height * 3) as usize;
        let mut pixels = vec![0u8; pixel_count];
        for (i, pixel) in pixels.iter_mut().enumerate() {
            *pixel = ((i as u64 * 7 + self.scene_state as u64 * 31) % 256) as u8;
        }

        Ok(Frame::new(
            pixels,
            self.config.width,
            self.config.height,
            self.frame_count,
        ))
    }

    pub fn is_healthy(&self) -> bool {
        true
    }

    pub fn stats(&self) -> SourceStats {
        SourceStats {
            frames_captured: self.frame_count,
            url: self.config.url.clone(),
        }
    }
}
