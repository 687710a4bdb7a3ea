use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

use crate::ingest::SourceConfig;
use crate::RuleThresholds;

const DEFAULT_SOURCE_URL: &str = "stub://classroom";
const DEFAULT_TARGET_FPS: u32 = 30;
const DEFAULT_WIDTH: u32 = 640;
const DEFAULT_HEIGHT: u32 = 480;
const DEFAULT_SAMPLE_INTERVAL_MS: u64 = 200;

#[derive(Debug, Deserialize, Default)]
struct LensdConfigFile {
    source: Option<SourceConfigFile>,
    sampler: Option<SamplerConfigFile>,
    rules: Option<RuleThresholds>,
}

#[derive(Debug, Deserialize, Default)]
struct SourceConfigFile {
    url: Option<String>,
    target_fps: Option<u32>,
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
struct SamplerConfigFile {
    interval_ms: Option<u64>,
}

/// Daemon configuration: file settings (path from `SCENE_LENS_CONFIG`),
/// overridden by environment variables, then validated.
#[derive(Debug, Clone)]
pub struct LensdConfig {
    pub source: SourceConfig,
    pub sample_interval: Duration,
    pub rules: RuleThresholds,
}

impl LensdConfig {
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("SCENE_LENS_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) => Some(read_config_file(Path::new(path))?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: LensdConfigFile) -> Self {
        let source = SourceConfig {
            url: file
                .source
                .as_ref()
                .and_then(|source| source.url.clone())
                .unwrap_or_else(|| DEFAULT_SOURCE_URL.to_string()),
            target_fps: file
                .source
                .as_ref()
                .and_then(|source| source.target_fps)
                .unwrap_or(DEFAULT_TARGET_FPS),
            width: file
                .source
                .as_ref()
                .and_then(|source| source.width)
                .unwrap_or(DEFAULT_WIDTH),
            height: file
                .source
                .as_ref()
                .and_then(|source| source.height)
                .unwrap_or(DEFAULT_HEIGHT),
        };
        let sample_interval = Duration::from_millis(
            file.sampler
                .and_then(|sampler| sampler.interval_ms)
                .unwrap_or(DEFAULT_SAMPLE_INTERVAL_MS),
        );
        Self {
            source,
            sample_interval,
            rules: file.rules.unwrap_or_default(),
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(url) = std::env::var("SCENE_LENS_SOURCE_URL") {
            if !url.trim().is_empty() {
                self.source.url = url;
            }
        }
        if let Ok(fps) = std::env::var("SCENE_LENS_TARGET_FPS") {
            let fps: u32 = fps
                .parse()
                .map_err(|_| anyhow!("SCENE_LENS_TARGET_FPS must be an integer"))?;
            self.source.target_fps = fps;
        }
        if let Ok(interval) = std::env::var("SCENE_LENS_SAMPLE_INTERVAL_MS") {
            let ms: u64 = interval.parse().map_err(|_| {
                anyhow!("SCENE_LENS_SAMPLE_INTERVAL_MS must be an integer number of milliseconds")
            })?;
            self.sample_interval = Duration::from_millis(ms);
        }
        if let Ok(floor) = std::env::var("SCENE_LENS_CONFIDENCE_FLOOR") {
            let floor: f32 = floor
                .parse()
                .map_err(|_| anyhow!("SCENE_LENS_CONFIDENCE_FLOOR must be a float"))?;
            self.rules.confidence_floor = floor;
        }
        Ok(())
    }

    fn validate(&mut self) -> Result<()> {
        validate_source_url(&self.source.url)?;
        if self.source.target_fps == 0 {
            return Err(anyhow!("target_fps must be greater than zero"));
        }
        if self.source.width == 0 || self.source.height == 0 {
            return Err(anyhow!("frame dimensions must be greater than zero"));
        }
        if self.sample_interval.is_zero() {
            return Err(anyhow!("sample interval must be greater than zero"));
        }
        self.rules.validate()?;
        Ok(())
    }
}

/// A conforming source URL is either `stub://<name>` with a plain local name,
/// or a bare filesystem path with no URL scheme at all.
pub fn validate_source_url(url: &str) -> Result<()> {
    // Compile once for repeated loads.
    static STUB_URL_RE: OnceLock<regex::Regex> = OnceLock::new();
    let re = STUB_URL_RE
        .get_or_init(|| regex::Regex::new(r"^stub://[a-z0-9_-]{1,64}$").unwrap());

    if url.trim().is_empty() {
        return Err(anyhow!("source url must not be empty"));
    }
    if url.starts_with("stub://") {
        if !re.is_match(url) {
            return Err(anyhow!(
                "stub source url must match ^stub://[a-z0-9_-]{{1,64}}$"
            ));
        }
        return Ok(());
    }
    if url.contains("://") {
        return Err(anyhow!(
            "source url '{}' has an unsupported scheme (stub:// or a local path)",
            url
        ));
    }
    Ok(())
}

fn read_config_file(path: &Path) -> Result<LensdConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}
