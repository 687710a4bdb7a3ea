//! lensd - Scene Lens daemon
//!
//! This daemon:
//! 1. Ingests frames from the configured source (stub or JPEG directory)
//! 2. Samples the detector at a bounded rate via the detection loop
//! 3. Logs classification transitions and a periodic health line

use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use scene_lens::config::LensdConfig;
use scene_lens::{DetectionLoop, FrameSource, StubDetector, StubExtractor};

fn main() -> Result<()> {
    // Initialize logging (simple stderr)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = LensdConfig::load()?;

    let mut source = FrameSource::open(cfg.source.clone())?;
    source.connect()?;

    let mut lens = DetectionLoop::new(
        Box::new(StubDetector::new()),
        Box::new(StubExtractor::new()),
        cfg.rules,
    )
    .with_min_interval(cfg.sample_interval);

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = running.clone();
        ctrlc::set_handler(move || running.store(false, Ordering::SeqCst))?;
    }

    log::info!(
        "lensd running. source={} fps={} sample_interval={}ms",
        cfg.source.url,
        cfg.source.target_fps,
        cfg.sample_interval.as_millis()
    );

    let frame_pause = Duration::from_millis(1000 / u64::from(cfg.source.target_fps.max(1)));
    let mut last_health_log = Instant::now();
    let mut last_concept = String::new();

    while running.load(Ordering::SeqCst) {
        let frame = match source.next_frame() {
            Ok(frame) => frame,
            Err(e) => {
                log::error!("frame source unavailable, stopping: {}", e);
                break;
            }
        };

        if lens.tick(&frame).is_sampled() {
            let snapshot = lens.latest();
            if snapshot.concept != last_concept {
                if snapshot.has_concept() {
                    log::info!("concept: {} | {}", snapshot.concept, snapshot.detail);
                } else {
                    log::info!("concept cleared");
                }
                last_concept = snapshot.concept.clone();
            }
            if !snapshot.raw_detections.is_empty() {
                log::debug!(
                    "frame {}: detections={:?} piles={}",
                    frame.sequence,
                    snapshot.raw_detections,
                    snapshot.cluster_count
                );
            }
        }

        if last_health_log.elapsed() >= Duration::from_secs(5) {
            let source_stats = source.stats();
            let loop_stats = lens.stats();
            log::info!(
                "source health={} frames={} url={} | ticks sampled={} skipped={} degraded={}",
                source.is_healthy(),
                source_stats.frames_captured,
                source_stats.url,
                loop_stats.sampled,
                loop_stats.skipped,
                loop_stats.degraded
            );
            last_health_log = Instant::now();
        }

        std::thread::sleep(frame_pause);
    }

    log::info!("lensd stopped");
    Ok(())
}
