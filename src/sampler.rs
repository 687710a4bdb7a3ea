//! The throttled detection loop.
//!
//! The host's frame callback runs far more often than the detector can
//! afford; [`DetectionLoop`] bounds inference to one sample per
//! [`DEFAULT_SAMPLE_INTERVAL`] and skips every tick in between. All mutable
//! classification state lives inside the loop object and is updated only
//! through `&mut self`, so there is exactly one writer by construction; a
//! caller that moves the loop to another thread carries the single-writer
//! guarantee with it.
//!
//! Backend failures never escape a tick: a failing detector or extractor is
//! logged and degraded to an empty result, and the loop keeps running.

use std::time::{Duration, Instant};

use crate::classify::{Classification, SceneClassifier};
use crate::detect::{Detection, Detector, LineExtractor, ObjectClass};
use crate::frame::Frame;
use crate::geometry::{cluster_stacks, filter_vertical, StackCluster};
use crate::RuleThresholds;

/// Minimum spacing between detector invocations.
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(200);

/// What a single tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Inside the throttle window; nothing ran.
    Skipped,
    /// Detector (and possibly extractor) ran and the snapshot was replaced.
    Sampled,
}

impl TickOutcome {
    pub fn is_sampled(&self) -> bool {
        matches!(self, Self::Sampled)
    }
}

/// Most recent classification state, replaced wholesale on every sampled
/// tick. `concept` and `detail` are empty strings when no rule matched:
/// "nothing to show this frame", not an error.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneSnapshot {
    pub concept: String,
    pub detail: String,
    /// Overlay debug list, one `"{label} ({score}%)"` entry per detection.
    pub raw_detections: Vec<String>,
    /// Piles found this tick (zero when the extractor did not run).
    pub cluster_count: usize,
}

impl SceneSnapshot {
    fn from_tick(
        detections: &[Detection],
        clusters: &[StackCluster],
        classification: Option<Classification>,
    ) -> Self {
        let (concept, detail) = match classification {
            Some(c) => (c.concept.label().to_string(), c.detail),
            None => (String::new(), String::new()),
        };
        Self {
            concept,
            detail,
            raw_detections: detections.iter().map(Detection::summary).collect(),
            cluster_count: clusters.len(),
        }
    }

    pub fn has_concept(&self) -> bool {
        !self.concept.is_empty()
    }
}

/// Tick counters for health logging.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoopStats {
    pub sampled: u64,
    pub skipped: u64,
    /// Ticks where a backend failed and empty results were substituted.
    pub degraded: u64,
}

/// Sampling driver: owns the backends, the classifier, and the latest
/// snapshot. See the module docs for the threading contract.
pub struct DetectionLoop {
    detector: Box<dyn Detector>,
    extractor: Box<dyn LineExtractor>,
    classifier: SceneClassifier,
    min_interval: Duration,
    last_sample: Option<Instant>,
    latest: SceneSnapshot,
    stats: LoopStats,
}

impl DetectionLoop {
    pub fn new(
        detector: Box<dyn Detector>,
        extractor: Box<dyn LineExtractor>,
        rules: RuleThresholds,
    ) -> Self {
        Self {
            detector,
            extractor,
            classifier: SceneClassifier::new(rules),
            min_interval: DEFAULT_SAMPLE_INTERVAL,
            last_sample: None,
            latest: SceneSnapshot::default(),
            stats: LoopStats::default(),
        }
    }

    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval;
        self
    }

    /// Drive one tick at the current time.
    pub fn tick(&mut self, frame: &Frame) -> TickOutcome {
        self.tick_at(frame, Instant::now())
    }

    /// Drive one tick at an explicit time. A tick earlier than
    /// `min_interval` after the last sampled tick is skipped; otherwise the
    /// full sample-classify-publish sequence runs to completion before
    /// returning.
    pub fn tick_at(&mut self, frame: &Frame, now: Instant) -> TickOutcome {
        if let Some(last) = self.last_sample {
            if now.duration_since(last) < self.min_interval {
                self.stats.skipped += 1;
                return TickOutcome::Skipped;
            }
        }
        self.last_sample = Some(now);

        let detections = match self.detector.detect(frame) {
            Ok(detections) => detections,
            Err(e) => {
                log::warn!(
                    "detector '{}' failed on frame {}, treating tick as empty: {}",
                    self.detector.name(),
                    frame.sequence,
                    e
                );
                self.stats.degraded += 1;
                Vec::new()
            }
        };

        // Edge extraction is only worth the cost when a book is in view;
        // the gate tests class presence, not the per-rule confidence floor.
        let book_in_view = detections.iter().any(|d| d.class() == ObjectClass::Book);
        let clusters = if book_in_view {
            match self.extractor.extract_lines(frame) {
                Ok(lines) => cluster_stacks(
                    filter_vertical(&lines, self.classifier.rules()),
                    self.classifier.rules(),
                ),
                Err(e) => {
                    log::warn!(
                        "line extractor '{}' failed on frame {}, no piles this tick: {}",
                        self.extractor.name(),
                        frame.sequence,
                        e
                    );
                    self.stats.degraded += 1;
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        let classification = self.classifier.classify(&detections, &clusters);
        if let Some(c) = &classification {
            log::debug!(
                "frame {}: {} ({} detections, {} piles)",
                frame.sequence,
                c.concept.label(),
                detections.len(),
                clusters.len()
            );
        }

        self.latest = SceneSnapshot::from_tick(&detections, &clusters, classification);
        self.stats.sampled += 1;
        TickOutcome::Sampled
    }

    /// Latest published snapshot. Valid until the next sampled tick.
    pub fn latest(&self) -> &SceneSnapshot {
        &self.latest
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }
}
