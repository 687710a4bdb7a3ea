//! Scene Lens
//!
//! This crate implements the live scene-to-data-structure classification
//! engine behind the Scene Lens tutor: it samples camera frames at a bounded
//! rate, asks an injected object detector what is in view, and maps physical
//! arrangements of everyday objects onto data-structure concepts.
//!
//! # Pipeline
//!
//! Per sampled tick:
//!
//! 1. detector → labeled bounding boxes with confidence scores
//! 2. line extractor (only when a book is in view) → raw edge segments
//! 3. [`geometry::filter_vertical`] → near-vertical candidate segments
//! 4. [`geometry::cluster_stacks`] → x-proximity clusters ("piles")
//! 5. [`classify::SceneClassifier`] → concept label + explanation
//!
//! # Module Structure
//!
//! - `frame`: owned pixel buffers handed to the backends
//! - `ingest`: frame sources (synthetic stub, optional JPEG directory)
//! - `detect`: detector / line-extractor capability traits and backends
//! - `geometry`: vertical-segment filtering and single-link clustering
//! - `classify`: the fixed-priority concept rule cascade
//! - `sampler`: the throttled detection loop and its published snapshot

use anyhow::{anyhow, Result};
use serde::Deserialize;

pub mod classify;
pub mod config;
pub mod detect;
pub mod frame;
pub mod geometry;
pub mod ingest;
pub mod sampler;

pub use classify::{Classification, Concept, SceneClassifier};
pub use detect::{
    BBox, Detection, Detector, LineExtractor, ObjectClass, RawLine, ScriptedDetector,
    ScriptedExtractor, StubDetector, StubExtractor,
};
pub use frame::Frame;
pub use geometry::{cluster_stacks, filter_vertical, LineSegment, StackCluster};
pub use ingest::{FrameSource, SourceStats, StubSource};
pub use sampler::{DetectionLoop, LoopStats, SceneSnapshot, TickOutcome, DEFAULT_SAMPLE_INTERVAL};

// -------------------- Rule Table --------------------

/// Every numeric threshold the clustering and classification stages consume,
/// in one auditable place. The cascade's tie-break order lives in
/// [`classify::SceneClassifier`]; the numbers live here.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct RuleThresholds {
    /// Minimum detector confidence for a detection to count in any rule
    /// (strict `>`).
    pub confidence_floor: f32,
    /// Maximum y-spread, in pixels, for a set of detections to count as
    /// horizontally aligned (strict `<`).
    pub alignment_spread: f32,
    /// Maximum x-distance, in pixels, between a segment and the most recently
    /// chained member of a cluster (inclusive `<=`).
    pub chain_distance: f32,
    /// Maximum |x2 - x1| for a segment to count as near-vertical (strict `<`).
    pub max_vertical_drift: f32,
    /// Minimum |y2 - y1| for a segment to clear the noise floor (strict `>`).
    pub min_vertical_length: f32,
    /// People required before the queue rule fires.
    pub min_queue_persons: usize,
    /// Books required before the stack rule fires.
    pub min_stack_books: usize,
    /// Cups required before the linked-list rule fires.
    pub min_chain_cups: usize,
    /// Phones plus bottles required before the array rule fires.
    pub min_array_items: usize,
    /// Segments required before clustering produces anything at all; a single
    /// vertical edge is not evidence of a pile.
    pub min_cluster_lines: usize,
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            confidence_floor: 0.4,
            alignment_spread: 80.0,
            chain_distance: 40.0,
            max_vertical_drift: 15.0,
            min_vertical_length: 40.0,
            min_queue_persons: 2,
            min_stack_books: 1,
            min_chain_cups: 3,
            min_array_items: 2,
            min_cluster_lines: 2,
        }
    }
}

impl RuleThresholds {
    /// Reject tables that would make the cascade vacuous or the geometry
    /// stages accept everything.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.confidence_floor) {
            return Err(anyhow!("confidence_floor must be within [0, 1]"));
        }
        if self.alignment_spread <= 0.0 {
            return Err(anyhow!("alignment_spread must be positive"));
        }
        if self.chain_distance <= 0.0 {
            return Err(anyhow!("chain_distance must be positive"));
        }
        if self.max_vertical_drift <= 0.0 {
            return Err(anyhow!("max_vertical_drift must be positive"));
        }
        if self.min_vertical_length <= 0.0 {
            return Err(anyhow!("min_vertical_length must be positive"));
        }
        if self.min_cluster_lines < 2 {
            return Err(anyhow!("min_cluster_lines must be at least 2"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rule_table_is_valid() {
        RuleThresholds::default().validate().expect("default table");
    }

    #[test]
    fn rejects_out_of_range_confidence_floor() {
        let table = RuleThresholds {
            confidence_floor: 1.5,
            ..RuleThresholds::default()
        };
        assert!(table.validate().is_err());
    }

    #[test]
    fn rejects_single_line_cluster_gate() {
        let table = RuleThresholds {
            min_cluster_lines: 1,
            ..RuleThresholds::default()
        };
        assert!(table.validate().is_err());
    }
}
