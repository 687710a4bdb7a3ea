use anyhow::Result;
use sha2::{Digest, Sha256};

use crate::detect::detector::{BBox, Detection, Detector};
use crate::detect::extractor::{LineExtractor, RawLine};
use crate::frame::Frame;

/// Scenes the stub backends can stage. Both backends derive the scene from a
/// pixel digest, so a detector and an extractor looking at the same frame
/// always agree on what is in it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StagedScene {
    Empty,
    PeopleInLine,
    StackedBooks,
    CupRow,
    GadgetPair,
}

fn staged_scene(frame: &Frame) -> StagedScene {
    let digest: [u8; 32] = Sha256::digest(frame.pixels()).into();
    match digest[0] % 5 {
        0 => StagedScene::Empty,
        1 => StagedScene::PeopleInLine,
        2 => StagedScene::StackedBooks,
        3 => StagedScene::CupRow,
        _ => StagedScene::GadgetPair,
    }
}

/// Stub detector for daemon runs without a real model. Hashes the pixels and
/// stages a canned scene, so synthetic sources cycle through all concepts.
#[derive(Default)]
pub struct StubDetector;

impl StubDetector {
    pub fn new() -> Self {
        Self
    }
}

impl Detector for StubDetector {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>> {
        let detections = match staged_scene(frame) {
            StagedScene::Empty => vec![],
            StagedScene::PeopleInLine => vec![
                Detection::new("person", 0.91, BBox::new(80.0, 120.0, 60.0, 180.0)),
                Detection::new("person", 0.88, BBox::new(220.0, 128.0, 58.0, 176.0)),
                Detection::new("person", 0.84, BBox::new(360.0, 117.0, 62.0, 182.0)),
            ],
            StagedScene::StackedBooks => vec![
                Detection::new("book", 0.81, BBox::new(250.0, 200.0, 140.0, 40.0)),
                Detection::new("book", 0.66, BBox::new(252.0, 240.0, 138.0, 38.0)),
            ],
            StagedScene::CupRow => vec![
                Detection::new("cup", 0.77, BBox::new(100.0, 300.0, 40.0, 50.0)),
                Detection::new("cup", 0.74, BBox::new(200.0, 304.0, 41.0, 49.0)),
                Detection::new("cup", 0.71, BBox::new(300.0, 298.0, 39.0, 51.0)),
            ],
            StagedScene::GadgetPair => vec![
                Detection::new("cell phone", 0.86, BBox::new(150.0, 250.0, 35.0, 70.0)),
                Detection::new("bottle", 0.69, BBox::new(280.0, 230.0, 30.0, 90.0)),
            ],
        };
        Ok(detections)
    }
}

/// Stub extractor paired with [`StubDetector`]: emits the vertical spines of
/// two book piles when the staged scene contains books, nothing otherwise.
#[derive(Default)]
pub struct StubExtractor;

impl StubExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl LineExtractor for StubExtractor {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn extract_lines(&mut self, frame: &Frame) -> Result<Vec<RawLine>> {
        if staged_scene(frame) != StagedScene::StackedBooks {
            return Ok(vec![]);
        }
        Ok(vec![
            RawLine::new(250.0, 200.0, 252.0, 280.0),
            RawLine::new(262.0, 198.0, 263.0, 281.0),
            RawLine::new(390.0, 205.0, 391.0, 278.0),
            RawLine::new(402.0, 203.0, 404.0, 279.0),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_with_scene(selector: u8) -> Frame {
        // Brute-force a payload whose digest selects the wanted scene.
        for seed in 0u16..1024 {
            let data = vec![(seed % 256) as u8, (seed / 256) as u8, selector];
            let frame = Frame::new(data, 1, 1, 0);
            let digest: [u8; 32] = Sha256::digest(frame.pixels()).into();
            if digest[0] % 5 == selector {
                return frame;
            }
        }
        unreachable!("no payload found for scene selector {selector}");
    }

    #[test]
    fn detector_and_extractor_stage_the_same_scene() {
        let frame = frame_with_scene(2);
        let mut detector = StubDetector::new();
        let mut extractor = StubExtractor::new();

        let detections = detector.detect(&frame).unwrap();
        assert!(detections.iter().all(|d| d.label == "book"));
        assert!(!extractor.extract_lines(&frame).unwrap().is_empty());
    }

    #[test]
    fn extractor_is_silent_without_books() {
        let frame = frame_with_scene(1);
        let mut extractor = StubExtractor::new();
        assert!(extractor.extract_lines(&frame).unwrap().is_empty());
    }

    #[test]
    fn stub_output_is_deterministic_per_frame() {
        let frame = frame_with_scene(3);
        let mut detector = StubDetector::new();
        let first = detector.detect(&frame).unwrap();
        let second = detector.detect(&frame).unwrap();
        assert_eq!(first.len(), second.len());
        assert!(first.iter().zip(&second).all(|(a, b)| a.label == b.label));
    }
}
