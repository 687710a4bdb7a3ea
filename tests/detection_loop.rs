//! End-to-end pipeline runs: scripted backends driven through the detection
//! loop on an explicit clock.

use std::time::{Duration, Instant};

use scene_lens::{
    BBox, Detection, DetectionLoop, Frame, RawLine, RuleThresholds, ScriptedDetector,
    ScriptedExtractor, TickOutcome,
};

fn frame(sequence: u64) -> Frame {
    Frame::new(vec![0u8; 48], 4, 4, sequence)
}

fn person(score: f32, x: f32, y: f32) -> Detection {
    Detection::new("person", score, BBox::new(x, y, 50.0, 150.0))
}

fn book(score: f32) -> Detection {
    Detection::new("book", score, BBox::new(250.0, 200.0, 140.0, 40.0))
}

fn pile_lines() -> Vec<RawLine> {
    vec![
        RawLine::new(250.0, 200.0, 252.0, 280.0),
        RawLine::new(262.0, 198.0, 263.0, 281.0),
        RawLine::new(390.0, 205.0, 391.0, 278.0),
        RawLine::new(402.0, 203.0, 404.0, 279.0),
    ]
}

#[test]
fn a_lesson_worth_of_scenes_flows_through_the_loop() {
    let mut detector = ScriptedDetector::new();
    let mut extractor = ScriptedExtractor::new();

    // Tick 1: a waiting line.
    detector.push_frame(vec![
        person(0.9, 80.0, 120.0),
        person(0.85, 220.0, 126.0),
        person(0.8, 360.0, 117.0),
    ]);
    // Tick 2: a book pile; extractor corroborates with two piles of lines.
    detector.push_frame(vec![book(0.8), book(0.65)]);
    extractor.push_frame(pile_lines());
    // Tick 3: empty desk.
    detector.push_frame(vec![]);

    let mut lens = DetectionLoop::new(
        Box::new(detector),
        Box::new(extractor),
        RuleThresholds::default(),
    );

    let start = Instant::now();
    let step = Duration::from_millis(200);

    assert!(lens.tick_at(&frame(1), start).is_sampled());
    assert_eq!(lens.latest().concept, "Queue (FIFO)");
    assert!(lens.latest().detail.contains('3'));

    assert!(lens.tick_at(&frame(2), start + step).is_sampled());
    assert_eq!(lens.latest().concept, "Stack (LIFO)");
    assert_eq!(lens.latest().cluster_count, 2);
    assert_eq!(
        lens.latest().raw_detections,
        vec!["book (80%)".to_string(), "book (65%)".to_string()]
    );

    assert!(lens.tick_at(&frame(3), start + step * 2).is_sampled());
    assert_eq!(lens.latest().concept, "");
    assert_eq!(lens.latest().detail, "");
    assert!(lens.latest().raw_detections.is_empty());
}

#[test]
fn ticks_inside_the_window_do_not_advance_the_script() {
    let mut detector = ScriptedDetector::new();
    detector.push_frame(vec![person(0.9, 80.0, 120.0), person(0.9, 220.0, 125.0)]);
    detector.push_frame(vec![]);

    let mut lens = DetectionLoop::new(
        Box::new(detector),
        Box::new(ScriptedExtractor::new()),
        RuleThresholds::default(),
    );

    let start = Instant::now();
    assert_eq!(lens.tick_at(&frame(1), start), TickOutcome::Sampled);

    // A burst of animation-rate callbacks inside the 200 ms window.
    for ms in [16u64, 33, 50, 100, 150, 199] {
        assert_eq!(
            lens.tick_at(&frame(1), start + Duration::from_millis(ms)),
            TickOutcome::Skipped
        );
    }
    assert_eq!(lens.latest().concept, "Queue (FIFO)");

    assert_eq!(
        lens.tick_at(&frame(2), start + Duration::from_millis(200)),
        TickOutcome::Sampled
    );
    assert_eq!(lens.latest().concept, "");

    let stats = lens.stats();
    assert_eq!(stats.sampled, 2);
    assert_eq!(stats.skipped, 6);
}

#[test]
fn per_tick_failures_never_stop_the_loop() {
    let mut detector = ScriptedDetector::new();
    detector.push_failure("model not loaded");
    detector.push_frame(vec![book(0.9)]);
    detector.push_frame(vec![person(0.9, 80.0, 100.0), person(0.9, 220.0, 104.0)]);

    let mut extractor = ScriptedExtractor::new();
    extractor.push_failure("hough transform blew up");

    let mut lens = DetectionLoop::new(
        Box::new(detector),
        Box::new(extractor),
        RuleThresholds::default(),
    );

    let start = Instant::now();
    let step = Duration::from_millis(200);

    // Detector failure: empty snapshot, loop alive.
    assert!(lens.tick_at(&frame(1), start).is_sampled());
    assert_eq!(lens.latest().concept, "");

    // Extractor failure on a book tick: detections survive, no piles.
    assert!(lens.tick_at(&frame(2), start + step).is_sampled());
    assert_eq!(lens.latest().concept, "");
    assert_eq!(lens.latest().raw_detections, vec!["book (90%)".to_string()]);

    // Healthy tick right after: classification resumes.
    assert!(lens.tick_at(&frame(3), start + step * 2).is_sampled());
    assert_eq!(lens.latest().concept, "Queue (FIFO)");

    assert_eq!(lens.stats().degraded, 2);
    assert_eq!(lens.stats().sampled, 3);
}
