//! Scene-level scenarios for the geometry stages and the rule cascade.

use scene_lens::{
    cluster_stacks, filter_vertical, BBox, Concept, Detection, RawLine, RuleThresholds,
    SceneClassifier, StackCluster,
};

fn det(label: &str, score: f32, x: f32, y: f32) -> Detection {
    Detection::new(label, score, BBox::new(x, y, 50.0, 80.0))
}

fn classifier() -> SceneClassifier {
    SceneClassifier::new(RuleThresholds::default())
}

/// Two piles, each corroborated by two near-vertical lines chained within
/// 40 px of each other.
fn two_piles() -> Vec<StackCluster> {
    let rules = RuleThresholds::default();
    let lines = [
        RawLine::new(100.0, 10.0, 102.0, 90.0),
        RawLine::new(110.0, 12.0, 111.0, 95.0),
        RawLine::new(300.0, 8.0, 301.0, 88.0),
        RawLine::new(312.0, 11.0, 313.0, 93.0),
    ];
    let clusters = cluster_stacks(filter_vertical(&lines, &rules), &rules);
    assert_eq!(clusters.len(), 2);
    clusters
}

#[test]
fn three_people_standing_close_read_as_a_queue() {
    let detections = vec![
        det("person", 0.6, 50.0, 100.0),
        det("person", 0.6, 150.0, 105.0),
        det("person", 0.6, 250.0, 110.0),
    ];
    let result = classifier().classify(&detections, &[]).expect("queue");
    assert_eq!(result.concept, Concept::Queue);
    assert_eq!(result.concept.label(), "Queue (FIFO)");
    assert!(result.detail.contains('3'));
}

#[test]
fn one_book_over_two_piles_reads_as_a_stack() {
    let detections = vec![det("book", 0.5, 250.0, 200.0)];
    let result = classifier()
        .classify(&detections, &two_piles())
        .expect("stack");
    assert_eq!(result.concept, Concept::Stack);
    assert_eq!(result.concept.label(), "Stack (LIFO)");
    assert!(result.detail.contains('2'));
}

#[test]
fn an_empty_scene_reads_as_nothing() {
    assert!(classifier().classify(&[], &[]).is_none());
}

#[test]
fn four_level_cups_read_as_a_linked_list() {
    let detections = vec![
        det("cup", 0.45, 10.0, 200.0),
        det("cup", 0.45, 60.0, 200.0),
        det("cup", 0.45, 110.0, 200.0),
        det("cup", 0.45, 160.0, 200.0),
    ];
    let result = classifier().classify(&detections, &[]).expect("chain");
    assert_eq!(result.concept, Concept::LinkedList);
}

#[test]
fn a_spread_of_exactly_eighty_is_not_aligned() {
    let detections = vec![
        det("person", 0.9, 50.0, 100.0),
        det("person", 0.9, 150.0, 180.0),
    ];
    assert!(classifier().classify(&detections, &[]).is_none());
}

#[test]
fn queue_wins_when_several_rules_match_at_once() {
    // Queue, stack, and array evidence in a single frame.
    let detections = vec![
        det("person", 0.95, 50.0, 100.0),
        det("person", 0.95, 150.0, 104.0),
        det("person", 0.95, 250.0, 108.0),
        det("book", 0.95, 400.0, 220.0),
        det("cell phone", 0.95, 500.0, 300.0),
        det("bottle", 0.95, 560.0, 310.0),
    ];
    let result = classifier()
        .classify(&detections, &two_piles())
        .expect("match");
    assert_eq!(result.concept, Concept::Queue);
}

#[test]
fn clustering_neither_drops_nor_duplicates_segments() {
    let rules = RuleThresholds::default();
    let lines = [
        RawLine::new(10.0, 0.0, 12.0, 70.0),
        RawLine::new(300.0, 5.0, 302.0, 80.0),
        RawLine::new(45.0, 3.0, 46.0, 66.0),
        RawLine::new(330.0, 0.0, 331.0, 75.0),
        RawLine::new(85.0, 10.0, 86.0, 90.0),
        // Filtered out before clustering, so not part of the partition.
        RawLine::new(500.0, 0.0, 560.0, 70.0),
        RawLine::new(600.0, 0.0, 601.0, 20.0),
    ];
    let filtered = filter_vertical(&lines, &rules);
    assert_eq!(filtered.len(), 5);

    let mut expected: Vec<f32> = filtered.iter().map(|s| s.mid_x).collect();
    expected.sort_by(f32::total_cmp);

    let clusters = cluster_stacks(filtered, &rules);
    let mut flattened: Vec<f32> = clusters
        .iter()
        .flat_map(|c| c.segments.iter().map(|s| s.mid_x))
        .collect();
    flattened.sort_by(f32::total_cmp);

    assert_eq!(flattened, expected);
}

#[test]
fn cluster_members_chain_within_the_link_distance() {
    let rules = RuleThresholds::default();
    // A drifting run plus a distant pair.
    let lines = [
        RawLine::new(0.0, 0.0, 0.0, 60.0),
        RawLine::new(38.0, 0.0, 38.0, 60.0),
        RawLine::new(75.0, 0.0, 75.0, 60.0),
        RawLine::new(113.0, 0.0, 113.0, 60.0),
        RawLine::new(400.0, 0.0, 400.0, 60.0),
        RawLine::new(420.0, 0.0, 420.0, 60.0),
    ];
    let clusters = cluster_stacks(filter_vertical(&lines, &rules), &rules);
    assert_eq!(clusters.len(), 2);

    for cluster in &clusters {
        // Members are published top-first; the chain gaps are over the
        // x-ordering the clusterer walked.
        let mut xs: Vec<f32> = cluster.segments.iter().map(|s| s.mid_x).collect();
        xs.sort_by(f32::total_cmp);
        for pair in xs.windows(2) {
            assert!(pair[1] - pair[0] <= rules.chain_distance);
        }
    }
}

#[test]
fn misaligned_cups_do_not_chain() {
    let detections = vec![
        det("cup", 0.45, 10.0, 200.0),
        det("cup", 0.45, 60.0, 290.0),
        det("cup", 0.45, 110.0, 200.0),
    ];
    assert!(classifier().classify(&detections, &[]).is_none());
}
