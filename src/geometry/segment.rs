use crate::detect::RawLine;
use crate::RuleThresholds;

/// A near-vertical line segment with the derived fields the clusterer orders
/// by. `mid_x` locates the segment horizontally; `y_top`/`y_bottom` normalize
/// the endpoints so the top of a pile sorts first regardless of endpoint
/// order in the raw segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineSegment {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub mid_x: f32,
    pub y_top: f32,
    pub y_bottom: f32,
}

impl LineSegment {
    pub fn from_raw(line: RawLine) -> Self {
        Self {
            x1: line.x1,
            y1: line.y1,
            x2: line.x2,
            y2: line.y2,
            mid_x: (line.x1 + line.x2) / 2.0,
            y_top: line.y1.min(line.y2),
            y_bottom: line.y1.max(line.y2),
        }
    }

    /// Vertical extent in pixels.
    pub fn height(&self) -> f32 {
        self.y_bottom - self.y_top
    }
}

/// Keep segments that are steep enough and long enough to be the spine of a
/// stacked object: horizontal drift under `max_vertical_drift`, vertical
/// extent over `min_vertical_length`. Order is preserved.
pub fn filter_vertical(lines: &[RawLine], rules: &RuleThresholds) -> Vec<LineSegment> {
    lines
        .iter()
        .filter(|line| {
            (line.x2 - line.x1).abs() < rules.max_vertical_drift
                && (line.y2 - line.y1).abs() > rules.min_vertical_length
        })
        .copied()
        .map(LineSegment::from_raw)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_mid_x_and_normalized_extent() {
        let seg = LineSegment::from_raw(RawLine::new(10.0, 90.0, 14.0, 20.0));
        assert_eq!(seg.mid_x, 12.0);
        assert_eq!(seg.y_top, 20.0);
        assert_eq!(seg.y_bottom, 90.0);
        assert_eq!(seg.height(), 70.0);
    }

    #[test]
    fn keeps_only_steep_long_segments() {
        let rules = RuleThresholds::default();
        let lines = [
            RawLine::new(0.0, 0.0, 5.0, 50.0),    // vertical enough, long enough
            RawLine::new(0.0, 0.0, 20.0, 50.0),   // too much drift
            RawLine::new(0.0, 0.0, 5.0, 30.0),    // too short
            RawLine::new(100.0, 80.0, 100.0, 0.0), // reversed endpoints still pass
        ];
        let kept = filter_vertical(&lines, &rules);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].mid_x, 2.5);
        assert_eq!(kept[1].mid_x, 100.0);
    }

    #[test]
    fn drift_and_length_bounds_are_strict() {
        let rules = RuleThresholds::default();
        // Exactly at the thresholds: drift == 15 fails, length == 40 fails.
        let lines = [
            RawLine::new(0.0, 0.0, 15.0, 100.0),
            RawLine::new(0.0, 0.0, 0.0, 40.0),
        ];
        assert!(filter_vertical(&lines, &rules).is_empty());
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(filter_vertical(&[], &RuleThresholds::default()).is_empty());
    }
}
