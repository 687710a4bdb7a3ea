use crate::geometry::LineSegment;
use crate::RuleThresholds;

/// One clustered pile of near-vertical segments. Members are ordered
/// ascending by `y_top`: the first segment is the top of the physical pile.
#[derive(Clone, Debug, Default)]
pub struct StackCluster {
    pub segments: Vec<LineSegment>,
}

impl StackCluster {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Top-most member of the pile.
    pub fn top(&self) -> Option<&LineSegment> {
        self.segments.first()
    }
}

/// Group filtered segments into piles by x-proximity.
///
/// Single-link chaining: after sorting by `mid_x`, a segment joins the
/// current cluster iff it is within `chain_distance` of the most recently
/// appended member, not the cluster's first member or centroid. Successive
/// members can therefore drift well past `chain_distance` end-to-end; that is
/// the intended membership rule, and it keeps the pass O(n log n) in the sort
/// with a single linear chain walk.
///
/// Fewer than `min_cluster_lines` input segments produce no clusters at all.
/// Every input segment lands in exactly one cluster otherwise.
pub fn cluster_stacks(segments: Vec<LineSegment>, rules: &RuleThresholds) -> Vec<StackCluster> {
    if segments.len() < rules.min_cluster_lines {
        return Vec::new();
    }

    let mut ordered = segments;
    ordered.sort_by(|a, b| a.mid_x.total_cmp(&b.mid_x));

    let mut clusters: Vec<StackCluster> = Vec::new();
    let mut current: Vec<LineSegment> = Vec::new();

    for segment in ordered {
        match current.last() {
            Some(last) if (segment.mid_x - last.mid_x).abs() <= rules.chain_distance => {
                current.push(segment);
            }
            Some(_) => {
                clusters.push(StackCluster { segments: current });
                current = vec![segment];
            }
            None => current.push(segment),
        }
    }
    if !current.is_empty() {
        clusters.push(StackCluster { segments: current });
    }

    for cluster in &mut clusters {
        cluster
            .segments
            .sort_by(|a, b| a.y_top.total_cmp(&b.y_top));
    }

    clusters
}
