//! The concept rule cascade.
//!
//! [`SceneClassifier::classify`] is a pure function of the tick's detections,
//! the tick's segment clusters, and the rule table. Rules are evaluated in a
//! fixed priority order and the first match wins; a scene that satisfies
//! several rules at once is still reported as the highest-priority one.

use crate::detect::{Detection, ObjectClass};
use crate::geometry::StackCluster;
use crate::RuleThresholds;

/// Data-structure concept a scene can be read as.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Concept {
    Queue,
    Stack,
    LinkedList,
    Array,
}

impl Concept {
    /// Display label shown in the overlay.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Queue => "Queue (FIFO)",
            Self::Stack => "Stack (LIFO)",
            Self::LinkedList => "Linked List",
            Self::Array => "Array",
        }
    }
}

/// A matched concept plus the human-readable justification for it.
#[derive(Clone, Debug, PartialEq)]
pub struct Classification {
    pub concept: Concept,
    pub detail: String,
}

/// Priority-ordered rule cascade over one tick's worth of scene evidence.
pub struct SceneClassifier {
    rules: RuleThresholds,
}

impl SceneClassifier {
    pub fn new(rules: RuleThresholds) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleThresholds {
        &self.rules
    }

    /// Run the cascade. `None` means no recognized pattern this frame, not
    /// an error; malformed or empty inputs simply fail every rule.
    pub fn classify(
        &self,
        detections: &[Detection],
        clusters: &[StackCluster],
    ) -> Option<Classification> {
        self.match_queue(detections)
            .or_else(|| self.match_stack(detections, clusters))
            .or_else(|| self.match_linked_list(detections))
            .or_else(|| self.match_array(detections))
    }

    fn confident<'a>(
        &self,
        detections: &'a [Detection],
        class: ObjectClass,
    ) -> Vec<&'a Detection> {
        detections
            .iter()
            .filter(|d| d.class() == class && d.score > self.rules.confidence_floor)
            .collect()
    }

    /// Rule 1: two or more people whose boxes share a y-band read as a
    /// waiting line.
    fn match_queue(&self, detections: &[Detection]) -> Option<Classification> {
        let persons = self.confident(detections, ObjectClass::Person);
        if persons.len() < self.rules.min_queue_persons {
            return None;
        }
        if y_spread(&persons) >= self.rules.alignment_spread {
            return None;
        }
        Some(Classification {
            concept: Concept::Queue,
            detail: format!(
                "{} people standing in line: the first to join is the first served, \
                 new arrivals join at the back",
                persons.len()
            ),
        })
    }

    /// Rule 2: at least one book plus corroborating vertical-edge piles.
    fn match_stack(
        &self,
        detections: &[Detection],
        clusters: &[StackCluster],
    ) -> Option<Classification> {
        let books = self.confident(detections, ObjectClass::Book);
        if books.len() < self.rules.min_stack_books || clusters.is_empty() {
            return None;
        }
        Some(Classification {
            concept: Concept::Stack,
            detail: format!(
                "{} book(s) in {} vertical pile(s): the last one placed on top \
                 is the first one you can take off",
                books.len(),
                clusters.len()
            ),
        })
    }

    /// Rule 3: three or more cups in a y-aligned row read as linked nodes.
    fn match_linked_list(&self, detections: &[Detection]) -> Option<Classification> {
        let mut cups = self.confident(detections, ObjectClass::Cup);
        if cups.len() < self.rules.min_chain_cups {
            return None;
        }
        cups.sort_by(|a, b| a.bbox.x.total_cmp(&b.bbox.x));
        if y_spread(&cups) >= self.rules.alignment_spread {
            return None;
        }
        Some(Classification {
            concept: Concept::LinkedList,
            detail: format!(
                "{} cups chained left to right: each node points to the next, \
                 and the final pointer is null",
                cups.len()
            ),
        })
    }

    /// Rule 4: two or more phones/bottles together read as indexed slots.
    fn match_array(&self, detections: &[Detection]) -> Option<Classification> {
        let phones = self.confident(detections, ObjectClass::CellPhone);
        let bottles = self.confident(detections, ObjectClass::Bottle);
        let total = phones.len() + bottles.len();
        if total < self.rules.min_array_items {
            return None;
        }
        Some(Classification {
            concept: Concept::Array,
            detail: format!(
                "{} items laid out in slots: any element is reachable directly \
                 by its index, no walking required",
                total
            ),
        })
    }
}

/// Horizontal-alignment proxy: difference between the highest and lowest
/// bounding-box top edge in the set.
fn y_spread(detections: &[&Detection]) -> f32 {
    let mut min_y = f32::INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for det in detections {
        min_y = min_y.min(det.bbox.y);
        max_y = max_y.max(det.bbox.y);
    }
    if detections.is_empty() {
        0.0
    } else {
        max_y - min_y
    }
}
