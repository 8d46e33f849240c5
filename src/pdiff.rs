//! Property-level diffs between two records.

use crate::checklist::{Duo, NodeRef};
use crate::properties::PropertySet;

/// Which shared properties were dropped, changed, or added going from the
/// domain record to the codomain record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Comparison {
    pub dropped: PropertySet,
    pub changed: PropertySet,
    pub added: PropertySet,
}

impl Comparison {
    pub fn same(&self) -> bool {
        self.dropped.is_empty() && self.changed.is_empty() && self.added.is_empty()
    }

    pub fn reverse(self) -> Comparison {
        Comparison {
            dropped: self.added,
            changed: self.changed,
            added: self.dropped,
        }
    }

    /// Tie-break weight: changes count against a match more than drops,
    /// and low-bit (less specific) differences weigh less. Additions are
    /// benign.
    pub fn weight(&self) -> (u64, u64) {
        (self.changed.0, self.dropped.0)
    }
}

pub fn differences(duo: &Duo, x: NodeRef, y: NodeRef) -> Comparison {
    let mut comparison = Comparison::default();
    for property in &duo.shared_props {
        match (duo.get_value(x, *property), duo.get_value(y, *property)) {
            (Some(vx), Some(vy)) if vx != vy => comparison.changed.insert(*property),
            (Some(_), None) => comparison.dropped.insert(*property),
            (None, Some(_)) => comparison.added.insert(*property),
            _ => {}
        }
    }
    comparison
}
