//! Fringe determination.
//!
//! A depth-first walk over each checklist marks the matched frontier: a
//! node is on the fringe when none of its inferiors is, and it has exactly
//! one direct match on the other side. Nodes with several direct matches
//! are deliberately left off; ambiguity propagates upward, never down into
//! the fringe.
//!
//! The same walk records coverage: a subtree is covered when all of its
//! branches carry fringe content. Uncovered branches are content with no
//! counterpart on the other side, which the topology comparator treats as
//! residue.

use tracing::info;

use super::{direct, Aligner};
use crate::checklist::{Duo, NodeRef, Side};

pub fn analyze(aligner: &mut Aligner) {
    for side in [Side::A, Side::B] {
        let count = aligner.duo.checklist(side).node_count() + 1;
        let mut fringe = vec![false; count];
        let mut covered = vec![false; count];
        for root in aligner.duo.roots(side) {
            subanalyze(aligner.duo, aligner.share_ids, root, &mut fringe, &mut covered);
        }
        info!(
            side = ?side,
            fringe = fringe.iter().filter(|f| **f).count(),
            "fringe analyzed"
        );
        aligner.fringe[side.index()] = fringe;
        aligner.covered[side.index()] = covered;
    }
}

/// Returns (subtree contains a fringe node, subtree is covered).
fn subanalyze(
    duo: &Duo,
    share_ids: bool,
    node: NodeRef,
    fringe: &mut [bool],
    covered: &mut [bool],
) -> (bool, bool) {
    let inferiors = duo.inferiors(node);
    let mut any_fringe = false;
    let mut all_covered = !inferiors.is_empty();
    for inferior in inferiors {
        let (sub_fringe, sub_covered) = subanalyze(duo, share_ids, inferior, fringe, covered);
        any_fringe |= sub_fringe;
        all_covered &= sub_covered;
    }

    if any_fringe {
        covered[node.id as usize] = all_covered;
        return (true, all_covered);
    }

    let partners = direct::direct_matches(duo, share_ids, node);
    if partners.len() == 1 {
        fringe[node.id as usize] = true;
        covered[node.id as usize] = true;
        (true, true)
    } else {
        (false, false)
    }
}

#[cfg(test)]
mod tests {
    use crate::checklist::{Duo, NodeRef, Side};
    use crate::properties::PropertyRegistry;
    use crate::readers::read_checklist;

    #[test]
    fn ambiguous_names_are_kept_off_the_fringe() {
        let mut registry = PropertyRegistry::new();
        let a = read_checklist("(M x y)", "A", "left", &mut registry).unwrap();
        // two records named x on the other side; bracket notation cannot
        // duplicate names, so B comes from a table
        let csv = "\
taxonID,canonicalName,parentNameUsageID
M,M,
p,p,M
q,q,M
x1,x,p
x2,x,q
";
        let (columns, rows) =
            crate::readers::table::read_from(csv.as_bytes(), b',', &mut registry).unwrap();
        let b = crate::checklist::Checklist::new("B", "right", columns, rows).unwrap();

        let duo = Duo::new(&a, &b);
        let mut aligner = crate::alignment::Aligner::new(&duo, false);
        super::analyze(&mut aligner);

        let ax = NodeRef::new(Side::A, a.record_with_node_id("x").unwrap());
        let ay = NodeRef::new(Side::A, a.record_with_node_id("y").unwrap());
        // x has two direct matches in B: excluded from the fringe
        assert!(!aligner.is_fringe(ax));
        // y has none: also excluded
        assert!(!aligner.is_fringe(ay));
        // but each B copy of x has exactly one match in A
        let bx1 = NodeRef::new(Side::B, b.record_with_node_id("x1").unwrap());
        assert!(aligner.is_fringe(bx1));
        // mutuality still fails, since A.x is not on the fringe
        assert!(aligner.mutual_fringe_match(bx1).is_none());
    }

    #[test]
    fn identical_trees_have_a_full_leaf_fringe() {
        let mut registry = PropertyRegistry::new();
        let a = read_checklist("(G g1 g2 g3)", "A", "left", &mut registry).unwrap();
        let b = read_checklist("(G g1 g2 g3)", "B", "right", &mut registry).unwrap();
        let duo = Duo::new(&a, &b);
        let mut aligner = crate::alignment::Aligner::new(&duo, false);
        super::analyze(&mut aligner);

        for leaf in ["g1", "g2", "g3"] {
            let node = NodeRef::new(Side::A, a.record_with_node_id(leaf).unwrap());
            assert!(aligner.is_fringe(node), "{leaf} should be on the fringe");
            assert!(aligner.mutual_fringe_match(node).is_some());
            assert!(aligner.is_covered(node));
        }
        // the root is matched through its leaves, not on the fringe itself
        let root = NodeRef::new(Side::A, a.record_with_node_id("G").unwrap());
        assert!(!aligner.is_fringe(root));
        assert!(aligner.is_covered(root));
    }
}
