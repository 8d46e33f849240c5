//! Weaving two aligned checklists into one merged forest.
//!
//! Merged nodes are pairs of records, either side possibly absent. A pair
//! forms when the alignment is mutual and relates the records by equality
//! or containment; conflicted and unmatched records stay single-sided.
//! Parent links follow whichever side defines them, the higher-priority
//! B side winning when both do.

use std::collections::HashMap;

use crate::alignment::Alignment;
use crate::checklist::{Duo, NodeRef, Side};
use crate::relation::Rcc5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergedNode {
    pub x: Option<NodeRef>,
    pub y: Option<NodeRef>,
}

pub struct Merge {
    pub nodes: Vec<MergedNode>,
    pub roots: Vec<usize>,
    pub children: HashMap<usize, Vec<usize>>,
    index: HashMap<NodeRef, usize>,
}

impl Merge {
    pub fn node(&self, i: usize) -> MergedNode {
        self.nodes[i]
    }

    pub fn index_of(&self, node: NodeRef) -> Option<usize> {
        self.index.get(&node).copied()
    }

    pub fn children_of(&self, i: usize) -> &[usize] {
        self.children.get(&i).map(|c| c.as_slice()).unwrap_or(&[])
    }
}

fn pairable(alignment: &Alignment, x: NodeRef, y: NodeRef) -> bool {
    alignment.is_mutual(x, y)
        && alignment
            .get(x)
            .map(|a| matches!(a.relation.atom, Rcc5::Eq | Rcc5::Lt | Rcc5::Gt))
            .unwrap_or(false)
}

pub fn merge_checklists(duo: &Duo, alignment: &Alignment) -> Merge {
    let mut nodes = Vec::new();
    let mut index = HashMap::new();

    // B records first: they carry their A partner when mutually aligned
    for id in duo.checklist(Side::B).all_nodes() {
        let y = NodeRef::new(Side::B, id);
        if !duo.is_accepted(y) {
            continue;
        }
        let x = alignment.cod(y).filter(|x| pairable(alignment, *x, y));
        let i = nodes.len();
        nodes.push(MergedNode { x, y: Some(y) });
        index.insert(y, i);
        if let Some(x) = x {
            index.insert(x, i);
        }
    }

    // A records without a pair stand alone
    for id in duo.checklist(Side::A).all_nodes() {
        let x = NodeRef::new(Side::A, id);
        if !duo.is_accepted(x) || index.contains_key(&x) {
            continue;
        }
        let i = nodes.len();
        nodes.push(MergedNode { x: Some(x), y: None });
        index.insert(x, i);
    }

    // parent links: the side that defines a node links it, B winning
    // when both sides do
    let mut parents: HashMap<usize, usize> = HashMap::new();
    for (i, node) in nodes.iter().enumerate() {
        let parent = merged_parent(duo, node, &index);
        if let Some(p) = parent {
            if p != i {
                parents.insert(i, p);
            }
        }
    }

    let mut children: HashMap<usize, Vec<usize>> = HashMap::new();
    let mut roots = Vec::new();
    for i in 0..nodes.len() {
        match parents.get(&i) {
            Some(p) => children.entry(*p).or_default().push(i),
            None => roots.push(i),
        }
    }

    // report order: B sequence first, then A sequence for the one-sided rest
    let sort_key = |i: &usize| {
        let node = nodes[*i];
        (
            node.y.map(|y| duo.sequence_number(y)).unwrap_or(usize::MAX),
            node.x.map(|x| duo.sequence_number(x)).unwrap_or(usize::MAX),
        )
    };
    roots.sort_by_key(sort_key);
    for siblings in children.values_mut() {
        siblings.sort_by_key(sort_key);
    }

    Merge {
        nodes,
        roots,
        children,
        index,
    }
}

fn merged_parent(duo: &Duo, node: &MergedNode, index: &HashMap<NodeRef, usize>) -> Option<usize> {
    for record in [node.y, node.x].into_iter().flatten() {
        let parent = duo.parent(record);
        if !parent.is_forest() {
            if let Some(i) = index.get(&parent) {
                return Some(*i);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::Aligner;
    use crate::checklist::Checklist;
    use crate::properties::PropertyRegistry;
    use crate::readers::read_checklist;

    fn merge_of(a_spec: &str, b_spec: &str) -> (Checklist, Checklist, Merge) {
        let mut registry = PropertyRegistry::new();
        let a = read_checklist(a_spec, "A", "left", &mut registry).unwrap();
        let b = read_checklist(b_spec, "B", "right", &mut registry).unwrap();
        let merge = {
            let duo = Duo::new(&a, &b);
            let mut aligner = Aligner::new(&duo, false);
            aligner.analyze();
            let alignment = aligner.alignment();
            merge_checklists(&duo, &alignment)
        };
        (a, b, merge)
    }

    #[test]
    fn identical_checklists_merge_pairwise() {
        let (_a, _b, merge) = merge_of("(G g1 g2 g3)", "(G g1 g2 g3)");
        assert_eq!(merge.roots.len(), 1);
        let root = merge.node(merge.roots[0]);
        assert!(root.x.is_some() && root.y.is_some());
        assert_eq!(merge.children_of(merge.roots[0]).len(), 3);
        for i in merge.children_of(merge.roots[0]) {
            let child = merge.node(*i);
            assert!(child.x.is_some() && child.y.is_some());
        }
        assert_eq!(merge.nodes.len(), 4);
    }

    #[test]
    fn grafted_subtrees_attach_under_their_merged_parent() {
        let (_a, b, merge) = merge_of("(Top (G g1))", "(Top (G g1) (H h1 h2))");
        // H and its children exist only in B
        let h = merge
            .index_of(NodeRef::new(Side::B, b.record_with_node_id("H").unwrap()))
            .unwrap();
        let node = merge.node(h);
        assert!(node.x.is_none());
        // attached under the merged pair for Top
        let top = merge
            .index_of(NodeRef::new(Side::B, b.record_with_node_id("Top").unwrap()))
            .unwrap();
        assert!(merge.children_of(top).contains(&h));
        assert_eq!(merge.children_of(h).len(), 2);
    }
}
