//! Euler/X notation output.
//!
//! A taxonomy block per checklist (`taxonomy <tag> <name>` followed by one
//! parenthesized line per internal node) and one `[X.a REL Y.b]` line per
//! alignment edge, de-duplicated so a mutual pair prints once.

use std::io::Write;

use crate::alignment::Alignment;
use crate::articulation::Articulation;
use crate::checklist::{Checklist, Duo, NodeId};
use crate::errors::Error;

pub fn dump_checklist<W: Write>(checklist: &Checklist, out: &mut W) -> Result<(), Error> {
    writeln!(out, "taxonomy {} {}", checklist.tag, checklist.name.replace(' ', "_"))?;
    for root in checklist.roots() {
        dump_node(checklist, root, out)?;
    }
    writeln!(out)?;
    Ok(())
}

fn dump_node<W: Write>(checklist: &Checklist, node: NodeId, out: &mut W) -> Result<(), Error> {
    let children = checklist.children(node);
    if children.is_empty() {
        return Ok(());
    }
    // container pseudo-nodes contribute their children but no line of
    // their own
    if !checklist.is_container(node) {
        write!(out, "({}", checklist.spaceless(node))?;
        for child in &children {
            write!(out, " {}", checklist.spaceless(*child))?;
        }
        writeln!(out, ")")?;
    }
    for child in children {
        dump_node(checklist, child, out)?;
    }
    Ok(())
}

pub fn dump_alignment<W: Write>(duo: &Duo, alignment: &Alignment, out: &mut W) -> Result<(), Error> {
    let mut edges: Vec<&Articulation> = alignment
        .best
        .values()
        .filter(|articulation| {
            articulation.dom < articulation.cod || !alignment.is_mutual(articulation.cod, articulation.dom)
        })
        .collect();
    edges.sort_by_key(|articulation| {
        let (first, second) = if articulation.dom < articulation.cod {
            (articulation.dom, articulation.cod)
        } else {
            (articulation.cod, articulation.dom)
        };
        (duo.sequence_number(first), duo.sequence_number(second))
    });

    for articulation in edges {
        writeln!(
            out,
            "[{} {} {}]",
            duo.unique(articulation.dom),
            articulation.relation.atom.symbol(),
            duo.unique(articulation.cod)
        )?;
    }
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::PropertyRegistry;
    use crate::readers::read_checklist;

    #[test]
    fn taxonomy_blocks_list_internal_nodes() {
        let mut registry = PropertyRegistry::new();
        let checklist = read_checklist("(Microcebus M_murinus M_rufus)", "1993", "Groves MSW2", &mut registry).unwrap();
        let mut out = Vec::new();
        dump_checklist(&checklist, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "taxonomy 1993 Groves_MSW2\n(Microcebus M_murinus M_rufus)\n\n");
    }

    #[test]
    fn container_nodes_are_elided() {
        let mut registry = PropertyRegistry::new();
        let checklist =
            read_checklist("(Top (unassigned_Top x y))", "A", "left", &mut registry).unwrap();
        let mut out = Vec::new();
        dump_checklist(&checklist, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("(Top unassigned_Top)\n"));
        assert!(!text.contains("(unassigned_Top x y)"));
    }
}
