//! The ad-hoc CSV change report.
//!
//! One row per merged node, in merged-tree order, describing what happened
//! to it between the two versions: kept (possibly moved), deleted with the
//! reason it went away, added with the reason it appeared, or left
//! unresolved when the alignment was ambiguous. Merged subtrees in which
//! nothing changed collapse to a single row.

use std::collections::HashMap;
use std::io::Write;

use serde::Serialize;

use crate::alignment::Alignment;
use crate::checklist::{Duo, NodeRef};
use crate::errors::Error;
use crate::merge::{Merge, MergedNode};
use crate::pdiff;
use crate::properties::PropertyRegistry;
use crate::relation::Rcc5;

#[derive(Debug, Serialize)]
struct Row {
    indent: String,
    operation: String,
    dom: Option<String>,
    #[serde(rename = "dom id")]
    dom_id: Option<String>,
    relation: Option<String>,
    #[serde(rename = "cod id")]
    cod_id: Option<String>,
    cod: Option<String>,
    unchanged: Option<String>,
    changed_props: Option<String>,
    reason: Option<String>,
}

pub fn write_report<W: Write>(
    duo: &Duo,
    alignment: &Alignment,
    merge: &Merge,
    registry: &PropertyRegistry,
    out: W,
) -> Result<(), Error> {
    let mut writer = csv::Writer::from_writer(out);
    let changed = find_changed_merged_subtrees(duo, merge);
    for root in &merge.roots {
        subreport(duo, alignment, merge, registry, &changed, *root, "", &mut writer)?;
    }
    writer.flush()?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn subreport<W: Write>(
    duo: &Duo,
    alignment: &Alignment,
    merge: &Merge,
    registry: &PropertyRegistry,
    changed: &HashMap<usize, bool>,
    index: usize,
    indent: &str,
    writer: &mut csv::Writer<W>,
) -> Result<(), Error> {
    let node = merge.node(index);
    let mut row = describe(duo, alignment, registry, node);
    row.indent = indent.to_string();

    let descendants_changed = changed.get(&index).copied().unwrap_or(true);
    if !descendants_changed && !merge.children_of(index).is_empty() {
        row.unchanged = Some("subtree=".to_string());
    }
    writer.serialize(row)?;

    if descendants_changed {
        let deeper = format!("{indent}__");
        for child in merge.children_of(index) {
            subreport(duo, alignment, merge, registry, changed, *child, &deeper, writer)?;
        }
    }
    Ok(())
}

fn describe(duo: &Duo, alignment: &Alignment, registry: &PropertyRegistry, node: MergedNode) -> Row {
    let mut row = Row {
        indent: String::new(),
        operation: String::new(),
        dom: None,
        dom_id: None,
        relation: None,
        cod_id: None,
        cod: None,
        unchanged: None,
        changed_props: None,
        reason: None,
    };

    let mut dom = node.x;
    let mut cod = node.y;

    match (node.x, node.y) {
        (Some(x), Some(y)) => {
            let articulation = alignment.get(x);
            let moved = articulation
                .map(|a| a.relation.atom == Rcc5::Eq && parent_changed(duo, alignment, x, y))
                .unwrap_or(false);
            row.operation = if moved { "MOVE" } else { "KEEP" }.to_string();
            if let Some(articulation) = articulation {
                row.relation = Some(articulation.relation.name.to_string());
                row.reason = Some(articulation.reason.clone());
            }
            let comparison = pdiff::differences(duo, x, y);
            if !comparison.same() {
                row.changed_props = Some(registry.names(comparison.changed).join("; "));
            }
        }
        (Some(x), None) => {
            if let Some(candidates) = alignment.ambiguous.get(&x) {
                row.operation = "MULTIPLE".to_string();
                row.reason = Some(format!("{} nodes match this node", candidates.len()));
            } else {
                row.operation = "DELETE".to_string();
                if let Some(articulation) = alignment.get(x) {
                    let qualifier = match articulation.relation.atom {
                        Rcc5::Eq => " (merge)",
                        Rcc5::Conflict => " (conflict)",
                        Rcc5::Lt => " (loss of resolution)",
                        _ => "",
                    };
                    row.operation.push_str(qualifier);
                    row.relation = Some(articulation.relation.name.to_string());
                    row.reason = Some(articulation.reason.clone());
                    cod = Some(articulation.cod);
                }
            }
        }
        (None, Some(y)) => {
            if let Some(candidates) = alignment.ambiguous.get(&y) {
                row.operation = "MULTIPLE".to_string();
                row.reason = Some(format!("{} nodes match this node", candidates.len()));
            } else {
                row.operation = "ADD".to_string();
                if let Some(articulation) = alignment.get(y) {
                    let qualifier = match articulation.relation.atom {
                        Rcc5::Eq => " (split)",
                        Rcc5::Conflict => " (reorganization)",
                        Rcc5::Lt => " (increased resolution)",
                        _ => "",
                    };
                    row.operation.push_str(qualifier);
                    row.relation = Some(articulation.relation.revname.to_string());
                    row.reason = Some(articulation.reason.clone());
                    dom = Some(articulation.cod);
                }
            }
        }
        (None, None) => unreachable!("merged node with no record"),
    }

    if let Some(x) = dom {
        row.dom = Some(duo.unique(x));
        row.dom_id = duo.node_id(x).map(str::to_string);
    }
    if let Some(y) = cod {
        row.cod = Some(duo.unique(y));
        row.cod_id = duo.node_id(y).map(str::to_string);
    }
    row
}

/// A KEEP row is a MOVE when the endpoints' parents are not aligned to
/// each other. The parent is judged by its own best match, an
/// approximation that can flag a move when the parents are merely
/// unaligned.
fn parent_changed(duo: &Duo, alignment: &Alignment, x: NodeRef, y: NodeRef) -> bool {
    let px = duo.parent(x);
    let py = duo.parent(y);
    match (px.is_forest(), py.is_forest()) {
        (true, true) => return false,
        (true, false) | (false, true) => return true,
        _ => {}
    }
    match alignment.cod(px) {
        Some(partner) => partner != py,
        None => true,
    }
}

/// For each merged node, whether anything changed among its descendants;
/// rows under an unchanged subtree are not written.
fn find_changed_merged_subtrees(duo: &Duo, merge: &Merge) -> HashMap<usize, bool> {
    fn process(duo: &Duo, merge: &Merge, index: usize, status: &mut HashMap<usize, bool>) -> bool {
        let node = merge.node(index);
        let node_changed = match (node.x, node.y) {
            (Some(x), Some(y)) => !pdiff::differences(duo, x, y).same(),
            _ => true,
        };
        let mut descendant_changed = false;
        for child in merge.children_of(index) {
            if process(duo, merge, *child, status) {
                descendant_changed = true;
            }
        }
        status.insert(index, descendant_changed);
        descendant_changed || node_changed
    }

    let mut status = HashMap::new();
    for root in &merge.roots {
        process(duo, merge, *root, &mut status);
    }
    status
}
