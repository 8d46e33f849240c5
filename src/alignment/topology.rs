//! Cross-MRCAs and the topology comparator.
//!
//! For every node the post-order pass computes the MRCA, on the other
//! side, of the fringe images of its descendants. The pair classifier then
//! compares a node against a candidate partner by where their aligned
//! content falls: equal regions, containment one way or the other,
//! overlap without containment (conflict), or no shared content at all.
//! Content with no counterpart anywhere (residue) breaks extensional
//! symmetry: a node whose partner carries residue is a proper part of it.

use std::collections::HashMap;

use tracing::info;

use super::Aligner;
use crate::articulation::{self, Articulation};
use crate::checklist::{NodeRef, Side};
use crate::relation::{self, Rcc5, Relation};

/// Fill the cross-MRCA table for both sides.
pub fn analyze_cross_mrcas(aligner: &mut Aligner) {
    let mut table = HashMap::new();
    for side in [Side::A, Side::B] {
        for root in aligner.duo.roots(side) {
            subanalyze(aligner, root, &mut table);
        }
    }
    info!(cross_mrcas = table.len(), "cross-mrcas analyzed");
    aligner.cross_mrcas = table;
}

fn subanalyze(
    aligner: &Aligner,
    node: NodeRef,
    table: &mut HashMap<NodeRef, NodeRef>,
) -> Option<NodeRef> {
    if let Some(m) = aligner.mutual_fringe_match(node) {
        return Some(m.cod);
    }
    let mut region: Option<NodeRef> = None;
    for inferior in aligner.duo.inferiors(node) {
        if let Some(sub) = subanalyze(aligner, inferior, table) {
            region = Some(match region {
                None => sub,
                Some(previous) => aligner.duo.mrca(previous, sub),
            });
        }
    }
    // images spread over separate trees fold to the forest: no usable region
    let region = region.filter(|r| !r.is_forest());
    if let Some(region) = region {
        table.insert(node, region);
    }
    region
}

/// No aligned content of `partner`'s subtree lies anywhere near `x`:
/// every mutual fringe image under it is disjoint from `x`.
pub fn cross_disjoint(aligner: &Aligner, x: NodeRef, partner: NodeRef) -> bool {
    if let Some(m) = aligner.mutual_fringe_match(partner) {
        return aligner.duo.are_disjoint(x, m.cod);
    }
    aligner
        .duo
        .inferiors(partner)
        .into_iter()
        .all(|inferior| cross_disjoint(aligner, x, inferior))
}

/// Compare `x` against a candidate partner on the other side by the
/// placement of their aligned content. None when either side has no
/// aligned content to compare.
pub fn classify_pair(aligner: &Aligner, x: NodeRef, partner: NodeRef) -> Option<Relation> {
    let duo = aligner.duo;
    let region = aligner.cross_mrca_or_fringe(x)?;
    let back = aligner.cross_mrca_or_fringe(partner)?;

    let x_covers = matches!(duo.how_related(x, back), Rcc5::Eq | Rcc5::Gt);
    let partner_covers = matches!(duo.how_related(partner, region), Rcc5::Eq | Rcc5::Gt);
    let x_residue = aligner.has_residue(x);
    let partner_residue = aligner.has_residue(partner);

    Some(match (x_covers, partner_covers) {
        // same matched extension; one-sided residue tips the balance
        (true, true) => match (x_residue, partner_residue) {
            (false, true) => relation::FRINGE_LT,
            (true, false) => relation::FRINGE_GT,
            _ => relation::FRINGE_EQ,
        },
        // x's content sits inside the partner, which holds more
        (false, true) => {
            if x_residue {
                relation::FRINGE_CONFLICT
            } else {
                relation::FRINGE_LT
            }
        }
        (true, false) => {
            if partner_residue {
                relation::FRINGE_CONFLICT
            } else {
                relation::FRINGE_GT
            }
        }
        (false, false) => {
            if cross_disjoint(aligner, x, partner) {
                relation::FRINGE_DISJOINT
            } else {
                relation::FRINGE_CONFLICT
            }
        }
    })
}

/// Topological candidates for `x`: the bridge to its fringe image or
/// cross-MRCA, plus one candidate per ancestor of that partner whose own
/// cross-MRCA still falls inside `x` (a monotypic chain). Candidates come
/// out topmost-first so later tie-breaking prefers the most rootward.
pub fn topological_matches(aligner: &Aligner, x: NodeRef) -> Vec<Articulation> {
    let duo = aligner.duo;
    let mut matches = Vec::new();

    let base = if let Some(direct) = aligner.best_fringe_match(x) {
        let cod = direct.cod;
        matches.push(direct);
        Some(cod)
    } else if let Some(partner) = aligner.cross_mrca(x) {
        if let Some(rel) = classify_pair(aligner, x, partner) {
            matches.push(articulation::bridge(duo, x, partner, rel, "fringe"));
        }
        Some(partner)
    } else {
        None
    };

    if let Some(base) = base {
        let mut scan = duo.superior(base);
        while let Some(ancestor) = scan {
            let Some(region) = aligner.cross_mrca(ancestor) else {
                break;
            };
            if !matches!(duo.how_related(x, region), Rcc5::Eq | Rcc5::Gt) {
                break;
            }
            if let Some(rel) = classify_pair(aligner, x, ancestor) {
                matches.push(articulation::bridge(duo, x, ancestor, rel, "monotypic"));
            }
            scan = duo.superior(ancestor);
        }
    }

    matches.reverse();
    matches
}
