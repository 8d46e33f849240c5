//! Best-match selection.
//!
//! Topological candidates and name-based candidates are merged into one
//! pool: a name-based candidate whose pair also classifies topologically
//! gets re-tagged with the combined, stronger evidence. The pool is pruned
//! to one candidate per codomain, then the least-bad survivor wins. Ties
//! on every criterion are reported as ambiguity, never broken by guessing.

use tracing::warn;

use super::{direct, topology, Aligner, BestMatch};
use crate::articulation::{self, Articulation};
use crate::checklist::NodeRef;
use crate::relation::{self, Rcc5};

pub fn best_match(aligner: &Aligner, node: NodeRef) -> BestMatch {
    if let Some(cached) = aligner.best_cache.borrow().get(&node) {
        return cached.clone();
    }
    let result = choose_least_bad(aligner, good_matches(aligner, node));
    aligner.best_cache.borrow_mut().insert(node, result.clone());
    result
}

fn good_matches(aligner: &Aligner, node: NodeRef) -> Vec<Articulation> {
    let mut candidates = topology::topological_matches(aligner, node);

    for namey in name_based_matches(aligner, node) {
        match topology::classify_pair(aligner, node, namey.cod) {
            // no topological evidence for the pair: the name stands alone
            None => candidates.push(namey),
            Some(verdict) => {
                let strengthened = match verdict.atom {
                    Rcc5::Eq => relation::FRINGE_NAME_EQ,
                    Rcc5::Lt => relation::FRINGE_NAME_LT,
                    Rcc5::Gt => relation::FRINGE_NAME_GT,
                    Rcc5::Conflict => relation::FRINGE_NAME_CONFLICT,
                    // topology refutes the name match outright
                    Rcc5::Disjoint => relation::FRINGE_DISJOINT,
                };
                candidates.push(Articulation {
                    relation: strengthened,
                    ..namey
                });
            }
        }
    }

    prune_matches(candidates)
}

/// Bridges reachable through surface names, following synonym edges on
/// both ends: synonym-or-self, then a direct match, then up to the
/// accepted record of the target.
pub fn name_based_matches(aligner: &Aligner, node: NodeRef) -> Vec<Articulation> {
    if let Some(cached) = aligner.name_cache.borrow().get(&node) {
        return cached.clone();
    }
    let duo = aligner.duo;
    let mut matches = Vec::new();
    for from in from_accepted_articulations(aligner, node) {
        for hit in direct::direct_matches(duo, aligner.share_ids, from.cod) {
            if !articulation::composable(&from, &hit) {
                continue;
            }
            let composed = articulation::compose(duo, from.clone(), hit);
            matches.push(to_accepted_match(aligner, composed));
        }
    }
    let matches = prune_matches(matches);
    aligner.name_cache.borrow_mut().insert(node, matches.clone());
    matches
}

fn from_accepted_articulations(aligner: &Aligner, node: NodeRef) -> Vec<Articulation> {
    let duo = aligner.duo;
    let mut articulations = vec![articulation::identity(duo, node)];
    for synonym in duo.synonyms(node) {
        articulations.push(articulation::reverse(&articulation::synonymy(duo, synonym, node)));
    }
    articulations
}

fn to_accepted_match(aligner: &Aligner, m: Articulation) -> Articulation {
    let duo = aligner.duo;
    if let Some(accepted) = duo.accepted(m.cod) {
        let up = articulation::synonymy(duo, m.cod, accepted);
        if articulation::composable(&m, &up) {
            return articulation::compose(duo, m, up);
        }
    }
    m
}

/// Keep one articulation per codomain: the best-evidenced one.
fn prune_matches(mut articulations: Vec<Articulation>) -> Vec<Articulation> {
    if articulations.len() <= 1 {
        return articulations;
    }
    articulations.sort_by_key(|a| a.relation.sort_key());
    let mut kept: Vec<Articulation> = Vec::new();
    for candidate in articulations {
        if !kept.iter().any(|k| k.cod == candidate.cod) {
            kept.push(candidate);
        }
    }
    kept
}

/// The full tie-breaking key: evidence strength, then the most rootward
/// codomain, then the shortest composition, then the lightest property
/// diff.
fn prune_ordering(aligner: &Aligner, a: &Articulation) -> ((u32, u8), i32, usize, (u64, u64)) {
    (
        a.relation.sort_key(),
        aligner.duo.mutex(a.cod),
        a.factor_count(),
        a.diff.map(|d| d.weight()).unwrap_or((0, 0)),
    )
}

pub fn choose_least_bad(aligner: &Aligner, articulations: Vec<Articulation>) -> BestMatch {
    if articulations.is_empty() {
        return BestMatch::None;
    }
    let best_key = articulations
        .iter()
        .map(|a| prune_ordering(aligner, a))
        .min()
        .expect("nonempty candidates");
    let mut besties: Vec<Articulation> = articulations
        .into_iter()
        .filter(|a| prune_ordering(aligner, a) == best_key)
        .collect();
    if besties.len() == 1 {
        BestMatch::One(besties.pop().expect("single candidate"))
    } else {
        warn!(
            dom = %aligner.duo.unique(besties[0].dom),
            candidates = besties.len(),
            "multiple least-bad matches, reporting ambiguity"
        );
        BestMatch::Multiple(besties)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checklist::{Checklist, Duo, Side};
    use crate::properties::PropertyRegistry;
    use crate::readers::{read_checklist, table};

    fn node(checklist: &Checklist, side: Side, id: &str) -> NodeRef {
        NodeRef::new(side, checklist.record_with_node_id(id).unwrap())
    }

    #[test]
    fn name_and_topology_agreement_wins() {
        let mut registry = PropertyRegistry::new();
        let a = read_checklist("(G g1 g2 g3)", "A", "left", &mut registry).unwrap();
        let b = read_checklist("(G g1 g2 g3)", "B", "right", &mut registry).unwrap();
        let duo = Duo::new(&a, &b);
        let mut aligner = Aligner::new(&duo, false);
        aligner.analyze();

        let ag = node(&a, Side::A, "G");
        let best = best_match(&aligner, ag).one().cloned().unwrap();
        assert_eq!(best.cod, node(&b, Side::B, "G"));
        assert_eq!(best.relation, relation::FRINGE_NAME_EQ);
    }

    #[test]
    fn synonym_edges_justify_renames() {
        let mut registry = PropertyRegistry::new();
        let a_csv = "\
taxonID,canonicalName,parentNameUsageID,acceptedNameUsageID,nomenclaturalStatus
1,Cheirogaleidae,,,
2,Mirza coquereli,1,,
3,Microcebus coquereli,,2,synonym
";
        let b_csv = "\
taxonID,canonicalName,parentNameUsageID,acceptedNameUsageID,nomenclaturalStatus
10,Cheirogaleidae,,,
20,Microcebus coquereli,10,,
";
        let (columns, rows) = table::read_from(a_csv.as_bytes(), b',', &mut registry).unwrap();
        let a = Checklist::new("A", "left", columns, rows).unwrap();
        let (columns, rows) = table::read_from(b_csv.as_bytes(), b',', &mut registry).unwrap();
        let b = Checklist::new("B", "right", columns, rows).unwrap();
        let duo = Duo::new(&a, &b);
        let mut aligner = Aligner::new(&duo, false);
        aligner.analyze();

        let mirza = node(&a, Side::A, "2");
        let target = node(&b, Side::B, "20");
        let matches = name_based_matches(&aligner, mirza);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].cod, target);
        assert_eq!(matches[0].relation.atom, Rcc5::Eq);
        assert_eq!(matches[0].reason, "synonym+name");
        assert_eq!(matches[0].factor_count(), 2);

        let best = best_match(&aligner, mirza).one().cloned().unwrap();
        assert_eq!(best.cod, target);
    }

    #[test]
    fn unresolvable_ties_are_reported_not_guessed() {
        // two B siblings carry A's name; no topology to separate them
        let mut registry = PropertyRegistry::new();
        let a_csv = "taxonID,canonicalName\n1,Aus bus\n";
        let b_csv = "\
taxonID,canonicalName,parentNameUsageID
10,Top,
11,Aus bus,10
12,Aus bus,10
";
        let (columns, rows) = table::read_from(a_csv.as_bytes(), b',', &mut registry).unwrap();
        let a = Checklist::new("A", "left", columns, rows).unwrap();
        let (columns, rows) = table::read_from(b_csv.as_bytes(), b',', &mut registry).unwrap();
        let b = Checklist::new("B", "right", columns, rows).unwrap();
        let duo = Duo::new(&a, &b);
        let mut aligner = Aligner::new(&duo, false);
        aligner.analyze();

        let aus = node(&a, Side::A, "1");
        match best_match(&aligner, aus) {
            BestMatch::Multiple(candidates) => assert_eq!(candidates.len(), 2),
            other => panic!("expected ambiguity, got {other:?}"),
        }
    }

    #[test]
    fn best_match_is_memoized() {
        let mut registry = PropertyRegistry::new();
        let a = read_checklist("(G g1)", "A", "left", &mut registry).unwrap();
        let b = read_checklist("(G g1)", "B", "right", &mut registry).unwrap();
        let duo = Duo::new(&a, &b);
        let mut aligner = Aligner::new(&duo, false);
        aligner.analyze();

        let g1 = node(&a, Side::A, "g1");
        let first = best_match(&aligner, g1).one().cloned().unwrap();
        assert_eq!(aligner.best_cache.borrow().len(), 1);
        let second = best_match(&aligner, g1).one().cloned().unwrap();
        assert_eq!(first.cod, second.cod);
        assert_eq!(first.relation, second.relation);
    }
}
