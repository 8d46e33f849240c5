//! Articulations: directed relational edges between taxa.
//!
//! An articulation asserts an RCC-5 relation between a domain and a
//! codomain record, possibly in different checklists, together with the
//! evidence for it: the primitive articulations it was composed from, a
//! short reason string, and a property diff when both endpoints are
//! accepted records.

use tracing::warn;

use crate::checklist::{Duo, NodeRef};
use crate::pdiff::{self, Comparison};
use crate::relation::{self, Rcc5, Relation};

#[derive(Debug, Clone)]
pub struct Articulation {
    pub dom: NodeRef,
    pub cod: NodeRef,
    pub relation: Relation,
    /// The articulations composed to produce this one; empty for
    /// primitives.
    pub factors: Vec<Articulation>,
    pub reason: String,
    pub diff: Option<Comparison>,
}

impl Articulation {
    pub fn factor_count(&self) -> usize {
        self.factors.len().max(1)
    }

    pub fn is_identity(&self) -> bool {
        self.dom == self.cod && self.relation.atom == Rcc5::Eq
    }

    pub fn express(&self, duo: &Duo) -> String {
        format!("{} {} {}", duo.unique(self.dom), self.relation.name, duo.unique(self.cod))
    }
}

fn make(duo: &Duo, dom: NodeRef, cod: NodeRef, relation: Relation, factors: Vec<Articulation>, reason: String) -> Articulation {
    let diff = if duo.is_accepted(dom) && duo.is_accepted(cod) {
        Some(pdiff::differences(duo, dom, cod))
    } else {
        None
    };
    Articulation {
        dom,
        cod,
        relation,
        factors,
        reason,
        diff,
    }
}

pub fn identity(duo: &Duo, node: NodeRef) -> Articulation {
    make(duo, node, node, relation::EQ, Vec::new(), "self".to_string())
}

/// A primitive cross-checklist edge.
pub fn bridge(duo: &Duo, dom: NodeRef, cod: NodeRef, relation: Relation, reason: &str) -> Articulation {
    assert_ne!(dom.side, cod.side);
    make(duo, dom, cod, relation, Vec::new(), reason.to_string())
}

/// The within-checklist edge from a synonym to its accepted record; the
/// relation comes from the nomenclatural status table.
pub fn synonymy(duo: &Duo, synonym: NodeRef, accepted: NodeRef) -> Articulation {
    assert_eq!(synonym.side, accepted.side);
    let status = duo
        .get_value(synonym, crate::properties::NOMENCLATURAL_STATUS)
        .or_else(|| duo.get_value(synonym, crate::properties::TAXONOMIC_STATUS))
        .unwrap_or("synonym");
    let relation = synonym_relation(status);
    make(duo, synonym, accepted, relation, Vec::new(), "synonym".to_string())
}

pub fn composable(p: &Articulation, q: &Articulation) -> bool {
    p.cod == q.dom && relation::composable(p.relation, q.relation)
}

pub fn compose(duo: &Duo, p: Articulation, q: Articulation) -> Articulation {
    assert!(composable(&p, &q), "not composable: {} & {}", p.express(duo), q.express(duo));
    if p.is_identity() {
        return q;
    }
    if q.is_identity() {
        return p;
    }
    let relation = relation::compose(p.relation, q.relation).expect("composable relations");
    let reason = format!("{}+{}", p.reason, q.reason);
    let mut factors = flatten(p);
    factors.extend(flatten(q));
    let (dom, cod) = (factors.first().expect("factors").dom, factors.last().expect("factors").cod);
    make(duo, dom, cod, relation, factors, reason)
}

fn flatten(articulation: Articulation) -> Vec<Articulation> {
    if articulation.factors.is_empty() {
        vec![articulation]
    } else {
        articulation.factors
    }
}

pub fn conjoinable(p: &Articulation, q: &Articulation) -> bool {
    p.dom == q.dom && p.cod == q.cod && relation::conjoinable(p.relation, q.relation)
}

/// Conjoin two articulations asserted of the same pair; both must refine
/// the same atom (or one be the unrefined `=`), and the better-evidenced
/// relation survives.
pub fn conjoin(duo: &Duo, p: Articulation, q: Articulation) -> Articulation {
    assert!(conjoinable(&p, &q), "not conjoinable: {} & {}", p.express(duo), q.express(duo));
    let relation = relation::conjoin(p.relation, q.relation).expect("conjoinable relations");
    if relation == p.relation {
        p
    } else {
        q
    }
}

pub fn reverse(articulation: &Articulation) -> Articulation {
    let mut factors: Vec<Articulation> = articulation.factors.iter().map(reverse).collect();
    factors.reverse();
    Articulation {
        dom: articulation.cod,
        cod: articulation.dom,
        relation: articulation.relation.reverse(),
        factors,
        reason: articulation.reason.clone(),
        diff: articulation.diff.map(Comparison::reverse),
    }
}

// ---------- synonym statuses

/// The closed table mapping a nomenclatural status to the relation between
/// a synonym bearing it and its accepted record.
const SYNONYM_RELATIONS: &[(&str, Rcc5, &str)] = &[
    ("homotypic synonym", Rcc5::Eq, "homotypic synonym-of"),
    ("authority", Rcc5::Eq, "authority-of"),
    ("scientific name", Rcc5::Eq, "scientific name-of"),
    ("equivalent name", Rcc5::Eq, "equivalent name-of"),
    ("misspelling", Rcc5::Eq, "misspelling-of"),
    ("unpublished name", Rcc5::Eq, "unpublished name-of"),
    ("genbank synonym", Rcc5::Eq, "genbank synonym-of"),
    ("anamorph", Rcc5::Eq, "anamorph-of"),
    ("genbank anamorph", Rcc5::Eq, "genbank anamorph-of"),
    ("teleomorph", Rcc5::Eq, "teleomorph-of"),
    ("acronym", Rcc5::Eq, "acronym-of"),
    ("genbank acronym", Rcc5::Eq, "genbank acronym-of"),
    ("blast name", Rcc5::Eq, "blast name-of"),
    ("BOLD id", Rcc5::Eq, "BOLD id-of"),
    ("synonym", Rcc5::Eq, "synonym-of"),
    ("heterotypic synonym", Rcc5::Eq, "heterotypic synonym-of"),
    ("misnomer", Rcc5::Eq, "misnomer-of"),
    ("type material", Rcc5::Eq, "type material-of"),
    ("merged id", Rcc5::Eq, "split id"),
    ("accepted", Rcc5::Eq, "accepted-of"),
    ("invalid", Rcc5::Eq, "invalid-of"),
    ("genbank common name", Rcc5::Eq, "genbank common name-of"),
    ("common name", Rcc5::Eq, "common name-of"),
    ("includes", Rcc5::Lt, "included-in"),
    ("in-part", Rcc5::Gt, "part-of"),
    ("proparte synonym", Rcc5::Gt, "proparte synonym-of"),
];

/// Unknown statuses warn and read as plain equality.
pub fn synonym_relation(status: &str) -> Relation {
    for (name, atom, revname) in SYNONYM_RELATIONS.iter().copied() {
        if name == status {
            return Relation::variant(atom, 0, name, revname);
        }
    }
    warn!(status, "unrecognized nomenclatural status");
    relation::EQ
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checklist::{Checklist, Side};
    use crate::properties::PropertyRegistry;
    use crate::readers::table;

    fn pair() -> (Checklist, Checklist) {
        let mut registry = PropertyRegistry::new();
        let a = "taxonID,canonicalName,parentNameUsageID\n1,Aus,\n2,Aus bus,1\n";
        let b = "taxonID,canonicalName,parentNameUsageID\n10,Aus,\n20,Aus bus,10\n";
        let (columns, rows) = table::read_from(a.as_bytes(), b',', &mut registry).unwrap();
        let a = Checklist::new("A", "left", columns, rows).unwrap();
        let (columns, rows) = table::read_from(b.as_bytes(), b',', &mut registry).unwrap();
        let b = Checklist::new("B", "right", columns, rows).unwrap();
        (a, b)
    }

    #[test]
    fn reverse_is_a_structural_involution() {
        let (a, b) = pair();
        let duo = Duo::new(&a, &b);
        let dom = NodeRef::new(Side::A, a.record_with_node_id("2").unwrap());
        let cod = NodeRef::new(Side::B, b.record_with_node_id("20").unwrap());
        let edge = bridge(&duo, dom, cod, relation::SAME_NAME, "name");
        let back = reverse(&reverse(&edge));
        assert_eq!(back.dom, edge.dom);
        assert_eq!(back.cod, edge.cod);
        assert_eq!(back.relation, edge.relation);
        assert_eq!(back.reason, edge.reason);
    }

    #[test]
    fn identity_is_a_composition_unit() {
        let (a, b) = pair();
        let duo = Duo::new(&a, &b);
        let dom = NodeRef::new(Side::A, a.record_with_node_id("2").unwrap());
        let cod = NodeRef::new(Side::B, b.record_with_node_id("20").unwrap());
        let edge = bridge(&duo, dom, cod, relation::SAME_NAME, "name");

        let left = compose(&duo, identity(&duo, dom), edge.clone());
        assert_eq!(left.cod, edge.cod);
        assert_eq!(left.relation, edge.relation);
        assert_eq!(left.factor_count(), 1);

        let right = compose(&duo, edge.clone(), identity(&duo, cod));
        assert_eq!(right.dom, edge.dom);
        assert_eq!(right.relation, edge.relation);
    }

    #[test]
    fn composition_concatenates_factors_and_reasons() {
        let (a, b) = pair();
        let duo = Duo::new(&a, &b);
        let x = NodeRef::new(Side::A, a.record_with_node_id("2").unwrap());
        let y = NodeRef::new(Side::B, b.record_with_node_id("20").unwrap());
        let x_root = NodeRef::new(Side::A, a.record_with_node_id("1").unwrap());

        let up = make(&duo, x_root, x, relation::GT, Vec::new(), "child".to_string());
        let over = bridge(&duo, x, y, relation::SAME_NAME, "name");
        let composed = compose(&duo, up, over);
        assert_eq!(composed.dom, x_root);
        assert_eq!(composed.cod, y);
        assert_eq!(composed.relation.atom, Rcc5::Gt);
        assert_eq!(composed.factor_count(), 2);
        assert_eq!(composed.reason, "child+name");
    }

    #[test]
    fn synonym_statuses_map_to_relations() {
        assert_eq!(synonym_relation("homotypic synonym").atom, Rcc5::Eq);
        assert_eq!(synonym_relation("includes").atom, Rcc5::Lt);
        assert_eq!(synonym_relation("in-part").atom, Rcc5::Gt);
        assert_eq!(synonym_relation("proparte synonym").atom, Rcc5::Gt);
        // unknown statuses warn and fall back to equality
        assert_eq!(synonym_relation("no such status"), relation::EQ);
        // reverse names default to the -of form
        assert_eq!(synonym_relation("misspelling").revname, "misspelling-of");
    }

    #[test]
    fn conjoin_keeps_the_better_evidence() {
        let (a, b) = pair();
        let duo = Duo::new(&a, &b);
        let dom = NodeRef::new(Side::A, a.record_with_node_id("2").unwrap());
        let cod = NodeRef::new(Side::B, b.record_with_node_id("20").unwrap());
        let weak = bridge(&duo, dom, cod, relation::SAME_ID, "id");
        let strong = bridge(&duo, dom, cod, relation::SAME_NAME, "name");
        let joined = conjoin(&duo, weak, strong);
        assert_eq!(joined.relation, relation::SAME_NAME);
    }
}
