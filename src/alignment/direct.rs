//! Direct matches: cross-checklist bridges justified by surface
//! identifiers alone.

use crate::articulation::{self, Articulation};
use crate::checklist::{Duo, NodeRef};
use crate::properties;
use crate::relation;

/// All records on the other side carrying this node's canonical name,
/// plus (when the identifier spaces are declared shared) the record with
/// the same local identifier. A record found both ways collapses into a
/// single, stronger articulation.
pub fn direct_matches(duo: &Duo, share_ids: bool, node: NodeRef) -> Vec<Articulation> {
    let other = node.side.other();
    let name = duo.get_name(node);

    let hits: Vec<NodeRef> = duo
        .checklist(other)
        .nodes_with_value(properties::CANONICAL_NAME, name)
        .iter()
        .map(|id| NodeRef::new(other, *id))
        .collect();

    let id_hit = if share_ids {
        duo.node_id(node)
            .and_then(|id| duo.checklist(other).record_with_node_id(id))
            .map(|id| NodeRef::new(other, id))
    } else {
        None
    };

    let mut matches = Vec::new();
    if let Some(id_hit) = id_hit {
        if !hits.contains(&id_hit) {
            matches.push(articulation::bridge(duo, node, id_hit, relation::SAME_ID, "id"));
        }
    }
    for hit in hits {
        let rel = if Some(hit) == id_hit {
            relation::SAME_NAME_AND_ID
        } else {
            relation::SAME_NAME
        };
        matches.push(articulation::bridge(duo, node, hit, rel, "name"));
    }
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checklist::{Checklist, Side};
    use crate::properties::PropertyRegistry;
    use crate::readers::table;
    use crate::relation::Rcc5;

    fn load(tag: &str, csv: &str, registry: &mut PropertyRegistry) -> Checklist {
        let (columns, rows) = table::read_from(csv.as_bytes(), b',', registry).unwrap();
        Checklist::new(tag, "test", columns, rows).unwrap()
    }

    #[test]
    fn name_and_id_evidence_collapse() {
        let mut registry = PropertyRegistry::new();
        let a = load("A", "taxonID,canonicalName\n1,Aus bus\n2,Aus cus\n", &mut registry);
        let b = load("B", "taxonID,canonicalName\n1,Aus bus\n3,Aus cus\n", &mut registry);
        let duo = Duo::new(&a, &b);

        let bus = NodeRef::new(Side::A, a.record_with_node_id("1").unwrap());
        let matches = direct_matches(&duo, true, bus);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].relation, relation::SAME_NAME_AND_ID);

        // same name, different identifier: two separate justifications
        let cus = NodeRef::new(Side::A, a.record_with_node_id("2").unwrap());
        let matches = direct_matches(&duo, true, cus);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].relation, relation::SAME_NAME);

        // without shared id spaces the id evidence is ignored
        let matches = direct_matches(&duo, false, bus);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].relation, relation::SAME_NAME);
        assert_eq!(matches[0].relation.atom, Rcc5::Eq);
    }
}
