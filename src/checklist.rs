//! The in-memory checklist model.
//!
//! A checklist owns an arena of taxon records (TNUs) addressed by dense
//! numeric ids, with id 0 reserved for the forest sentinel above all roots.
//! Records are property bags: each checklist knows its column set and keeps
//! hash indices over the columns the engine navigates by (canonical name,
//! taxon id, parent id, accepted id). Parent, accepted and synonym links
//! are ids, never pointers.

use std::collections::HashMap;

use tracing::warn;

use crate::errors::ParseError;
use crate::properties::{self, PropertyId};
use crate::rank;
use crate::relation::Rcc5;

pub type NodeId = u32;

/// The forest sentinel: parent of every root.
pub const FOREST: NodeId = 0;

/// Which of the two checklists under comparison a record belongs to.
/// A is the lower-priority side, B the higher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }
}

/// A record handle that is meaningful across the pair of checklists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeRef {
    pub side: Side,
    pub id: NodeId,
}

impl NodeRef {
    pub fn new(side: Side, id: NodeId) -> NodeRef {
        NodeRef { side, id }
    }

    pub fn is_forest(self) -> bool {
        self.id == FOREST
    }
}

pub struct Checklist {
    pub tag: String,
    pub prefix: String,
    pub name: String,
    columns: Vec<PropertyId>,
    positions: HashMap<PropertyId, usize>,
    /// Row 0 is the forest sentinel and holds no values.
    values: Vec<Vec<Option<String>>>,
    indexes: HashMap<PropertyId, HashMap<String, Vec<NodeId>>>,
    sequence: Vec<usize>,
    mutex: Vec<i32>,
}

impl Checklist {
    pub fn new(
        tag: &str,
        name: &str,
        columns: Vec<PropertyId>,
        rows: Vec<Vec<Option<String>>>,
    ) -> Result<Checklist, ParseError> {
        for required in [properties::TAXON_ID, properties::CANONICAL_NAME] {
            if !columns.contains(&required) {
                let label = if required == properties::TAXON_ID {
                    "taxonID"
                } else {
                    "canonicalName"
                };
                return Err(ParseError::MissingColumn(label.to_string()));
            }
        }

        let positions = columns.iter().enumerate().map(|(i, p)| (*p, i)).collect();
        let mut values = Vec::with_capacity(rows.len() + 1);
        values.push(Vec::new());
        values.extend(rows);

        let count = values.len();
        let mut checklist = Checklist {
            tag: tag.to_string(),
            prefix: format!("{tag}."),
            name: name.to_string(),
            columns,
            positions,
            values,
            indexes: HashMap::new(),
            sequence: vec![0; count],
            mutex: vec![-1; count],
        };

        checklist.build_indexes();
        checklist.assign_sequence_numbers()?;
        checklist.compute_mutexes();
        Ok(checklist)
    }

    pub fn columns(&self) -> &[PropertyId] {
        &self.columns
    }

    pub fn node_count(&self) -> usize {
        self.values.len() - 1
    }

    pub fn all_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        1..self.values.len() as NodeId
    }

    // ---------- field access

    pub fn get_value(&self, node: NodeId, property: PropertyId) -> Option<&str> {
        if node == FOREST {
            return None;
        }
        let position = *self.positions.get(&property)?;
        self.values[node as usize].get(position)?.as_deref()
    }

    pub fn nodes_with_value(&self, property: PropertyId, value: &str) -> &[NodeId] {
        self.indexes
            .get(&property)
            .and_then(|index| index.get(value))
            .map(|nodes| nodes.as_slice())
            .unwrap_or(&[])
    }

    pub fn record_with_node_id(&self, id: &str) -> Option<NodeId> {
        self.nodes_with_value(properties::TAXON_ID, id).first().copied()
    }

    pub fn node_id(&self, node: NodeId) -> Option<&str> {
        self.get_value(node, properties::TAXON_ID)
    }

    /// Display name: canonical name, falling back to the scientific name,
    /// falling back to the local identifier.
    pub fn get_name(&self, node: NodeId) -> &str {
        self.get_value(node, properties::CANONICAL_NAME)
            .or_else(|| self.get_value(node, properties::SCIENTIFIC_NAME))
            .or_else(|| self.node_id(node))
            .unwrap_or("")
    }

    /// Container pseudo-nodes hold unplaced taxa; they are not ranked
    /// normally and do not anchor topology.
    pub fn is_container(&self, node: NodeId) -> bool {
        let name = self.get_name(node).to_lowercase();
        name.contains("unclassified")
            || name.contains("incertae sedis")
            || name.contains("unallocated")
            || name.contains("unassigned")
    }

    pub fn nominal_rank(&self, node: NodeId) -> Option<&str> {
        if self.is_container(node) {
            return None;
        }
        self.get_value(node, properties::TAXON_RANK)
    }

    // ---------- hierarchy

    /// The accepted record this synonym points at, if the record is a
    /// synonym and its accepted id resolves.
    pub fn accepted(&self, node: NodeId) -> Option<NodeId> {
        let id = self.get_value(node, properties::ACCEPTED_NAME_USAGE_ID)?;
        let accepted = self.record_with_node_id(id)?;
        if accepted == node {
            return None;
        }
        Some(accepted)
    }

    pub fn to_accepted(&self, node: NodeId) -> NodeId {
        self.accepted(node).unwrap_or(node)
    }

    pub fn is_accepted(&self, node: NodeId) -> bool {
        self.get_value(node, properties::ACCEPTED_NAME_USAGE_ID).is_none()
    }

    /// The accepted parent, or the forest sentinel. The parent id wins when
    /// it resolves; synonyms fall back to the parent of their accepted
    /// record.
    pub fn parent(&self, node: NodeId) -> NodeId {
        if node == FOREST {
            return FOREST;
        }
        if let Some(id) = self.get_value(node, properties::PARENT_NAME_USAGE_ID) {
            if let Some(parent) = self.record_with_node_id(id) {
                if parent != node {
                    return self.to_accepted(parent);
                }
            }
        }
        if let Some(accepted) = self.accepted(node) {
            return self.direct_parent(accepted).unwrap_or(FOREST);
        }
        FOREST
    }

    fn direct_parent(&self, node: NodeId) -> Option<NodeId> {
        let id = self.get_value(node, properties::PARENT_NAME_USAGE_ID)?;
        let parent = self.record_with_node_id(id)?;
        if parent == node {
            return None;
        }
        Some(self.to_accepted(parent))
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        match self.node_id(node) {
            Some(id) => self
                .nodes_with_value(properties::PARENT_NAME_USAGE_ID, id)
                .iter()
                .copied()
                .filter(|child| *child != node)
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn synonyms(&self, node: NodeId) -> Vec<NodeId> {
        match self.node_id(node) {
            Some(id) => self
                .nodes_with_value(properties::ACCEPTED_NAME_USAGE_ID, id)
                .iter()
                .copied()
                .filter(|synonym| *synonym != node)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Synonyms first, then children.
    pub fn inferiors(&self, node: NodeId) -> Vec<NodeId> {
        let mut inferiors = self.synonyms(node);
        inferiors.extend(self.children(node));
        inferiors
    }

    /// The accepted record above this one: the accepted record for a
    /// synonym, the parent otherwise. None at a root.
    pub fn superior(&self, node: NodeId) -> Option<NodeId> {
        if let Some(accepted) = self.accepted(node) {
            return Some(accepted);
        }
        match self.parent(node) {
            FOREST => None,
            parent => Some(parent),
        }
    }

    pub fn roots(&self) -> Vec<NodeId> {
        self.all_nodes()
            .filter(|node| self.to_accepted(*node) == *node && self.parent(*node) == FOREST)
            .collect()
    }

    pub fn sequence_number(&self, node: NodeId) -> usize {
        self.sequence[node as usize]
    }

    // ---------- rank levels

    pub fn mutex(&self, node: NodeId) -> i32 {
        if node == FOREST {
            return rank::FOREST;
        }
        let accepted = self.to_accepted(node);
        let mutex = self.mutex[accepted as usize];
        if mutex < 0 {
            // unreachable records have no computed level; treat as tipmost
            return rank::ATOM;
        }
        mutex
    }

    fn nominal_mutex(&self, node: NodeId) -> Option<i32> {
        rank::name_to_mutex(self.nominal_rank(node)?)
    }

    // ---------- hierarchy analyzers

    /// Walk both records rootward, always advancing the more tipward one,
    /// until they sit at the same level. When they start at the same level
    /// but differ, one extra parent step on the first breaks the tie.
    pub fn find_peers(&self, x: NodeId, y: NodeId) -> (NodeId, NodeId) {
        let mut x = self.to_accepted(x);
        let mut y = self.to_accepted(y);
        if x == FOREST || y == FOREST {
            return (FOREST, FOREST);
        }

        let mut mx = self.mutex(x);
        let mut my = self.mutex(y);
        if mx == my && x != y {
            x = self.parent(x);
            mx = self.mutex(x);
        }

        while mx != my {
            if mx > my {
                if x == FOREST {
                    return (FOREST, FOREST);
                }
                x = self.parent(x);
                mx = self.mutex(x);
            } else {
                if y == FOREST {
                    return (FOREST, FOREST);
                }
                y = self.parent(y);
                my = self.mutex(y);
            }
        }
        (x, y)
    }

    pub fn mrca(&self, x: NodeId, y: NodeId) -> NodeId {
        let mut x = self.to_accepted(x);
        let mut y = self.to_accepted(y);
        loop {
            if x == FOREST || y == FOREST {
                return FOREST;
            }
            if x == y {
                return x;
            }
            let (px, py) = self.find_peers(x, y);
            x = px;
            y = py;
        }
    }

    pub fn how_related(&self, x: NodeId, y: NodeId) -> Rcc5 {
        let x = self.to_accepted(x);
        let y = self.to_accepted(y);
        if x == y {
            return Rcc5::Eq;
        }
        let (px, py) = self.find_peers(x, y);
        if px == py {
            if px == x {
                return Rcc5::Gt;
            }
            if py == y {
                return Rcc5::Lt;
            }
        }
        Rcc5::Disjoint
    }

    pub fn are_disjoint(&self, x: NodeId, y: NodeId) -> bool {
        if x == FOREST || y == FOREST {
            return false;
        }
        self.how_related(x, y) == Rcc5::Disjoint
    }

    // ---------- display names

    /// A spaceless name, unique within the checklist: the display name,
    /// with `#taxonID` appended when the name is ambiguous and a `?` prefix
    /// for synonyms.
    pub fn spaceless(&self, node: NodeId) -> String {
        if node == FOREST {
            return "forest".to_string();
        }
        let mut name = self.get_name(node).to_string();
        if self.nodes_with_value(properties::CANONICAL_NAME, &name).len() > 1 {
            if let Some(id) = self.node_id(node) {
                name = format!("{name}#{id}");
            }
        }
        if !self.is_accepted(node) {
            name = format!("?{name}");
        }
        name.replace(' ', "_")
    }

    pub fn unique(&self, node: NodeId) -> String {
        format!("{}{}", self.prefix, self.spaceless(node))
    }

    // ---------- construction passes

    fn build_indexes(&mut self) {
        for property in [
            properties::CANONICAL_NAME,
            properties::TAXON_ID,
            properties::PARENT_NAME_USAGE_ID,
            properties::ACCEPTED_NAME_USAGE_ID,
        ] {
            let Some(position) = self.positions.get(&property).copied() else {
                continue;
            };
            let mut index: HashMap<String, Vec<NodeId>> = HashMap::new();
            for node in 1..self.values.len() {
                if let Some(value) = self.values[node].get(position).and_then(|v| v.as_deref()) {
                    index.entry(value.to_string()).or_default().push(node as NodeId);
                }
            }
            self.indexes.insert(property, index);
        }
    }

    /// Depth-first pre-order numbering over the accepted forest, synonyms
    /// before children. Doubles as the parent-cycle check: a record the
    /// walk never reaches hangs from a cycle.
    fn assign_sequence_numbers(&mut self) -> Result<(), ParseError> {
        fn process(checklist: &Checklist, node: NodeId, n: &mut usize, sequence: &mut [usize], seen: &mut [bool]) {
            if seen[node as usize] {
                return;
            }
            seen[node as usize] = true;
            sequence[node as usize] = *n;
            *n += 1;
            for inferior in checklist.inferiors(node) {
                process(checklist, inferior, n, sequence, seen);
            }
        }

        let mut sequence = vec![0; self.values.len()];
        let mut seen = vec![false; self.values.len()];
        let mut n = 0;
        for root in self.roots() {
            process(self, root, &mut n, &mut sequence, &mut seen);
        }

        for node in self.all_nodes() {
            if !seen[node as usize] {
                let label = self
                    .node_id(node)
                    .unwrap_or(self.get_name(node))
                    .to_string();
                return Err(ParseError::ParentCycle(label));
            }
        }

        self.sequence = sequence;
        Ok(())
    }

    fn compute_mutexes(&mut self) {
        let mut memo = vec![-1i32; self.values.len()];
        for root in self.roots() {
            self.mutex_of(root, &mut memo);
        }
        self.mutex = memo;
    }

    fn mutex_of(&self, node: NodeId, memo: &mut Vec<i32>) -> i32 {
        if node == FOREST {
            return rank::FOREST;
        }
        let node = self.to_accepted(node);
        if memo[node as usize] >= 0 {
            return memo[node as usize];
        }

        // most rootward level among the children
        let mut children_mutex = rank::ATOM;
        for child in self.children(node) {
            children_mutex = children_mutex.min(self.mutex_of(child, memo));
        }

        // the given rank, if any, is normative; roots all share one level
        let mutex = if self.parent(node) == FOREST {
            rank::ROOT
        } else {
            self.nominal_mutex(node)
                .unwrap_or_else(|| children_mutex.saturating_sub(10))
        };
        self.set_mutex(node, mutex, memo);
        self.correct_children_mutexes(node, mutex, memo);
        mutex
    }

    fn set_mutex(&self, node: NodeId, mutex: i32, memo: &mut Vec<i32>) {
        let have = memo[node as usize];
        if have >= 0 && have != mutex {
            warn!(
                node = %self.unique(node),
                from = %rank::mutex_to_name(have),
                to = %rank::mutex_to_name(mutex),
                "adjusting rank level"
            );
        }
        memo[node as usize] = mutex;
    }

    /// Children at the parent's level or above it get demoted below it.
    fn correct_children_mutexes(&self, parent: NodeId, parent_mutex: i32, memo: &mut Vec<i32>) {
        for child in self.children(parent) {
            let child_mutex = self.mutex_of(child, memo);
            if child_mutex <= parent_mutex {
                warn!(
                    child = %self.unique(child),
                    parent = %self.unique(parent),
                    "child does not rank below its parent, demoting"
                );
                if self.is_container(child) {
                    let demoted = parent_mutex + 1;
                    self.set_mutex(child, demoted, memo);
                    self.correct_children_mutexes(child, demoted, memo);
                } else {
                    self.set_mutex(child, parent_mutex + 10, memo);
                }
            }
        }
    }
}

/// The pair of checklists under comparison, with the property columns they
/// share. Structural and identity columns are left out of the shared set;
/// they are compared through the alignment, not by value.
pub struct Duo<'a> {
    lists: [&'a Checklist; 2],
    pub shared_props: Vec<PropertyId>,
}

impl<'a> Duo<'a> {
    pub fn new(a: &'a Checklist, b: &'a Checklist) -> Duo<'a> {
        let excluded = [
            properties::TAXON_ID,
            properties::PARENT_NAME_USAGE_ID,
            properties::ACCEPTED_NAME_USAGE_ID,
        ];
        let shared_props = a
            .columns()
            .iter()
            .copied()
            .filter(|p| b.columns().contains(p) && !excluded.contains(p))
            .collect();
        Duo {
            lists: [a, b],
            shared_props,
        }
    }

    pub fn checklist(&self, side: Side) -> &Checklist {
        self.lists[side.index()]
    }

    pub fn forest(&self, side: Side) -> NodeRef {
        NodeRef::new(side, FOREST)
    }

    // forwarding helpers that keep the side attached

    pub fn get_value(&self, node: NodeRef, property: PropertyId) -> Option<&str> {
        self.checklist(node.side).get_value(node.id, property)
    }

    pub fn get_name(&self, node: NodeRef) -> &str {
        self.checklist(node.side).get_name(node.id)
    }

    pub fn node_id(&self, node: NodeRef) -> Option<&str> {
        self.checklist(node.side).node_id(node.id)
    }

    pub fn unique(&self, node: NodeRef) -> String {
        self.checklist(node.side).unique(node.id)
    }

    pub fn parent(&self, node: NodeRef) -> NodeRef {
        NodeRef::new(node.side, self.checklist(node.side).parent(node.id))
    }

    pub fn superior(&self, node: NodeRef) -> Option<NodeRef> {
        self.checklist(node.side)
            .superior(node.id)
            .map(|id| NodeRef::new(node.side, id))
    }

    pub fn children(&self, node: NodeRef) -> Vec<NodeRef> {
        self.checklist(node.side)
            .children(node.id)
            .into_iter()
            .map(|id| NodeRef::new(node.side, id))
            .collect()
    }

    pub fn synonyms(&self, node: NodeRef) -> Vec<NodeRef> {
        self.checklist(node.side)
            .synonyms(node.id)
            .into_iter()
            .map(|id| NodeRef::new(node.side, id))
            .collect()
    }

    pub fn inferiors(&self, node: NodeRef) -> Vec<NodeRef> {
        self.checklist(node.side)
            .inferiors(node.id)
            .into_iter()
            .map(|id| NodeRef::new(node.side, id))
            .collect()
    }

    pub fn roots(&self, side: Side) -> Vec<NodeRef> {
        self.checklist(side)
            .roots()
            .into_iter()
            .map(|id| NodeRef::new(side, id))
            .collect()
    }

    pub fn accepted(&self, node: NodeRef) -> Option<NodeRef> {
        self.checklist(node.side)
            .accepted(node.id)
            .map(|id| NodeRef::new(node.side, id))
    }

    pub fn to_accepted(&self, node: NodeRef) -> NodeRef {
        NodeRef::new(node.side, self.checklist(node.side).to_accepted(node.id))
    }

    pub fn is_accepted(&self, node: NodeRef) -> bool {
        self.checklist(node.side).is_accepted(node.id)
    }

    pub fn mutex(&self, node: NodeRef) -> i32 {
        self.checklist(node.side).mutex(node.id)
    }

    pub fn sequence_number(&self, node: NodeRef) -> usize {
        self.checklist(node.side).sequence_number(node.id)
    }

    pub fn mrca(&self, x: NodeRef, y: NodeRef) -> NodeRef {
        assert_eq!(x.side, y.side);
        NodeRef::new(x.side, self.checklist(x.side).mrca(x.id, y.id))
    }

    pub fn how_related(&self, x: NodeRef, y: NodeRef) -> Rcc5 {
        assert_eq!(x.side, y.side);
        self.checklist(x.side).how_related(x.id, y.id)
    }

    pub fn are_disjoint(&self, x: NodeRef, y: NodeRef) -> bool {
        assert_eq!(x.side, y.side);
        self.checklist(x.side).are_disjoint(x.id, y.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::PropertyRegistry;
    use crate::readers::table;

    fn load(csv: &str) -> Checklist {
        let mut registry = PropertyRegistry::new();
        let (columns, rows) = table::read_from(csv.as_bytes(), b',', &mut registry).unwrap();
        Checklist::new("A", "test", columns, rows).unwrap()
    }

    const PRIMATES: &str = "\
taxonID,canonicalName,parentNameUsageID,acceptedNameUsageID,taxonRank,nomenclaturalStatus
1,Primates,,,order,
2,Lemuriformes,1,,suborder,
3,Cheirogaleidae,2,,family,
4,Microcebus,3,,genus,
5,Microcebus murinus,4,,species,
6,Mirza,3,,genus,
7,Mirza coquereli,6,,species,
8,Microcebus coquereli,,7,species,synonym
";

    #[test]
    fn parent_links_resolve_to_accepted_records() {
        let checklist = load(PRIMATES);
        let murinus = checklist.record_with_node_id("5").unwrap();
        let microcebus = checklist.record_with_node_id("4").unwrap();
        assert_eq!(checklist.parent(murinus), microcebus);
        assert_eq!(checklist.roots(), vec![checklist.record_with_node_id("1").unwrap()]);
    }

    #[test]
    fn synonyms_hang_off_their_accepted_record() {
        let checklist = load(PRIMATES);
        let coquereli = checklist.record_with_node_id("7").unwrap();
        let synonym = checklist.record_with_node_id("8").unwrap();
        assert!(!checklist.is_accepted(synonym));
        assert_eq!(checklist.to_accepted(synonym), coquereli);
        assert_eq!(checklist.synonyms(coquereli), vec![synonym]);
        // synonyms take the parent of their accepted record
        assert_eq!(checklist.parent(synonym), checklist.record_with_node_id("6").unwrap());
    }

    #[test]
    fn mutexes_increase_from_parent_to_child() {
        let checklist = load(PRIMATES);
        for node in checklist.all_nodes() {
            if checklist.is_accepted(node) && checklist.parent(node) != FOREST {
                assert!(
                    checklist.mutex(checklist.parent(node)) < checklist.mutex(node),
                    "mutex invariant violated at {}",
                    checklist.unique(node)
                );
            }
        }
    }

    #[test]
    fn offending_children_are_demoted() {
        // the genus claims the same rank as its parent family
        let csv = "\
taxonID,canonicalName,parentNameUsageID,taxonRank
1,Primates,,order
2,Cheirogaleidae,1,family
3,Microcebus,2,family
4,Microcebus murinus,3,species
";
        let checklist = load(csv);
        let family = checklist.record_with_node_id("2").unwrap();
        let genus = checklist.record_with_node_id("3").unwrap();
        let species = checklist.record_with_node_id("4").unwrap();
        assert!(checklist.mutex(family) < checklist.mutex(genus));
        assert!(checklist.mutex(genus) < checklist.mutex(species));
    }

    #[test]
    fn peers_mrca_and_disjointness() {
        let checklist = load(PRIMATES);
        let murinus = checklist.record_with_node_id("5").unwrap();
        let coquereli = checklist.record_with_node_id("7").unwrap();
        let cheirogaleidae = checklist.record_with_node_id("3").unwrap();
        let microcebus = checklist.record_with_node_id("4").unwrap();

        assert_eq!(checklist.mrca(murinus, coquereli), cheirogaleidae);
        assert_eq!(checklist.how_related(cheirogaleidae, murinus), Rcc5::Gt);
        assert_eq!(checklist.how_related(murinus, cheirogaleidae), Rcc5::Lt);
        assert!(checklist.are_disjoint(murinus, coquereli));
        assert!(checklist.are_disjoint(microcebus, checklist.record_with_node_id("6").unwrap()));
        assert!(!checklist.are_disjoint(microcebus, murinus));
    }

    #[test]
    fn sequence_numbers_follow_preorder() {
        let checklist = load(PRIMATES);
        let order = checklist.record_with_node_id("1").unwrap();
        let mirza = checklist.record_with_node_id("6").unwrap();
        let coquereli = checklist.record_with_node_id("7").unwrap();
        let synonym = checklist.record_with_node_id("8").unwrap();
        assert_eq!(checklist.sequence_number(order), 0);
        assert!(checklist.sequence_number(mirza) < checklist.sequence_number(coquereli));
        // a synonym follows directly on its accepted record
        assert_eq!(
            checklist.sequence_number(synonym),
            checklist.sequence_number(coquereli) + 1
        );
    }

    #[test]
    fn parent_cycles_are_fatal() {
        let csv = "\
taxonID,canonicalName,parentNameUsageID
1,Aus,2
2,Bus,1
";
        let mut registry = PropertyRegistry::new();
        let (columns, rows) = table::read_from(csv.as_bytes(), b',', &mut registry).unwrap();
        let result = Checklist::new("A", "test", columns, rows);
        assert!(matches!(result, Err(ParseError::ParentCycle(_))));
    }

    #[test]
    fn unique_names_disambiguate_and_mark_synonyms() {
        let checklist = load(PRIMATES);
        let synonym = checklist.record_with_node_id("8").unwrap();
        assert_eq!(checklist.unique(synonym), "A.?Microcebus_coquereli");
        let murinus = checklist.record_with_node_id("5").unwrap();
        assert_eq!(checklist.unique(murinus), "A.Microcebus_murinus");
    }

    #[test]
    fn containers_are_recognized_and_unranked() {
        let csv = "\
taxonID,canonicalName,parentNameUsageID,taxonRank
1,Primates,,order
2,unclassified Primates,1,genus
3,Aus bus,2,species
";
        let checklist = load(csv);
        let container = checklist.record_with_node_id("2").unwrap();
        assert!(checklist.is_container(container));
        assert_eq!(checklist.nominal_rank(container), None);
    }
}
