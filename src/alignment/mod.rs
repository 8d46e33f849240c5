//! The alignment engine.
//!
//! Given two checklists sharing neither identifiers nor topology, compute
//! for each node the best-justified counterpart on the other side. Surface
//! evidence (canonical names, shared identifiers) seeds a mutually-unique
//! matched frontier (the fringe); cross-MRCAs lift the frontier to internal
//! nodes; a pair classifier turns the lifted correspondences into RCC-5
//! verdicts; and a scoring pass reduces the candidates to one winner per
//! node, or reports the ambiguity.
//!
//! All memo tables live in the `Aligner` value; nothing is process-global.

use std::cell::RefCell;
use std::collections::HashMap;

use tracing::info;

use crate::articulation::Articulation;
use crate::checklist::{Duo, NodeId, NodeRef, Side};

pub mod best;
pub mod direct;
pub mod fringe;
pub mod topology;

pub struct Aligner<'a> {
    pub duo: &'a Duo<'a>,
    pub share_ids: bool,
    pub(crate) fringe: [Vec<bool>; 2],
    pub(crate) covered: [Vec<bool>; 2],
    pub(crate) cross_mrcas: HashMap<NodeRef, NodeRef>,
    pub(crate) name_cache: RefCell<HashMap<NodeRef, Vec<Articulation>>>,
    pub(crate) best_cache: RefCell<HashMap<NodeRef, BestMatch>>,
}

impl<'a> Aligner<'a> {
    pub fn new(duo: &'a Duo<'a>, share_ids: bool) -> Aligner<'a> {
        Aligner {
            duo,
            share_ids,
            fringe: [Vec::new(), Vec::new()],
            covered: [Vec::new(), Vec::new()],
            cross_mrcas: HashMap::new(),
            name_cache: RefCell::new(HashMap::new()),
            best_cache: RefCell::new(HashMap::new()),
        }
    }

    /// Run the analysis phases. Must precede any matching query.
    pub fn analyze(&mut self) {
        fringe::analyze(self);
        topology::analyze_cross_mrcas(self);
        info!(
            fringe = self.fringe.iter().map(|side| side.iter().filter(|f| **f).count()).sum::<usize>(),
            cross_mrcas = self.cross_mrcas.len(),
            "alignment substrate ready"
        );
    }

    pub fn is_fringe(&self, node: NodeRef) -> bool {
        self.fringe[node.side.index()]
            .get(node.id as usize)
            .copied()
            .unwrap_or(false)
    }

    /// A node is covered when every branch of its subtree carries aligned
    /// content; uncovered branches are residue with no counterpart on the
    /// other side.
    pub fn is_covered(&self, node: NodeRef) -> bool {
        self.covered[node.side.index()]
            .get(node.id as usize)
            .copied()
            .unwrap_or(false)
    }

    pub fn has_residue(&self, node: NodeRef) -> bool {
        !self.is_covered(node)
    }

    /// The stored cross-MRCA of an internal node.
    pub fn cross_mrca(&self, node: NodeRef) -> Option<NodeRef> {
        self.cross_mrcas.get(&node).copied()
    }

    /// The region on the other side holding this node's aligned content:
    /// its fringe image when it is mutually fringe-matched, its cross-MRCA
    /// otherwise.
    pub fn cross_mrca_or_fringe(&self, node: NodeRef) -> Option<NodeRef> {
        if let Some(m) = self.mutual_fringe_match(node) {
            return Some(m.cod);
        }
        self.cross_mrca(node)
    }

    /// The single direct match of a fringe node, provided its target is on
    /// the fringe too.
    pub fn best_fringe_match(&self, node: NodeRef) -> Option<Articulation> {
        if !self.is_fringe(node) {
            return None;
        }
        direct::direct_matches(self.duo, self.share_ids, node)
            .into_iter()
            .find(|m| self.is_fringe(m.cod))
    }

    /// A fringe match accepted only when best in both directions.
    pub fn mutual_fringe_match(&self, node: NodeRef) -> Option<Articulation> {
        let forward = self.best_fringe_match(node)?;
        let back = self.best_fringe_match(forward.cod)?;
        if back.cod == node {
            Some(forward)
        } else {
            None
        }
    }

    pub fn best_match(&self, node: NodeRef) -> BestMatch {
        best::best_match(self, node)
    }

    /// Compute the one-best alignment over every accepted node of both
    /// checklists.
    pub fn alignment(&self) -> Alignment {
        let mut best = HashMap::new();
        let mut ambiguous = HashMap::new();
        for side in [Side::A, Side::B] {
            for id in self.duo.checklist(side).all_nodes() {
                let node = NodeRef::new(side, id as NodeId);
                if !self.duo.is_accepted(node) {
                    continue;
                }
                match self.best_match(node) {
                    BestMatch::One(articulation) => {
                        best.insert(node, articulation);
                    }
                    BestMatch::Multiple(candidates) => {
                        ambiguous.insert(node, candidates);
                    }
                    BestMatch::None => {}
                }
            }
        }
        info!(matched = best.len(), ambiguous = ambiguous.len(), "alignment computed");
        Alignment { best, ambiguous }
    }
}

/// Outcome of best-match selection for one node. Ties on every criterion
/// are reported, never broken by guessing.
#[derive(Debug, Clone)]
pub enum BestMatch {
    One(Articulation),
    Multiple(Vec<Articulation>),
    None,
}

impl BestMatch {
    pub fn one(&self) -> Option<&Articulation> {
        match self {
            BestMatch::One(articulation) => Some(articulation),
            _ => None,
        }
    }
}

/// The one-best alignment over both checklists.
pub struct Alignment {
    pub best: HashMap<NodeRef, Articulation>,
    pub ambiguous: HashMap<NodeRef, Vec<Articulation>>,
}

impl Alignment {
    pub fn get(&self, node: NodeRef) -> Option<&Articulation> {
        self.best.get(&node)
    }

    pub fn cod(&self, node: NodeRef) -> Option<NodeRef> {
        self.best.get(&node).map(|articulation| articulation.cod)
    }

    /// Both sides name each other as best.
    pub fn is_mutual(&self, x: NodeRef, y: NodeRef) -> bool {
        self.cod(x) == Some(y) && self.cod(y) == Some(x)
    }
}
