//! The RCC-5 relation algebra.
//!
//! Five atoms relate any two taxa by extension: equal, proper part,
//! proper container, disjoint, and conflict (overlap without containment).
//! The engine works with *variants*: an atom refined with a display name
//! and a badness rank recording how strong the evidence for it is. Lower
//! badness means stronger evidence, and the badness order is the sole
//! criterion of the first pruning pass in the best-match selector.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rcc5 {
    Eq,
    Lt,
    Gt,
    Disjoint,
    Conflict,
}

impl Rcc5 {
    pub fn symbol(self) -> &'static str {
        match self {
            Rcc5::Eq => "=",
            Rcc5::Lt => "<",
            Rcc5::Gt => ">",
            Rcc5::Disjoint => "!",
            Rcc5::Conflict => "><",
        }
    }

    pub fn reverse(self) -> Rcc5 {
        match self {
            Rcc5::Lt => Rcc5::Gt,
            Rcc5::Gt => Rcc5::Lt,
            other => other,
        }
    }

    // finer relations sort earlier
    fn order(self) -> u8 {
        match self {
            Rcc5::Eq => 0,
            Rcc5::Lt => 1,
            Rcc5::Gt => 2,
            Rcc5::Conflict => 3,
            Rcc5::Disjoint => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    pub atom: Rcc5,
    pub badness: u32,
    pub name: &'static str,
    pub revname: &'static str,
}

impl Relation {
    pub const fn variant(atom: Rcc5, badness: u32, name: &'static str, revname: &'static str) -> Relation {
        Relation {
            atom,
            badness,
            name,
            revname,
        }
    }

    pub fn reverse(self) -> Relation {
        Relation {
            atom: self.atom.reverse(),
            badness: self.badness,
            name: self.revname,
            revname: self.name,
        }
    }

    pub fn is_variant(self, atom: Rcc5) -> bool {
        self.atom == atom
    }

    /// Badness first, atom second.
    pub fn sort_key(self) -> (u32, u8) {
        (self.badness, self.atom.order())
    }

    fn is_plain_eq(self) -> bool {
        self.atom == Rcc5::Eq && self.badness == 0
    }
}

// The unrefined atoms.
pub const EQ: Relation = Relation::variant(Rcc5::Eq, 0, "=", "=");
pub const LT: Relation = Relation::variant(Rcc5::Lt, 0, "<", ">");
pub const GT: Relation = Relation::variant(Rcc5::Gt, 0, ">", "<");
pub const DISJOINT: Relation = Relation::variant(Rcc5::Disjoint, 0, "!", "!");
pub const CONFLICT: Relation = Relation::variant(Rcc5::Conflict, 0, "><", "><");

// Topology-and-name agreement bests everything.
pub const FRINGE_NAME_EQ: Relation = Relation::variant(Rcc5::Eq, 8, "fringe=+name=", "fringe=+name=");
pub const FRINGE_NAME_LT: Relation = Relation::variant(Rcc5::Lt, 9, "fringe<+name=", "fringe>+name=");
pub const FRINGE_NAME_GT: Relation = Relation::variant(Rcc5::Gt, 9, "fringe>+name=", "fringe<+name=");

// Topology alone.
pub const FRINGE_EQ: Relation = Relation::variant(Rcc5::Eq, 10, "fringe=", "fringe=");
pub const FRINGE_NAME_CONFLICT: Relation =
    Relation::variant(Rcc5::Conflict, 11, "fringe-conflict+name=", "fringe-conflict+name=");
pub const FRINGE_LT: Relation = Relation::variant(Rcc5::Lt, 12, "fringe<", "fringe>");
pub const FRINGE_GT: Relation = Relation::variant(Rcc5::Gt, 12, "fringe>", "fringe<");
pub const FRINGE_CONFLICT: Relation = Relation::variant(Rcc5::Conflict, 13, "fringe-conflict", "fringe-conflict");
pub const FRINGE_DISJOINT: Relation = Relation::variant(Rcc5::Disjoint, 14, "fringe-disjoint", "fringe-disjoint");

// Surface identifiers alone.
pub const SAME_NAME_AND_ID: Relation = Relation::variant(Rcc5::Eq, 30, "name=+id=", "name=+id=");
pub const SAME_NAME: Relation = Relation::variant(Rcc5::Eq, 31, "name=", "name=");
pub const SAME_ID: Relation = Relation::variant(Rcc5::Eq, 32, "id=", "id=");

/// The RCC-5 composition table, where it refines to a single atom.
/// Pairs whose composition is ambiguous have no entry.
fn compose_atoms(a: Rcc5, b: Rcc5) -> Option<Rcc5> {
    use Rcc5::*;
    match (a, b) {
        (Eq, other) => Some(other),
        (other, Eq) => Some(other),
        (Lt, Lt) => Some(Lt),
        (Gt, Gt) => Some(Gt),
        (Lt, Disjoint) => Some(Disjoint),
        (Disjoint, Gt) => Some(Disjoint),
        _ => None,
    }
}

pub fn composable(p: Relation, q: Relation) -> bool {
    compose_atoms(p.atom, q.atom).is_some()
}

/// Compose two relations along a shared middle node. A plain `=` is the
/// identity; otherwise the result is the table atom carrying the worse
/// badness of the two operands.
pub fn compose(p: Relation, q: Relation) -> Option<Relation> {
    if p.is_plain_eq() {
        return Some(q);
    }
    if q.is_plain_eq() {
        return Some(p);
    }
    let atom = compose_atoms(p.atom, q.atom)?;
    Some(Relation {
        atom,
        badness: p.badness.max(q.badness),
        name: atom.symbol(),
        revname: atom.reverse().symbol(),
    })
}

pub fn conjoinable(p: Relation, q: Relation) -> bool {
    p.atom == q.atom || p.is_plain_eq() || q.is_plain_eq()
}

/// Conjoin two relations asserted of the same pair of taxa: both must
/// refine the same atom, or one must be the unrefined `=`. The result is
/// the better-evidenced operand.
pub fn conjoin(p: Relation, q: Relation) -> Option<Relation> {
    if p.atom == q.atom {
        Some(if p.badness <= q.badness { p } else { q })
    } else if p.is_plain_eq() {
        Some(q)
    } else if q.is_plain_eq() {
        Some(p)
    } else {
        None
    }
}
