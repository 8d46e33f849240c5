//! Interned taxon record properties.
//!
//! Columns in a taxon table are identified either by a full URI or by the
//! short "pet" name at the end of it. Every property gets a specificity
//! index when it is first seen; the index is append-only and doubles as the
//! bit position used by property diffs, so low bits are the least specific
//! properties.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyId(pub u32);

/// The well-known properties, in seeding order. The indices are stable
/// because `PropertyRegistry::new` interns these before anything else.
pub const SOURCE: PropertyId = PropertyId(0);
pub const NOMENCLATURAL_STATUS: PropertyId = PropertyId(1);
pub const TAXONOMIC_STATUS: PropertyId = PropertyId(2);
pub const VERBATIM_TAXON_RANK: PropertyId = PropertyId(3);
pub const TAXON_RANK: PropertyId = PropertyId(4);
pub const SCIENTIFIC_NAME_AUTHORSHIP: PropertyId = PropertyId(5);
pub const NAME_ACCORDING_TO_ID: PropertyId = PropertyId(6);
pub const TAXON_ID: PropertyId = PropertyId(7);
pub const VERNACULAR_NAME: PropertyId = PropertyId(8);
pub const PARENT_NAME_USAGE_ID: PropertyId = PropertyId(9);
pub const NAME_PUBLISHED_IN_YEAR: PropertyId = PropertyId(10);
pub const SPECIFIC_EPITHET: PropertyId = PropertyId(11);
pub const INFRASPECIFIC_EPITHET: PropertyId = PropertyId(12);
pub const ACCEPTED_NAME_USAGE_ID: PropertyId = PropertyId(13);
pub const CANONICAL_NAME: PropertyId = PropertyId(14);
pub const SCIENTIFIC_NAME: PropertyId = PropertyId(15);
pub const TAXON_CONCEPT_ID: PropertyId = PropertyId(16);

const SEED_URIS: &[&str] = &[
    "http://purl.org/dc/terms/source",
    "http://rs.tdwg.org/dwc/terms/nomenclaturalStatus",
    "http://rs.tdwg.org/dwc/terms/taxonomicStatus",
    "http://rs.tdwg.org/dwc/terms/verbatimTaxonRank",
    "http://rs.tdwg.org/dwc/terms/taxonRank",
    "http://rs.tdwg.org/dwc/terms/scientificNameAuthorship",
    "http://rs.tdwg.org/dwc/terms/nameAccordingToID",
    "http://rs.tdwg.org/dwc/terms/taxonID",
    "http://rs.tdwg.org/dwc/terms/vernacularName",
    "http://rs.tdwg.org/dwc/terms/parentNameUsageID",
    "http://rs.tdwg.org/dwc/terms/namePublishedInYear",
    "http://rs.tdwg.org/dwc/terms/specificEpithet",
    "http://rs.tdwg.org/dwc/terms/infraspecificEpithet",
    "http://rs.tdwg.org/dwc/terms/acceptedNameUsageID",
    "http://rs.gbif.org/terms/1.0/canonicalName",
    "http://rs.tdwg.org/dwc/terms/scientificName",
    "http://rs.tdwg.org/dwc/terms/taxonConceptID",
];

#[derive(Debug, Clone)]
struct Selector {
    uri: String,
    pet_name: String,
}

#[derive(Debug)]
pub struct PropertyRegistry {
    selectors: Vec<Selector>,
    by_uri: HashMap<String, PropertyId>,
    by_name: HashMap<String, PropertyId>,
}

impl PropertyRegistry {
    pub fn new() -> PropertyRegistry {
        let mut registry = PropertyRegistry {
            selectors: Vec::new(),
            by_uri: HashMap::new(),
            by_name: HashMap::new(),
        };
        for uri in SEED_URIS {
            registry.intern_uri(uri);
        }
        registry
    }

    pub fn intern_uri(&mut self, uri: &str) -> PropertyId {
        if let Some(id) = self.by_uri.get(uri) {
            return *id;
        }
        let pet_name = pet_name(uri).to_string();
        let id = PropertyId(self.selectors.len() as u32);
        self.by_uri.insert(uri.to_string(), id);
        // the first property claiming a short name keeps it
        self.by_name.entry(pet_name.clone()).or_insert(id);
        self.selectors.push(Selector {
            uri: uri.to_string(),
            pet_name,
        });
        id
    }

    pub fn by_name(&self, name: &str) -> Option<PropertyId> {
        self.by_name.get(name).copied()
    }

    /// Resolve a header label to a property. Labels can be full URIs or
    /// short names; unknown labels are interned on sight so that every
    /// column of an input table is addressable.
    pub fn resolve(&mut self, label: &str) -> PropertyId {
        if let Some(id) = self.by_name(label) {
            return id;
        }
        if let Some(id) = self.by_uri.get(label) {
            return *id;
        }
        if label.contains('/') {
            self.intern_uri(label)
        } else {
            self.intern_uri(&format!("data:,property/{label}"))
        }
    }

    pub fn pet_name(&self, id: PropertyId) -> &str {
        &self.selectors[id.0 as usize].pet_name
    }

    pub fn uri(&self, id: PropertyId) -> &str {
        &self.selectors[id.0 as usize].uri
    }

    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    pub fn names(&self, set: PropertySet) -> Vec<&str> {
        set.iter().map(|id| self.pet_name(id)).collect()
    }
}

impl Default for PropertyRegistry {
    fn default() -> Self {
        PropertyRegistry::new()
    }
}

fn pet_name(uri: &str) -> &str {
    uri.rsplit('/').next().unwrap_or(uri)
}

/// A set of properties packed into a word by specificity index.
/// Properties past the word size are ignored; real taxon tables stay well
/// below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, PartialOrd, Ord)]
pub struct PropertySet(pub u64);

impl PropertySet {
    pub fn insert(&mut self, id: PropertyId) {
        if id.0 < 64 {
            self.0 |= 1 << id.0;
        }
    }

    pub fn contains(&self, id: PropertyId) -> bool {
        id.0 < 64 && self.0 & (1 << id.0) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = PropertyId> + '_ {
        (0..64).filter(|i| self.0 & (1 << i) != 0).map(PropertyId)
    }
}
