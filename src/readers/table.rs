//! Reading separator-delimited taxon tables.
//!
//! The header names columns by URI or short name; both resolve through the
//! property registry. Empty cells become absent values so that "no parent"
//! and "accepted" read uniformly downstream.

use std::fs::File;
use std::path::{Path, PathBuf};

use crate::errors::{Error, ParseError};
use crate::properties::{PropertyId, PropertyRegistry};

const TAXON_FILE_NAMES: &[&str] = &[
    "taxon.tsv",
    "Taxon.tsv",
    "taxon.tab",
    "Taxon.tab",
    "taxa.txt",
    "taxon.txt",
    "Taxon.txt",
];

/// Look for a conventionally named taxon table inside a directory.
pub fn discover_taxon_file(dir: &Path) -> Result<PathBuf, ParseError> {
    for name in TAXON_FILE_NAMES {
        let path = dir.join(name);
        if path.exists() {
            return Ok(path);
        }
    }
    Err(ParseError::FileNotFound(dir.display().to_string()))
}

fn delimiter_for(path: &Path) -> u8 {
    match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => b',',
        _ => b'\t',
    }
}

pub fn read_table(path: &Path, registry: &mut PropertyRegistry) -> Result<(Vec<PropertyId>, Rows), Error> {
    let file = File::open(path)?;
    read_from(file, delimiter_for(path), registry)
}

pub type Rows = Vec<Vec<Option<String>>>;

pub fn read_from<R: std::io::Read>(
    reader: R,
    delimiter: u8,
    registry: &mut PropertyRegistry,
) -> Result<(Vec<PropertyId>, Rows), Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<PropertyId> = reader
        .headers()?
        .iter()
        .map(|label| registry.resolve(label.trim()))
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row: Vec<Option<String>> = Vec::with_capacity(columns.len());
        for position in 0..columns.len() {
            let value = record.get(position).map(str::trim).unwrap_or("");
            row.push(if value.is_empty() { None } else { Some(value.to_string()) });
        }
        rows.push(row);
    }

    Ok((columns, rows))
}
