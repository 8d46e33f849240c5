use std::path::Path;

use crate::checklist::Checklist;
use crate::errors::Error;
use crate::properties::PropertyRegistry;

pub mod bracket;
pub mod table;

/// Read a checklist from a specifier: an inline parenthesized tree, a
/// directory holding a taxon table, or a taxon table file.
pub fn read_checklist(
    specifier: &str,
    tag: &str,
    name: &str,
    registry: &mut PropertyRegistry,
) -> Result<Checklist, Error> {
    let (columns, rows) = if specifier.ends_with(')') {
        bracket::parse(specifier, registry)?
    } else {
        let path = Path::new(specifier);
        let path = if path.is_dir() {
            table::discover_taxon_file(path)?
        } else {
            path.to_path_buf()
        };
        table::read_table(&path, registry)?
    };
    Ok(Checklist::new(tag, name, columns, rows)?)
}
