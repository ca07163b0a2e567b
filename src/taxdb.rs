//src/taxdb.rs

use std::path::Path;

use crate::error::{Result, SummaryError};
use crate::input::{numbered_lines, open_input};
use crate::types::{NameMap, NodeMap, TaxNode};

/// Species present in the 12/06/2016 Centrifuge p+h+v database but missing
/// from the taxonomy tree that `centrifuge-inspect` emits for it.
pub const MISSING_NODES: &[(&str, &str)] = &[
    ("1916956", "Synechococcus sp. SynAce01"),
    ("1921421", "Bacillus sp. JF8"),
];

const NODE_FIELD_SEP: &str = "\t|\t";

/// Parses a name table in the format:
/// ```text
/// <taxid>\t<name>
/// ```
/// as written by `centrifuge-inspect --name-table`.
pub fn load_names<P: AsRef<Path>>(filepath: P) -> Result<NameMap> {
    let path = filepath.as_ref();
    let reader = open_input(path)?;
    let mut names = NameMap::new();

    for line in numbered_lines(path, reader) {
        let (line_no, line) = line?;
        let parts: Vec<&str> = line.trim_end().split('\t').collect();
        if parts.len() != 2 {
            return Err(SummaryError::Format {
                path: path.to_path_buf(),
                line: line_no,
                expected: "2".to_string(),
                found: parts.len(),
            });
        }

        let tax_id = parts[0];
        if names.contains_key(tax_id) {
            return Err(SummaryError::DuplicateKey {
                path: path.to_path_buf(),
                line: line_no,
                tax_id: tax_id.to_string(),
            });
        }
        names.insert(tax_id.to_string(), parts[1].to_string());
    }

    log::info!("loaded {} names from {}", names.len(), path.display());
    Ok(names)
}

/// Parses a taxonomy tree in the format:
/// ```text
/// <taxid>\t|\t<parentid>\t|\t<rank>[\t|\t...]
/// ```
/// as written by `centrifuge-inspect --taxonomy-tree`. Columns past the rank
/// are ignored, as is an NCBI-style trailing `\t|`.
///
/// A taxid seen twice keeps its last definition.
pub fn load_nodes<P: AsRef<Path>>(filepath: P) -> Result<NodeMap> {
    let path = filepath.as_ref();
    let reader = open_input(path)?;
    let mut nodes = NodeMap::new();

    for line in numbered_lines(path, reader) {
        let (line_no, line) = line?;
        let line = line.trim_end();
        let line = line.strip_suffix("\t|").unwrap_or(line);
        let parts: Vec<&str> = line.split(NODE_FIELD_SEP).collect();
        if parts.len() < 3 {
            return Err(SummaryError::Format {
                path: path.to_path_buf(),
                line: line_no,
                expected: "at least 3".to_string(),
                found: parts.len(),
            });
        }

        let node = TaxNode {
            tax_id: parts[0].to_string(),
            parent_id: Some(parts[1].to_string()),
            rank: parts[2].to_string(),
        };
        if let Some(old) = nodes.insert(node.tax_id.clone(), node) {
            log::warn!(
                "taxid {} redefined on line {} of {}, keeping the later entry",
                old.tax_id,
                line_no,
                path.display()
            );
        }
    }

    log::info!("loaded {} nodes from {}", nodes.len(), path.display());
    Ok(nodes)
}

/// Overwrite every `(taxid, name)` patch in both tables with a parentless
/// species node. Existing entries for those ids are replaced, not merged.
pub fn apply_corrections(names: &mut NameMap, nodes: &mut NodeMap, patches: &[(&str, &str)]) {
    for &(tax_id, name) in patches {
        names.insert(tax_id.to_string(), name.to_string());
        nodes.insert(
            tax_id.to_string(),
            TaxNode {
                tax_id: tax_id.to_string(),
                parent_id: None,
                rank: "species".to_string(),
            },
        );
        log::debug!("injected species node {tax_id} ({name})");
    }
}

/// Walk up from `tax_id` and return the first node (itself included) whose
/// rank is "species". Returns `Ok(None)` once a root is reached without one.
pub fn find_species_rank(nodes: &NodeMap, tax_id: &str) -> Result<Option<String>> {
    let mut current = tax_id;
    // Any walk longer than the table itself is going round in circles.
    for _ in 0..=nodes.len() {
        let node = nodes
            .get(current)
            .ok_or_else(|| SummaryError::KeyLookup(current.to_string()))?;
        if node.is_species() {
            return Ok(Some(node.tax_id.clone()));
        }
        if node.is_root() {
            return Ok(None);
        }
        match &node.parent_id {
            Some(parent) => current = parent,
            None => return Ok(None),
        }
    }
    Err(SummaryError::TaxonomyCycle(tax_id.to_string()))
}
