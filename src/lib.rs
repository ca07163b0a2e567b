// src/lib.rs
pub mod types;
pub mod error;
pub mod input;
pub mod taxdb;
pub mod centrifuge;
pub mod species_stats;

use std::path::Path;

pub use crate::error::{Result, SummaryError};
use crate::centrifuge::aggregate_species;
use crate::species_stats::{build_species_rows, render_species_table, write_species_table};
use crate::taxdb::{apply_corrections, load_names, load_nodes};
use crate::types::{SpeciesCounts, SpeciesRow};

pub use crate::taxdb::MISSING_NODES;

/// The three inputs of a summary run.
#[derive(Debug, Clone, Copy)]
pub struct InputPaths<'a> {
    pub nodes: &'a Path,
    pub names: &'a Path,
    pub centrifuge: &'a Path,
}

impl InputPaths<'_> {
    /// Fail on the first path that does not exist, before anything is read.
    pub fn check_exist(&self) -> Result<()> {
        for path in [self.nodes, self.names, self.centrifuge] {
            if !path.exists() {
                return Err(SummaryError::MissingFile(path.to_path_buf()));
            }
        }
        Ok(())
    }
}

/// Result of summarising one classification report at species level.
#[derive(Debug, Clone)]
pub struct SpeciesSummary {
    /// One row per species, in the order species were first seen in the report
    pub rows: Vec<SpeciesRow>,
    pub species_counts: SpeciesCounts,

    pub total_reads: u64,
    pub classified_reads: u64,
    pub unresolved_reads: u64,
}

impl SpeciesSummary {
    /// Generate the tab-separated table text on demand
    pub fn get_species_table(&self) -> String {
        render_species_table(&self.rows)
    }

    pub fn write_table<W: std::io::Write>(&self, out: &mut W) -> std::io::Result<()> {
        write_species_table(out, &self.rows)
    }
}

/// Load names and nodes, patch in `patches`, and summarise the report.
pub fn summarise_species(paths: &InputPaths<'_>, patches: &[(&str, &str)]) -> Result<SpeciesSummary> {
    paths.check_exist()?;

    // 1. Name table
    let mut names = load_names(paths.names)?;

    // 2. Taxonomy tree, then the corrective species nodes
    let mut nodes = load_nodes(paths.nodes)?;
    apply_corrections(&mut names, &mut nodes, patches);

    // 3. One pass over the report
    let outcome = aggregate_species(paths.centrifuge, &nodes)?;

    // 4. Table rows (fails before anything is written if a name is missing)
    let rows = build_species_rows(&outcome.species_counts, &names, outcome.total_reads)?;

    Ok(SpeciesSummary {
        rows,
        species_counts: outcome.species_counts,
        total_reads: outcome.total_reads,
        classified_reads: outcome.classified_reads,
        unresolved_reads: outcome.unresolved_reads,
    })
}
