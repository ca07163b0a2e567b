//src/types.rs

use ahash::AHashMap;
use indexmap::IndexMap;

/// taxid -> display name
pub type NameMap = AHashMap<String, String>;
/// taxid -> node
pub type NodeMap = AHashMap<String, TaxNode>;
/// species taxid -> read count, in the order species were first seen
pub type SpeciesCounts = IndexMap<String, u64>;

/// One node of the taxonomy tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxNode {
    pub tax_id: String,
    /// `None` for injected nodes; roots may also point at themselves.
    pub parent_id: Option<String>,
    pub rank: String,
}

impl TaxNode {
    pub fn is_species(&self) -> bool {
        self.rank == "species"
    }

    /// True when the walk upwards has nowhere left to go.
    pub fn is_root(&self) -> bool {
        match &self.parent_id {
            None => true,
            Some(parent) => parent == &self.tax_id,
        }
    }
}

/// One row of a Centrifuge per-read classification report:
///  readID  seqID  taxID  score  2ndBestScore  hitLength  queryLength  numMatches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadRecord {
    pub read_id: String,
    pub seq_id: String,
    pub tax_id: String,
    pub first_score: String,
    pub second_score: String,
    pub hit_len: String,
    pub query_len: String,
    pub num_matches: String,
}

impl ReadRecord {
    pub const FIELD_COUNT: usize = 8;

    pub fn is_unclassified(&self) -> bool {
        self.seq_id == "unclassified"
    }
}

/// A structured representation of one row in the species table.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesRow {
    pub name: String,
    pub tax_id: String,
    pub count: u64,
    /// Percentage of all report rows, rounded to 4 decimals.
    pub relab: f64,
}
