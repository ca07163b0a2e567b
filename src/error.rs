//src/error.rs

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can abort a summary run. None of these are recovered from.
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("input file {} does not exist", .0.display())]
    MissingFile(PathBuf),

    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed line {line} in {}: expected {expected} fields, found {found}", .path.display())]
    Format {
        path: PathBuf,
        line: usize,
        expected: String,
        found: usize,
    },

    #[error("classification report {} has no header line", .0.display())]
    MissingHeader(PathBuf),

    #[error("duplicate taxonomic id {tax_id} on line {line} of {}", .path.display())]
    DuplicateKey {
        path: PathBuf,
        line: usize,
        tax_id: String,
    },

    #[error("taxonomic id {0} is not in the nodes table")]
    KeyLookup(String),

    #[error("species {0} has no entry in the names table")]
    NameLookup(String),

    #[error("parent chain starting at {0} never reaches a root")]
    TaxonomyCycle(String),
}

impl SummaryError {
    pub(crate) fn io<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        SummaryError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SummaryError>;
