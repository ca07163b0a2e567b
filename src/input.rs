use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::error::{Result, SummaryError};

/// Open a text input, wrapping it in a `MultiGzDecoder` when the name ends in ".gz".
pub fn open_input<P: AsRef<Path>>(path: P) -> Result<Box<dyn BufRead>> {
    let path = path.as_ref();
    let f = File::open(path).map_err(|e| SummaryError::io(path, e))?;

    let is_gz = path
        .extension()
        .map(|ext| ext == "gz")
        .unwrap_or(false);

    let reader: Box<dyn BufRead> = if is_gz {
        Box::new(BufReader::new(MultiGzDecoder::new(f)))
    } else {
        Box::new(BufReader::new(f))
    };
    Ok(reader)
}

/// Iterate the lines of an input with their 1-based line numbers.
/// Read errors are tagged with the file they came from.
pub fn numbered_lines<'a>(
    path: &'a Path,
    reader: Box<dyn BufRead>,
) -> impl Iterator<Item = Result<(usize, String)>> + 'a {
    reader
        .lines()
        .enumerate()
        .map(move |(idx, line)| {
            line.map(|l| (idx + 1, l))
                .map_err(|e| SummaryError::io(path, e))
        })
}
