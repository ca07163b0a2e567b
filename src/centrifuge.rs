//src/centrifuge.rs

use std::io::{BufRead, Lines};
use std::iter::Enumerate;
use std::path::{Path, PathBuf};

use crate::error::{Result, SummaryError};
use crate::input::open_input;
use crate::taxdb::find_species_rank;
use crate::types::{NodeMap, ReadRecord, SpeciesCounts};

/// Streams `ReadRecord`s out of a Centrifuge classification report.
/// The header line is consumed by `open`.
pub struct ReportReader {
    path: PathBuf,
    lines: Enumerate<Lines<Box<dyn BufRead>>>,
}

impl ReportReader {
    pub fn open<P: AsRef<Path>>(filepath: P) -> Result<Self> {
        let path = filepath.as_ref().to_path_buf();
        let mut lines = open_input(&path)?.lines().enumerate();

        match lines.next() {
            Some((_, Ok(_header))) => {}
            Some((_, Err(e))) => return Err(SummaryError::io(path, e)),
            None => return Err(SummaryError::MissingHeader(path)),
        }

        Ok(Self { path, lines })
    }

    fn parse_line(&self, line_no: usize, line: &str) -> Result<ReadRecord> {
        let fields: Vec<&str> = line.trim_end().split('\t').collect();
        if fields.len() != ReadRecord::FIELD_COUNT {
            return Err(SummaryError::Format {
                path: self.path.clone(),
                line: line_no,
                expected: ReadRecord::FIELD_COUNT.to_string(),
                found: fields.len(),
            });
        }

        Ok(ReadRecord {
            read_id: fields[0].to_string(),
            seq_id: fields[1].to_string(),
            tax_id: fields[2].to_string(),
            first_score: fields[3].to_string(),
            second_score: fields[4].to_string(),
            hit_len: fields[5].to_string(),
            query_len: fields[6].to_string(),
            num_matches: fields[7].to_string(),
        })
    }
}

impl Iterator for ReportReader {
    type Item = Result<ReadRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let (idx, line) = self.lines.next()?;
        Some(match line {
            Ok(line) => self.parse_line(idx + 1, &line),
            Err(e) => Err(SummaryError::io(&self.path, e)),
        })
    }
}

/// Counts gathered from one pass over a report.
#[derive(Debug, Clone, Default)]
pub struct AggregateOutcome {
    pub species_counts: SpeciesCounts,
    /// Every data row, whatever its fate. This is the relab denominator.
    pub total_reads: u64,
    pub classified_reads: u64,
    /// Classified reads with no species anywhere above them.
    pub unresolved_reads: u64,
}

impl AggregateOutcome {
    /// Fold one read into the counts.
    pub fn add_read(&mut self, nodes: &NodeMap, read: &ReadRecord) -> Result<()> {
        self.total_reads += 1;
        if read.is_unclassified() {
            return Ok(());
        }
        self.classified_reads += 1;

        match find_species_rank(nodes, &read.tax_id)? {
            Some(species_tid) => *self.species_counts.entry(species_tid).or_insert(0) += 1,
            None => self.unresolved_reads += 1,
        }
        Ok(())
    }

    pub fn assigned_reads(&self) -> u64 {
        self.species_counts.values().sum()
    }
}

/// Summarise a whole report to species level against `nodes`.
pub fn aggregate_species<P: AsRef<Path>>(report_path: P, nodes: &NodeMap) -> Result<AggregateOutcome> {
    let report_path = report_path.as_ref();
    let mut outcome = AggregateOutcome::default();

    for read in ReportReader::open(report_path)? {
        outcome.add_read(nodes, &read?)?;
    }

    log::info!(
        "{}: {} reads, {} classified, {} assigned to {} species, {} without a species ancestor",
        report_path.display(),
        outcome.total_reads,
        outcome.classified_reads,
        outcome.assigned_reads(),
        outcome.species_counts.len(),
        outcome.unresolved_reads
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaxNode;
    use std::fs;

    const HEADER: &str =
        "readID\tseqID\ttaxID\tscore\t2ndBestScore\thitLength\tqueryLength\tnumMatches\n";

    fn nodes() -> NodeMap {
        [
            ("1", Some("1"), "no rank"),
            ("561", Some("1"), "genus"),
            ("562", Some("561"), "species"),
            ("83333", Some("562"), "strain"),
            ("9606", Some("1"), "species"),
        ]
        .iter()
        .map(|&(tax_id, parent_id, rank)| {
            (
                tax_id.to_string(),
                TaxNode {
                    tax_id: tax_id.to_string(),
                    parent_id: parent_id.map(str::to_string),
                    rank: rank.to_string(),
                },
            )
        })
        .collect()
    }

    fn write_report(dir: &Path, rows: &[&str]) -> PathBuf {
        let path = dir.join("report.tsv");
        let mut text = HEADER.to_string();
        for row in rows {
            text.push_str(row);
            text.push('\n');
        }
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_report_reader_parses_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(dir.path(), &["r1\tNC_000913\t562\t961\t0\t46\t150\t1"]);

        let records: Vec<ReadRecord> = ReportReader::open(&path)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].read_id, "r1");
        assert_eq!(records[0].seq_id, "NC_000913");
        assert_eq!(records[0].tax_id, "562");
        assert_eq!(records[0].hit_len, "46");
        assert_eq!(records[0].num_matches, "1");
    }

    #[test]
    fn test_report_without_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.tsv");
        fs::write(&path, "").unwrap();
        assert!(matches!(
            ReportReader::open(&path),
            Err(SummaryError::MissingHeader(_))
        ));
    }

    #[test]
    fn test_aggregate_counts_species() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(
            dir.path(),
            &[
                "r1\tNC_000913\t83333\t961\t0\t46\t150\t1",
                "r2\tNC_000913\t562\t961\t0\t46\t150\t1",
                "r3\tunclassified\t0\t0\t0\t0\t150\t1",
                "r4\tseq\t561\t100\t90\t30\t150\t2",
                "r5\tchr1\t9606\t400\t0\t35\t150\t1",
            ],
        );

        let outcome = aggregate_species(&path, &nodes()).unwrap();
        assert_eq!(outcome.total_reads, 5);
        assert_eq!(outcome.classified_reads, 4);
        assert_eq!(outcome.unresolved_reads, 1);
        assert_eq!(outcome.assigned_reads(), 3);

        let counts: Vec<(&str, u64)> = outcome
            .species_counts
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        assert_eq!(counts, vec![("562", 2), ("9606", 1)]);
    }

    #[test]
    fn test_unclassified_reads_only_count_towards_total() {
        let dir = tempfile::tempdir().unwrap();
        // The unclassified row names a taxid that does not exist; it must never be looked up.
        let path = write_report(
            dir.path(),
            &[
                "r1\tunclassified\tno-such-taxid\t0\t0\t0\t150\t1",
                "r2\tunclassified\tno-such-taxid\t0\t0\t0\t150\t1",
            ],
        );

        let outcome = aggregate_species(&path, &nodes()).unwrap();
        assert_eq!(outcome.total_reads, 2);
        assert_eq!(outcome.classified_reads, 0);
        assert!(outcome.species_counts.is_empty());
    }

    #[test]
    fn test_row_with_seven_fields_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(
            dir.path(),
            &[
                "r1\tNC_000913\t562\t961\t0\t46\t150\t1",
                "r2\tNC_000913\t562\t961\t0\t46\t150",
            ],
        );

        match aggregate_species(&path, &nodes()) {
            Err(SummaryError::Format { line, expected, found, .. }) => {
                assert_eq!(line, 3);
                assert_eq!(expected, "8");
                assert_eq!(found, 7);
            }
            other => panic!("expected format error, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_taxid_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(dir.path(), &["r1\tseq\t31337\t961\t0\t46\t150\t1"]);
        assert!(matches!(
            aggregate_species(&path, &nodes()),
            Err(SummaryError::KeyLookup(tax_id)) if tax_id == "31337"
        ));
    }
}
