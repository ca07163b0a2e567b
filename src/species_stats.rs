// src/species_stats.rs

use std::io::{self, Write};

use crate::error::{Result, SummaryError};
use crate::types::{NameMap, SpeciesCounts, SpeciesRow};

pub const TABLE_HEADER: [&str; 4] = ["species", "taxonomic_id", "count", "relab"];

/// Percentage of `total` that `count` makes up, rounded to 4 decimals.
/// Rounding works on the exact binary value with ties going to even,
/// so 1 of 3200 reads is 0.0312, not 0.0313.
pub fn relative_abundance(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let pct = count as f64 / total as f64 * 100.0;
    format!("{:.4}", pct).parse().unwrap_or(pct)
}

/// Shortest decimal that round-trips, always with a fractional part
/// (`100.0`, `33.3333`, `0.0001`).
pub fn format_relab(relab: f64) -> String {
    format!("{:?}", relab)
}

/// Turn the aggregate into table rows, keeping first-seen order.
/// Every species must have a name; the first one without aborts the table.
pub fn build_species_rows(
    species_counts: &SpeciesCounts,
    names: &NameMap,
    total_reads: u64,
) -> Result<Vec<SpeciesRow>> {
    species_counts
        .iter()
        .map(|(tax_id, &count)| {
            let name = names
                .get(tax_id)
                .ok_or_else(|| SummaryError::NameLookup(tax_id.clone()))?;
            Ok(SpeciesRow {
                name: name.clone(),
                tax_id: tax_id.clone(),
                count,
                relab: relative_abundance(count, total_reads),
            })
        })
        .collect()
}

/// Render the table, header included, as one string.
pub fn render_species_table(rows: &[SpeciesRow]) -> String {
    let mut output = String::new();
    output.push_str(&TABLE_HEADER.join("\t"));
    output.push('\n');

    for row in rows {
        output.push_str(&format!(
            "{}\t{}\t{}\t{}\n",
            row.name,
            row.tax_id,
            row.count,
            format_relab(row.relab)
        ));
    }
    output
}

pub fn write_species_table<W: Write>(out: &mut W, rows: &[SpeciesRow]) -> io::Result<()> {
    out.write_all(render_species_table(rows).as_bytes())?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, tax_id: &str, count: u64, relab: f64) -> SpeciesRow {
        SpeciesRow {
            name: name.to_string(),
            tax_id: tax_id.to_string(),
            count,
            relab,
        }
    }

    #[test]
    fn test_relative_abundance_rounding() {
        assert_eq!(relative_abundance(1, 1), 100.0);
        assert_eq!(relative_abundance(1, 3), 33.3333);
        assert_eq!(relative_abundance(2, 3), 66.6667);
        assert_eq!(relative_abundance(1, 1_000_000), 0.0001);
        assert_eq!(relative_abundance(0, 0), 0.0);
    }

    #[test]
    fn test_relative_abundance_ties_round_to_even() {
        assert_eq!(relative_abundance(1, 3200), 0.0312);
        assert_eq!(relative_abundance(11, 1408), 0.7812);
        assert_eq!(relative_abundance(13, 3200), 0.4062);
        assert_eq!(format_relab(relative_abundance(1, 3200)), "0.0312");
    }

    #[test]
    fn test_format_relab() {
        assert_eq!(format_relab(100.0), "100.0");
        assert_eq!(format_relab(33.3333), "33.3333");
        assert_eq!(format_relab(0.0001), "0.0001");
        assert_eq!(format_relab(12.5), "12.5");
    }

    #[test]
    fn test_build_rows_keeps_insertion_order() {
        let mut counts = SpeciesCounts::new();
        counts.insert("9606".to_string(), 3);
        counts.insert("562".to_string(), 1);
        let names: NameMap = [
            ("562".to_string(), "Escherichia coli".to_string()),
            ("9606".to_string(), "Homo sapiens".to_string()),
        ]
        .into_iter()
        .collect();

        let rows = build_species_rows(&counts, &names, 8).unwrap();
        assert_eq!(
            rows,
            vec![
                row("Homo sapiens", "9606", 3, 37.5),
                row("Escherichia coli", "562", 1, 12.5),
            ]
        );
        let total: f64 = rows.iter().map(|r| r.relab).sum();
        assert!(total <= 100.0);
    }

    #[test]
    fn test_build_rows_requires_names() {
        let mut counts = SpeciesCounts::new();
        counts.insert("562".to_string(), 1);
        match build_species_rows(&counts, &NameMap::new(), 1) {
            Err(SummaryError::NameLookup(tax_id)) => assert_eq!(tax_id, "562"),
            other => panic!("expected name lookup error, got {other:?}"),
        }
    }

    #[test]
    fn test_render_table() {
        let rows = vec![row("Homo sapiens", "9606", 1, 100.0)];
        assert_eq!(
            render_species_table(&rows),
            "species\ttaxonomic_id\tcount\trelab\nHomo sapiens\t9606\t1\t100.0\n"
        );
        assert_eq!(
            render_species_table(&[]),
            "species\ttaxonomic_id\tcount\trelab\n"
        );
    }
}
