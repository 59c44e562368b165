use std::fs::File;
use std::io::{BufRead, BufReader, Lines};

use camino::Utf8Path;
use tracing::debug;

use crate::domain::{ReportRowSet, TaxonRow};
use crate::error::AbundanceError;

/// Column names of a Bracken species abundance report, in file order.
pub const CANONICAL_HEADER: [&str; 7] = [
    "name",
    "taxonomy_id",
    "taxonomy_lvl",
    "kraken_assigned_reads",
    "added_reads",
    "new_est_reads",
    "fraction_total_reads",
];

pub const EXPECTED_COLUMNS: usize = CANONICAL_HEADER.len();

const NAME: usize = 0;
const TAXONOMY_ID: usize = 1;
const TAXONOMY_LVL: usize = 2;
const FRACTION_TOTAL_READS: usize = 6;

/// Reads the `top_n` most abundant rows of a species abundance report.
///
/// The header line is optional. When the first line does not match
/// [`CANONICAL_HEADER`] exactly it is taken as the rank 1 row. A report with
/// fewer than `top_n` data rows is an error, as is any row that does not have
/// exactly [`EXPECTED_COLUMNS`] tab-separated fields.
#[derive(Debug, Clone, Copy)]
pub struct ReportParser {
    top_n: usize,
}

impl ReportParser {
    pub fn new(top_n: usize) -> Result<Self, AbundanceError> {
        if top_n == 0 {
            return Err(AbundanceError::InvalidTopN(top_n));
        }
        Ok(Self { top_n })
    }

    pub fn parse(&self, path: &Utf8Path) -> Result<ReportRowSet, AbundanceError> {
        let file = File::open(path.as_std_path()).map_err(|source| AbundanceError::ReportOpen {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path, top_n = self.top_n, "parsing species abundance report");
        self.parse_reader(BufReader::new(file))
    }

    /// Every line read counts, blank ones included: a blank line is a
    /// one-field row and fails the column check at its rank.
    pub fn parse_reader<R: BufRead>(&self, reader: R) -> Result<ReportRowSet, AbundanceError> {
        let mut lines = reader.lines();

        let first = next_line(&mut lines, 1, self.top_n)?;
        let mut pending = if is_canonical_header(&first) {
            debug!("report header present");
            None
        } else {
            debug!("report header absent; first line is rank 1");
            Some(first)
        };

        let rows = (1..=self.top_n)
            .map(|rank| {
                let line = match pending.take() {
                    Some(line) => line,
                    None => next_line(&mut lines, rank, self.top_n)?,
                };
                taxon_row(&line, rank)
            })
            .collect::<Result<ReportRowSet, AbundanceError>>()?;

        debug!(rows = rows.len(), "parsed ranked taxa");
        Ok(rows)
    }
}

fn split_fields(line: &str) -> Vec<&str> {
    line.strip_suffix('\r').unwrap_or(line).split('\t').collect()
}

fn is_canonical_header(line: &str) -> bool {
    split_fields(line) == CANONICAL_HEADER
}

fn next_line<R: BufRead>(
    lines: &mut Lines<R>,
    rank: usize,
    expected: usize,
) -> Result<String, AbundanceError> {
    match lines.next() {
        Some(Ok(line)) => Ok(line),
        Some(Err(err)) => Err(AbundanceError::ReportRead {
            rank,
            message: err.to_string(),
        }),
        None => Err(AbundanceError::ReportTruncated { rank, expected }),
    }
}

fn taxon_row(line: &str, rank: usize) -> Result<TaxonRow, AbundanceError> {
    let fields = split_fields(line);
    if fields.len() != EXPECTED_COLUMNS {
        return Err(AbundanceError::FieldCount {
            rank,
            expected: EXPECTED_COLUMNS,
            found: fields.len(),
        });
    }
    Ok(TaxonRow {
        taxonomy_level: fields[TAXONOMY_LVL].to_string(),
        name: fields[NAME].to_string(),
        taxonomy_id: fields[TAXONOMY_ID].to_string(),
        fraction_total_reads: fields[FRACTION_TOTAL_READS].to_string(),
    })
}
