use tracing::debug;

use crate::domain::{MetadataEntry, MetadataMap, ReportRowSet, TaxonRow};
use crate::error::AbundanceError;

pub const TAXONOMY_LEVEL_KEY: &str = "taxonomy_level";
pub const TAXON_NAME_KEY: &str = "taxon_name";
pub const TAXONOMY_ID_KEY: &str = "taxonomy_id";
pub const PROPORTION_KEY: &str = "proportion";

/// Synthesizes namespaced metadata keys from ranked report rows.
///
/// Rank 1 produces unsuffixed keys; every later rank `r` appends `_{r}`.
/// The taxonomy level is only recorded from rank 1.
#[derive(Debug, Clone, Copy)]
pub struct MetadataKeyBuilder<'a> {
    namespace: &'a str,
}

impl<'a> MetadataKeyBuilder<'a> {
    pub fn new(namespace: &'a str) -> Self {
        Self { namespace }
    }

    pub fn build(&self, rows: &ReportRowSet) -> Result<MetadataMap, AbundanceError> {
        if rows.is_empty() {
            return Err(AbundanceError::EmptyRowSet);
        }
        let metadata = rows
            .ranked()
            .flat_map(|(rank, row)| self.entries(rank, row))
            .collect::<MetadataMap>();
        debug!(
            namespace = self.namespace,
            keys = metadata.len(),
            "synthesized metadata keys"
        );
        Ok(metadata)
    }

    fn entries(&self, rank: usize, row: &TaxonRow) -> Vec<(String, MetadataEntry)> {
        let mut entries = Vec::with_capacity(4);
        if rank == 1 {
            entries.push((
                self.key(TAXONOMY_LEVEL_KEY, rank),
                MetadataEntry::text(&row.taxonomy_level),
            ));
        }
        entries.push((self.key(TAXON_NAME_KEY, rank), MetadataEntry::text(&row.name)));
        entries.push((
            self.key(TAXONOMY_ID_KEY, rank),
            MetadataEntry::text(&row.taxonomy_id),
        ));
        entries.push((
            self.key(PROPORTION_KEY, rank),
            MetadataEntry::float(&row.fraction_total_reads),
        ));
        entries
    }

    pub fn key(&self, field: &str, rank: usize) -> String {
        if rank <= 1 {
            format!("{}/{field}", self.namespace)
        } else {
            format!("{}/{field}_{rank}", self.namespace)
        }
    }
}
