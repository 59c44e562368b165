use std::collections::BTreeMap;
use std::fs;
use std::io::Write;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use tempfile::Builder;
use tracing::info;

use crate::domain::{MetadataMap, SampleId, ValueType};
use crate::error::AbundanceError;
use crate::platform::MetadataSink;

/// File-backed sample metadata, one JSON document per sample.
#[derive(Debug, Clone)]
pub struct JsonMetadataStore {
    root: Utf8PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    pub sample_id: SampleId,
    #[serde(default)]
    pub metadata: BTreeMap<String, StoredEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEntry {
    pub value: String,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    pub analysis_id: String,
    pub updated_at: String,
}

impl JsonMetadataStore {
    pub fn new(root: Utf8PathBuf) -> Self {
        Self { root }
    }

    pub fn sample_path(&self, sample_id: SampleId) -> Utf8PathBuf {
        self.root.join(format!("{sample_id}.json"))
    }

    pub fn read_sample(&self, sample_id: SampleId) -> Result<Option<SampleRecord>, AbundanceError> {
        let path = self.sample_path(sample_id);
        if !path.as_std_path().exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path.as_std_path())
            .map_err(|err| AbundanceError::Sink(format!("read {path}: {err}")))?;
        let record = serde_json::from_str(&content)
            .map_err(|err| AbundanceError::Sink(format!("parse {path}: {err}")))?;
        Ok(Some(record))
    }

    fn write_sample(&self, record: &SampleRecord) -> Result<(), AbundanceError> {
        fs::create_dir_all(self.root.as_std_path())
            .map_err(|err| AbundanceError::Sink(err.to_string()))?;
        let content = serde_json::to_vec_pretty(record)
            .map_err(|err| AbundanceError::Sink(err.to_string()))?;
        let mut temp = Builder::new()
            .prefix("sample-metadata")
            .tempfile_in(self.root.as_std_path())
            .map_err(|err| AbundanceError::Sink(err.to_string()))?;
        temp.write_all(&content)
            .map_err(|err| AbundanceError::Sink(err.to_string()))?;
        temp.persist(self.sample_path(record.sample_id).as_std_path())
            .map_err(|err| AbundanceError::Sink(err.to_string()))?;
        Ok(())
    }
}

impl MetadataSink for JsonMetadataStore {
    fn merge_metadata(
        &self,
        sample_id: SampleId,
        analysis_id: &str,
        metadata: MetadataMap,
    ) -> Result<(), AbundanceError> {
        let mut record = self.read_sample(sample_id)?.unwrap_or(SampleRecord {
            sample_id,
            metadata: BTreeMap::new(),
        });
        let updated_at = chrono::Utc::now().to_rfc3339();
        let merged = metadata.len();
        record
            .metadata
            .extend(metadata.into_iter().map(|(key, entry)| {
                (
                    key,
                    StoredEntry {
                        value: entry.value().to_string(),
                        value_type: entry.value_type(),
                        analysis_id: analysis_id.to_string(),
                        updated_at: updated_at.clone(),
                    },
                )
            }));
        self.write_sample(&record)?;
        info!(sample = %sample_id, keys = merged, "merged sample metadata");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_path_layout() {
        let store = JsonMetadataStore::new(Utf8PathBuf::from("/tmp/samples"));
        let path = store.sample_path(SampleId::new(7));
        assert!(path.ends_with("7.json"));
    }
}
