use camino::Utf8PathBuf;

use species_abundance::domain::{MetadataEntry, MetadataMap, SampleId, ValueType};
use species_abundance::platform::MetadataSink;
use species_abundance::store::JsonMetadataStore;

fn store(dir: &tempfile::TempDir) -> JsonMetadataStore {
    JsonMetadataStore::new(Utf8PathBuf::from_path_buf(dir.path().join("samples")).unwrap())
}

#[test]
fn merge_creates_sample_record() {
    let dir = tempfile::tempdir().unwrap();
    let store = store(&dir);
    let metadata: MetadataMap = [
        (
            "species-abundance/taxon_name".to_string(),
            MetadataEntry::text("Escherichia coli"),
        ),
        (
            "species-abundance/proportion".to_string(),
            MetadataEntry::float("0.98546"),
        ),
    ]
    .into_iter()
    .collect();

    store
        .merge_metadata(SampleId::new(4), "analysis-1", metadata)
        .unwrap();

    let record = store.read_sample(SampleId::new(4)).unwrap().unwrap();
    assert_eq!(record.sample_id, SampleId::new(4));
    let proportion = &record.metadata["species-abundance/proportion"];
    assert_eq!(proportion.value, "0.98546");
    assert_eq!(proportion.value_type, ValueType::Float);
    assert_eq!(proportion.analysis_id, "analysis-1");
}

#[test]
fn merge_overwrites_same_keys_and_keeps_others() {
    let dir = tempfile::tempdir().unwrap();
    let store = store(&dir);
    let sample = SampleId::new(9);

    let first: MetadataMap = [
        ("other-pipeline/coverage".to_string(), MetadataEntry::float("31.2")),
        (
            "species-abundance/taxon_name".to_string(),
            MetadataEntry::text("Shigella flexneri"),
        ),
    ]
    .into_iter()
    .collect();
    store.merge_metadata(sample, "analysis-1", first).unwrap();

    let second: MetadataMap = [(
        "species-abundance/taxon_name".to_string(),
        MetadataEntry::text("Escherichia coli"),
    )]
    .into_iter()
    .collect();
    store.merge_metadata(sample, "analysis-2", second).unwrap();

    let record = store.read_sample(sample).unwrap().unwrap();
    assert_eq!(record.metadata.len(), 2);
    assert_eq!(record.metadata["other-pipeline/coverage"].analysis_id, "analysis-1");
    let name = &record.metadata["species-abundance/taxon_name"];
    assert_eq!(name.value, "Escherichia coli");
    assert_eq!(name.analysis_id, "analysis-2");
}

#[test]
fn unknown_sample_has_no_record() {
    let dir = tempfile::tempdir().unwrap();
    assert!(store(&dir).read_sample(SampleId::new(1)).unwrap().is_none());
}
