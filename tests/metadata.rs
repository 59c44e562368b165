use species_abundance::domain::{ReportRowSet, TaxonRow, ValueType};
use species_abundance::metadata::MetadataKeyBuilder;

const NAMESPACE: &str = "species-abundance";

fn row(name: &str, taxonomy_id: &str, fraction: &str) -> TaxonRow {
    TaxonRow {
        taxonomy_level: "S".to_string(),
        name: name.to_string(),
        taxonomy_id: taxonomy_id.to_string(),
        fraction_total_reads: fraction.to_string(),
    }
}

fn top_five() -> ReportRowSet {
    ReportRowSet::new(vec![
        row("Escherichia coli", "562", "0.98546"),
        row("Shigella flexneri", "623", "0.00704"),
        row("Salmonella enterica", "28901", "0.00293"),
        row("Klebsiella pneumoniae", "573", "0.00200"),
        row("Citrobacter freundii", "546", "0.00112"),
    ])
}

#[test]
fn most_abundant_only_keys() {
    let rows = ReportRowSet::new(vec![row("Escherichia coli", "562", "0.98546")]);
    let metadata = MetadataKeyBuilder::new(NAMESPACE).build(&rows).unwrap();

    let values = metadata
        .iter()
        .map(|(key, entry)| (key.as_str(), entry.value()))
        .collect::<Vec<_>>();
    assert_eq!(
        values,
        vec![
            ("species-abundance/proportion", "0.98546"),
            ("species-abundance/taxon_name", "Escherichia coli"),
            ("species-abundance/taxonomy_id", "562"),
            ("species-abundance/taxonomy_level", "S"),
        ]
    );
}

#[test]
fn top_five_yields_fifteen_keys() {
    let metadata = MetadataKeyBuilder::new(NAMESPACE)
        .build(&top_five())
        .unwrap();
    assert_eq!(metadata.len(), 15);
    assert_eq!(
        metadata["species-abundance/taxon_name_2"].value(),
        "Shigella flexneri"
    );
    assert_eq!(metadata["species-abundance/taxonomy_id_5"].value(), "546");
    assert_eq!(metadata["species-abundance/proportion_4"].value(), "0.00200");
    assert_eq!(
        metadata["species-abundance/proportion_4"].value_type(),
        ValueType::Float
    );
    assert!(!metadata.contains_key("species-abundance/taxon_name_1"));
    assert!(!metadata.contains_key("species-abundance/taxonomy_level_2"));
}

#[test]
fn taxonomy_level_recorded_once() {
    let metadata = MetadataKeyBuilder::new(NAMESPACE)
        .build(&top_five())
        .unwrap();
    let levels = metadata
        .keys()
        .filter(|key| key.contains("taxonomy_level"))
        .count();
    assert_eq!(levels, 1);
}

#[test]
fn suffixes_follow_rank() {
    let metadata = MetadataKeyBuilder::new(NAMESPACE)
        .build(&top_five())
        .unwrap();
    for rank in 2..=5 {
        for field in ["taxon_name", "taxonomy_id", "proportion"] {
            let key = format!("{NAMESPACE}/{field}_{rank}");
            assert!(metadata.contains_key(&key), "missing {key}");
        }
    }
    for field in ["taxon_name", "taxonomy_id", "proportion", "taxonomy_level"] {
        assert!(metadata.contains_key(&format!("{NAMESPACE}/{field}")));
    }
}

#[test]
fn proportion_text_is_not_reformatted() {
    let rows = ReportRowSet::new(vec![row("Escherichia coli", "562", "1.000000e-01")]);
    let metadata = MetadataKeyBuilder::new(NAMESPACE).build(&rows).unwrap();
    assert_eq!(
        metadata["species-abundance/proportion"].value(),
        "1.000000e-01"
    );
}

#[test]
fn build_is_deterministic() {
    let builder = MetadataKeyBuilder::new(NAMESPACE);
    let first = builder.build(&top_five()).unwrap();
    let second = builder.build(&top_five()).unwrap();
    assert_eq!(first, second);
}
