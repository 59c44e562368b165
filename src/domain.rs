use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AbundanceError;

/// One ranked row of a species abundance report, projected down to the
/// columns that end up in sample metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonRow {
    pub taxonomy_level: String,
    pub name: String,
    pub taxonomy_id: String,
    pub fraction_total_reads: String,
}

/// Ranked rows of a report; index 0 is rank 1, the most abundant taxon.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportRowSet(Vec<TaxonRow>);

impl ReportRowSet {
    pub fn new(rows: Vec<TaxonRow>) -> Self {
        Self(rows)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Row at a 1-indexed rank.
    pub fn rank(&self, rank: usize) -> Option<&TaxonRow> {
        rank.checked_sub(1).and_then(|index| self.0.get(index))
    }

    /// Rows paired with their 1-indexed rank.
    pub fn ranked(&self) -> impl Iterator<Item = (usize, &TaxonRow)> {
        self.0.iter().enumerate().map(|(index, row)| (index + 1, row))
    }
}

impl FromIterator<TaxonRow> for ReportRowSet {
    fn from_iter<I: IntoIterator<Item = TaxonRow>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Text,
    Float,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Text => write!(f, "text"),
            ValueType::Float => write!(f, "float"),
        }
    }
}

/// A single value attached to a sample under a metadata key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEntry {
    value: String,
    #[serde(rename = "type")]
    value_type: ValueType,
}

impl MetadataEntry {
    pub fn new(value: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            value: value.into(),
            value_type,
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::new(value, ValueType::Text)
    }

    pub fn float(value: impl Into<String>) -> Self {
        Self::new(value, ValueType::Float)
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }
}

pub type MetadataMap = BTreeMap<String, MetadataEntry>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SampleId(u64);

impl SampleId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for SampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub id: SampleId,
}

impl Sample {
    pub fn new(id: SampleId) -> Self {
        Self { id }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorkflowId(String);

impl WorkflowId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkflowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for WorkflowId {
    type Err = AbundanceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim();
        if normalized.is_empty() {
            return Err(AbundanceError::MissingArgument("workflow id"));
        }
        Ok(Self(normalized.to_string()))
    }
}

/// Name and version of the workflow that produced an analysis. The name is
/// the namespace prefixed onto every synthesized metadata key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowDescription {
    pub name: String,
    pub version: String,
}
