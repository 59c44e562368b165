use std::collections::{BTreeMap, HashMap};
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};

use crate::domain::{MetadataMap, SampleId, WorkflowDescription, WorkflowId};
use crate::error::AbundanceError;

/// Resolves the workflow that produced an analysis run.
pub trait WorkflowInfoProvider: Send + Sync {
    fn workflow(&self, id: &WorkflowId) -> Result<WorkflowDescription, AbundanceError>;
}

/// An analysis run whose outputs are registered under logical names.
pub trait AnalysisRun {
    fn id(&self) -> &str;
    fn workflow_id(&self) -> &WorkflowId;
    fn output_file_path(&self, logical_name: &str) -> Option<&Utf8Path>;
}

/// Merges synthesized metadata into the persistent sample record.
pub trait MetadataSink: Send + Sync {
    fn merge_metadata(
        &self,
        sample_id: SampleId,
        analysis_id: &str,
        metadata: MetadataMap,
    ) -> Result<(), AbundanceError>;
}

#[derive(Debug, Clone, Default)]
pub struct StaticWorkflowRegistry {
    workflows: BTreeMap<WorkflowId, WorkflowDescription>,
}

impl StaticWorkflowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workflow(mut self, id: WorkflowId, description: WorkflowDescription) -> Self {
        self.workflows.insert(id, description);
        self
    }

    /// Loads a JSON object mapping workflow ids to `{ "name", "version" }`.
    pub fn load(path: &Utf8Path) -> Result<Self, AbundanceError> {
        let content = fs::read_to_string(path.as_std_path())
            .map_err(|_| AbundanceError::ConfigRead(path.to_path_buf()))?;
        let workflows: BTreeMap<WorkflowId, WorkflowDescription> = serde_json::from_str(&content)
            .map_err(|err| AbundanceError::ConfigParse(err.to_string()))?;
        Ok(Self { workflows })
    }
}

impl WorkflowInfoProvider for StaticWorkflowRegistry {
    fn workflow(&self, id: &WorkflowId) -> Result<WorkflowDescription, AbundanceError> {
        self.workflows
            .get(id)
            .cloned()
            .ok_or_else(|| AbundanceError::WorkflowNotFound(id.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisSubmission {
    id: String,
    workflow_id: WorkflowId,
    outputs: HashMap<String, Utf8PathBuf>,
}

impl AnalysisSubmission {
    pub fn new(id: impl Into<String>, workflow_id: WorkflowId) -> Self {
        Self {
            id: id.into(),
            workflow_id,
            outputs: HashMap::new(),
        }
    }

    pub fn with_output(mut self, logical_name: impl Into<String>, path: Utf8PathBuf) -> Self {
        self.outputs.insert(logical_name.into(), path);
        self
    }
}

impl AnalysisRun for AnalysisSubmission {
    fn id(&self) -> &str {
        &self.id
    }

    fn workflow_id(&self) -> &WorkflowId {
        &self.workflow_id
    }

    fn output_file_path(&self, logical_name: &str) -> Option<&Utf8Path> {
        self.outputs.get(logical_name).map(Utf8PathBuf::as_path)
    }
}
