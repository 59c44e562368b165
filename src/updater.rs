use tracing::{debug, info};

use crate::config::ResolvedConfig;
use crate::domain::Sample;
use crate::error::AbundanceError;
use crate::metadata::MetadataKeyBuilder;
use crate::platform::{AnalysisRun, MetadataSink, WorkflowInfoProvider};
use crate::report::ReportParser;

/// Analysis type this updater is registered for.
pub const ANALYSIS_TYPE: &str = "SPECIES_ABUNDANCE";

/// Writes the most abundant taxa of a species abundance analysis into the
/// metadata of the single sample the analysis ran on.
#[derive(Clone)]
pub struct SpeciesAbundanceUpdater<W: WorkflowInfoProvider, S: MetadataSink> {
    workflows: W,
    sink: S,
    config: ResolvedConfig,
}

impl<W: WorkflowInfoProvider, S: MetadataSink> SpeciesAbundanceUpdater<W, S> {
    pub fn new(workflows: W, sink: S, config: ResolvedConfig) -> Self {
        Self {
            workflows,
            sink,
            config,
        }
    }

    pub fn analysis_type(&self) -> &'static str {
        ANALYSIS_TYPE
    }

    pub fn workflows(&self) -> &W {
        &self.workflows
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Parses the analysis report and merges the synthesized metadata into
    /// the sample. Nothing reaches the sink unless every step succeeds.
    pub fn update(
        &self,
        samples: &[Sample],
        analysis: &dyn AnalysisRun,
    ) -> Result<(), AbundanceError> {
        let [sample] = samples else {
            return Err(AbundanceError::InvalidSampleCount {
                count: samples.len(),
                analysis_id: analysis.id().to_string(),
            });
        };

        let workflow_id = analysis.workflow_id();
        let workflow = self.workflows.workflow(workflow_id).map_err(|err| {
            AbundanceError::post_processing(
                format!("Could not find workflow for id={workflow_id}"),
                err,
            )
        })?;
        debug!(
            workflow = %workflow.name,
            version = %workflow.version,
            "resolved metadata namespace"
        );

        let report_path = analysis
            .output_file_path(&self.config.output_name)
            .ok_or_else(|| AbundanceError::MissingOutput {
                analysis_id: analysis.id().to_string(),
                output: self.config.output_name.clone(),
            })?;

        let top_n = self.config.top_n_for_version(&workflow.version);
        let metadata = ReportParser::new(top_n)
            .and_then(|parser| parser.parse(report_path))
            .and_then(|rows| MetadataKeyBuilder::new(&workflow.name).build(&rows))
            .map_err(|err| {
                AbundanceError::post_processing("Error parsing species abundance file", err)
            })?;

        info!(
            sample = %sample.id,
            analysis = analysis.id(),
            keys = metadata.len(),
            "updating sample metadata from species abundance report"
        );
        self.sink.merge_metadata(sample.id, analysis.id(), metadata)
    }
}
