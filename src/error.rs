use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum AbundanceError {
    #[error("samples size={count} is not 1 for analysisSubmission={analysis_id}")]
    #[diagnostic(help("this pipeline processes exactly one sample per analysis run"))]
    InvalidSampleCount { count: usize, analysis_id: String },

    #[error("{0} is missing")]
    MissingArgument(&'static str),

    #[error("failed to open species abundance report {path}")]
    ReportOpen {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read report line for rank {rank}: {message}")]
    ReportRead { rank: usize, message: String },

    #[error("report ended before rank {rank} (expected {expected} ranked rows)")]
    ReportTruncated { rank: usize, expected: usize },

    #[error("report row for rank {rank} has {found} fields, expected {expected}")]
    FieldCount {
        rank: usize,
        expected: usize,
        found: usize,
    },

    #[error("cannot build metadata from an empty row set")]
    EmptyRowSet,

    #[error("workflow not found: {0}")]
    WorkflowNotFound(String),

    #[error("analysis {analysis_id} has no output file named {output}")]
    MissingOutput { analysis_id: String, output: String },

    #[error("failed to read config file at {0}")]
    ConfigRead(Utf8PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("top-n must be at least 1, got {0}")]
    InvalidTopN(usize),

    #[error("metadata sink failed: {0}")]
    Sink(String),

    #[error("{message}")]
    PostProcessing {
        message: String,
        #[source]
        source: Box<AbundanceError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Parse,
    NotFound,
    Config,
    Sink,
}

impl AbundanceError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AbundanceError::InvalidSampleCount { .. } | AbundanceError::MissingArgument(_) => {
                ErrorCategory::Validation
            }
            AbundanceError::ReportOpen { .. }
            | AbundanceError::ReportRead { .. }
            | AbundanceError::ReportTruncated { .. }
            | AbundanceError::FieldCount { .. }
            | AbundanceError::EmptyRowSet => ErrorCategory::Parse,
            AbundanceError::WorkflowNotFound(_) | AbundanceError::MissingOutput { .. } => {
                ErrorCategory::NotFound
            }
            AbundanceError::ConfigRead(_)
            | AbundanceError::ConfigParse(_)
            | AbundanceError::InvalidTopN(_) => ErrorCategory::Config,
            AbundanceError::Sink(_) => ErrorCategory::Sink,
            AbundanceError::PostProcessing { source, .. } => source.category(),
        }
    }

    /// Wraps `cause` as a post-processing failure of the current run.
    pub fn post_processing(message: impl Into<String>, cause: AbundanceError) -> Self {
        AbundanceError::PostProcessing {
            message: message.into(),
            source: Box::new(cause),
        }
    }

    /// The innermost error, looking through any post-processing wrapper.
    pub fn root_cause(&self) -> &AbundanceError {
        match self {
            AbundanceError::PostProcessing { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
