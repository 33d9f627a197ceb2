use slimset_infra::{NetError, RemoteError};
use slimset_repack::RepackError;

/// Failure of a single run. Nothing is retried in-process.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("network error: {0}")]
    Network(#[from] NetError),
    #[error("invalid archive: {0}")]
    InvalidArchive(#[source] RepackError),
    #[error("processing failed: {0}")]
    Processing(#[source] RepackError),
    #[error("local workspace error: {0}")]
    Workspace(#[from] std::io::Error),
    #[error("remote sync failed: {0}")]
    Upload(#[from] RemoteError),
    #[error("setup failed: {0}")]
    Setup(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineErrorKind {
    Network,
    InvalidArchive,
    Processing,
    Upload,
    Setup,
}

impl PipelineError {
    pub fn kind(&self) -> PipelineErrorKind {
        match self {
            PipelineError::Network(_) => PipelineErrorKind::Network,
            PipelineError::InvalidArchive(_) => PipelineErrorKind::InvalidArchive,
            PipelineError::Processing(_) | PipelineError::Workspace(_) => {
                PipelineErrorKind::Processing
            }
            PipelineError::Upload(_) => PipelineErrorKind::Upload,
            PipelineError::Setup(_) => PipelineErrorKind::Setup,
        }
    }
}

impl From<RepackError> for PipelineError {
    fn from(value: RepackError) -> Self {
        match value {
            e @ RepackError::InvalidArchive(_) => Self::InvalidArchive(e),
            other => Self::Processing(other),
        }
    }
}
