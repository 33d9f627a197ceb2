use zip::result::ZipError;

#[derive(Debug, thiserror::Error)]
pub enum RepackError {
    #[error("input is not a readable zip archive: {0}")]
    InvalidArchive(#[source] ZipError),
    #[error("failed to process entry {entry}: {source}")]
    Processing {
        entry: String,
        #[source]
        source: ZipError,
    },
    #[error("failed to finalize output archive: {0}")]
    Finish(#[source] ZipError),
}

impl RepackError {
    pub(crate) fn processing(entry: impl Into<String>, source: impl Into<ZipError>) -> Self {
        Self::Processing {
            entry: entry.into(),
            source: source.into(),
        }
    }

    /// True for every failure other than an unparseable input.
    pub fn is_processing(&self) -> bool {
        !matches!(self, RepackError::InvalidArchive(_))
    }
}
