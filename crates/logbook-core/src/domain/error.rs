//! Domain-level error taxonomy for the logbook pipeline.

/// Errors produced while aggregating commit history.
///
/// Everything except [`LogbookError::Config`] is scoped to a single
/// repository: the worker pool converts these into
/// [`RepositoryResult`](crate::domain::RepositoryResult) entries instead of
/// aborting the run.
#[derive(Debug, thiserror::Error)]
pub enum LogbookError {
    #[error("invalid repository reference: {reference}")]
    InvalidReference { reference: String },

    #[error("acquisition failed for {repository}: {detail}")]
    AcquisitionFailed { repository: String, detail: String },

    #[error("extraction failed for {repository}: {detail}")]
    ExtractionFailed { repository: String, detail: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for logbook pipeline operations.
pub type Result<T> = std::result::Result<T, LogbookError>;
