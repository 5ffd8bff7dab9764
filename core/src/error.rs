use thiserror::Error;

/// Per-record or batch-scope import failures.
///
/// Validation, Resolution, and Integrity errors are always per-record:
/// they are collected into the batch report and never abort the run.
/// Source errors are per-record when they concern one URL or one PDF
/// section, and batch-scope when the whole input is unreadable.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("resolution error: {0}")]
    Resolution(String),

    #[error("source error: {0}")]
    Source(String),

    #[error("integrity error: {0}")]
    Integrity(String),
}

impl From<crate::store::StoreError> for ImportError {
    fn from(err: crate::store::StoreError) -> Self {
        match err {
            crate::store::StoreError::Integrity(msg) => ImportError::Integrity(msg),
            crate::store::StoreError::Database(msg) => ImportError::Source(msg),
        }
    }
}
