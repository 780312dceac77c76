// errors.rs
use thiserror::Error;

/// Everything that can go wrong during one report run.
///
/// Only `Notification` is non-fatal: the publisher logs it and the run
/// still reports success. Every other variant aborts the remaining stages.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Notification error: {0}")]
    Notification(String),
}

impl ReportError {
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ReportError::Notification(_))
    }
}

// Type alias used by every stage.
pub type ReportResult<T> = Result<T, ReportError>;
