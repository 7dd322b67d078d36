/// Errors raised by patient record operations.
///
/// Each variant maps to exactly one failure class the HTTP surface can
/// translate into a status code; none of them are retried or swallowed.
#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },
    #[error("patient '{0}' already exists")]
    DuplicateId(String),
    #[error("patient '{0}' not found")]
    NotFound(String),
    #[error("invalid sort field '{0}': choose one of height, weight, bmi")]
    InvalidSortField(String),
    #[error("patient database is corrupt: {0}")]
    StorageCorrupt(serde_json::Error),
    #[error("failed to read patient database: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write patient database: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to serialise patient database: {0}")]
    Serialization(serde_json::Error),
}

impl PatientError {
    /// Shorthand for a [`PatientError::Validation`] with a named field.
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}

pub type PatientResult<T> = std::result::Result<T, PatientError>;
