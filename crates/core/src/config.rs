//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into
//! core services. The intent is to avoid reading process-wide environment
//! variables during request handling, which can lead to inconsistent
//! behaviour in multi-threaded runtimes and test harnesses.

use crate::error::{PatientError, PatientResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    db_file: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::Validation` if `db_file` is empty or points
    /// at an existing directory rather than a file.
    pub fn new(db_file: PathBuf) -> PatientResult<Self> {
        if db_file.as_os_str().is_empty() {
            return Err(PatientError::validation(
                "db_file",
                "database file path cannot be empty",
            ));
        }

        if db_file.is_dir() {
            return Err(PatientError::validation(
                "db_file",
                format!("{} is a directory, not a file", db_file.display()),
            ));
        }

        Ok(Self { db_file })
    }

    /// Path of the JSON document backing the patient collection.
    ///
    /// The file does not have to exist yet; the store treats a missing
    /// file as an empty collection.
    pub fn db_file(&self) -> &Path {
        &self.db_file
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_nonexistent_file_path() {
        let cfg = CoreConfig::new(PathBuf::from("does-not-exist/patients.json")).unwrap();
        assert!(cfg.db_file().ends_with("patients.json"));
    }

    #[test]
    fn rejects_empty_path() {
        let err = CoreConfig::new(PathBuf::new()).unwrap_err();
        assert!(matches!(err, PatientError::Validation { field: "db_file", .. }));
    }

    #[test]
    fn rejects_directory_path() {
        let temp = tempfile::TempDir::new().unwrap();
        let err = CoreConfig::new(temp.path().to_path_buf()).unwrap_err();
        assert!(matches!(err, PatientError::Validation { .. }));
    }
}
