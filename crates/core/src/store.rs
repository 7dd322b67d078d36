//! Record store: the persistence boundary owning the patient collection.
//!
//! The whole collection lives in one JSON document mapping patient id to
//! record. The [`RecordStore`] trait deliberately exposes only whole-map
//! `load`/`save`: the patient service always reads the full mapping,
//! mutates it in memory and writes it back. That keeps the storage
//! contract trivial at the cost of O(n) I/O per mutation, which is
//! acceptable for the single-operator deployment target, and it lets a
//! real embedded datastore be swapped in without touching service logic.
//!
//! ## Concurrency
//!
//! The store assumes a single process and a single writer. Two
//! overlapping load-mutate-save cycles race as last-writer-wins, so a
//! concurrent host must serialise the cycle externally — the REST layer
//! does this with one async mutex around the service. Cross-process
//! writers are not supported.
//!
//! ## Atomicity
//!
//! `save` writes to a temporary file in the target directory and renames
//! it over the live document, so a failed write never leaves the backing
//! file partially written.

use crate::error::{PatientError, PatientResult};
use crate::patient::PatientRecord;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// The full patient collection, keyed by id.
///
/// A `BTreeMap` keeps serialisation deterministic: saving a freshly
/// loaded map reproduces the backing document byte for byte.
pub type PatientMap = BTreeMap<String, PatientRecord>;

/// Persistence boundary for the patient collection.
pub trait RecordStore {
    /// Loads the full current mapping.
    ///
    /// # Errors
    ///
    /// - `StorageCorrupt` if the backing content is not parseable
    /// - `FileRead` on any other I/O failure
    ///
    /// A missing backing file is not an error; it yields an empty map.
    fn load(&self) -> PatientResult<PatientMap>;

    /// Persists the full mapping, replacing prior content atomically.
    ///
    /// # Errors
    ///
    /// - `Serialization` if the mapping cannot be encoded
    /// - `FileWrite` on any I/O failure; the previous content stays intact
    fn save(&self, records: &PatientMap) -> PatientResult<()>;
}

/// [`RecordStore`] backed by a single JSON file.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory the temporary file is created in. Keeping it next to
    /// the live document makes the final rename a same-filesystem move.
    fn parent_dir(&self) -> &Path {
        self.path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }
}

impl RecordStore for JsonFileStore {
    fn load(&self) -> PatientResult<PatientMap> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(PatientMap::new());
            }
            Err(e) => return Err(PatientError::FileRead(e)),
        };

        serde_json::from_str(&contents).map_err(PatientError::StorageCorrupt)
    }

    fn save(&self, records: &PatientMap) -> PatientResult<()> {
        let json =
            serde_json::to_string_pretty(records).map_err(PatientError::Serialization)?;

        let mut tmp =
            NamedTempFile::new_in(self.parent_dir()).map_err(PatientError::FileWrite)?;
        tmp.write_all(json.as_bytes())
            .map_err(PatientError::FileWrite)?;
        tmp.write_all(b"\n").map_err(PatientError::FileWrite)?;
        tmp.persist(&self.path)
            .map_err(|e| PatientError::FileWrite(e.error))?;

        Ok(())
    }
}
