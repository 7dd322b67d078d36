//! # PMS Core
//!
//! Core business logic for the patient management system.
//!
//! This crate contains pure data operations and storage management:
//! - Patient record creation, retrieval, update, deletion and sorting
//! - BMI and verdict derivation from height and weight
//! - Whole-document JSON storage behind the [`RecordStore`] trait
//!
//! **No API concerns**: HTTP routing, status-code mapping and OpenAPI
//! documentation belong in `pms-api-rest`.

pub mod config;
pub mod error;
pub mod metrics;
pub mod patient;
pub mod service;
pub mod store;

pub use config::CoreConfig;
pub use error::{PatientError, PatientResult};
pub use patient::{Gender, PatientDraft, PatientPatch, PatientRecord, Verdict};
pub use service::{PatientService, SortField, SortOrder};
pub use store::{JsonFileStore, PatientMap, RecordStore};

/// Default backing file for the patient collection, relative to the
/// working directory, when `PMS_DB_FILE` is not set.
pub const DEFAULT_DB_FILE: &str = "patients.json";
