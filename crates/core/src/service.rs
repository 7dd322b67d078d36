//! Patient service: orchestrates the record store and derivation engine.
//!
//! Every operation follows the same cycle: validate input, load the full
//! collection, mutate it in memory, save it back. Validation always runs
//! before the first store interaction, so an invalid request leaves the
//! backing document untouched.

use crate::error::{PatientError, PatientResult};
use crate::patient::{PatientDraft, PatientPatch, PatientRecord};
use crate::store::{PatientMap, RecordStore};

/// Field a patient listing can be ordered by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortField {
    Height,
    Weight,
    Bmi,
}

impl SortField {
    /// Parses the `sort_by` query value.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::InvalidSortField` for anything outside
    /// {height, weight, bmi}.
    pub fn parse(value: &str) -> PatientResult<Self> {
        match value {
            "height" => Ok(SortField::Height),
            "weight" => Ok(SortField::Weight),
            "bmi" => Ok(SortField::Bmi),
            other => Err(PatientError::InvalidSortField(other.to_string())),
        }
    }

    fn value_of(self, record: &PatientRecord) -> f64 {
        match self {
            SortField::Height => record.height,
            SortField::Weight => record.weight,
            SortField::Bmi => record.bmi,
        }
    }
}

/// Sort direction. An omitted or unrecognised value defaults to
/// ascending rather than failing the request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Parses the `order` query value, defaulting to [`SortOrder::Asc`].
    pub fn parse_or_default(value: Option<&str>) -> Self {
        match value {
            Some("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }
}

/// Patient record operations over a [`RecordStore`].
///
/// The service is storage-agnostic; production wiring hands it a
/// [`JsonFileStore`](crate::store::JsonFileStore), tests can substitute
/// anything implementing the trait.
#[derive(Clone, Debug)]
pub struct PatientService<S> {
    store: S,
}

impl<S: RecordStore> PatientService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Creates a new patient record.
    ///
    /// Computes the derived `bmi`/`verdict` fields, enforces id
    /// uniqueness and persists the updated collection.
    ///
    /// # Errors
    ///
    /// - `Validation` if any field is out of range (store untouched)
    /// - `DuplicateId` if the id already exists (store untouched)
    /// - storage errors from load/save
    pub fn create(&self, draft: PatientDraft) -> PatientResult<PatientRecord> {
        draft.validate()?;

        let mut records = self.store.load()?;
        if records.contains_key(&draft.id) {
            return Err(PatientError::DuplicateId(draft.id));
        }

        let record = draft.into_record()?;
        records.insert(record.id.clone(), record.clone());
        self.store.save(&records)?;

        tracing::info!(id = %record.id, "patient record created");
        Ok(record)
    }

    /// Returns the full id → record mapping.
    pub fn all(&self) -> PatientResult<PatientMap> {
        self.store.load()
    }

    /// Returns a single record by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id is absent.
    pub fn get(&self, id: &str) -> PatientResult<PatientRecord> {
        let records = self.store.load()?;
        records
            .get(id)
            .cloned()
            .ok_or_else(|| PatientError::NotFound(id.to_string()))
    }

    /// Applies a partial update to an existing record.
    ///
    /// Fields present in the patch overlay the stored values; `bmi` and
    /// `verdict` are recomputed when the patch touches a measurement.
    ///
    /// # Errors
    ///
    /// - `Validation` if a patched field is out of range (store untouched)
    /// - `NotFound` if the id is absent
    /// - storage errors from load/save
    pub fn update(&self, id: &str, patch: PatientPatch) -> PatientResult<PatientRecord> {
        patch.validate()?;

        let mut records = self.store.load()?;
        let record = records
            .get_mut(id)
            .ok_or_else(|| PatientError::NotFound(id.to_string()))?;

        patch.apply_to(record)?;
        let updated = record.clone();
        self.store.save(&records)?;

        tracing::info!(id = %id, "patient record updated");
        Ok(updated)
    }

    /// Deletes a record by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id is absent.
    pub fn delete(&self, id: &str) -> PatientResult<()> {
        let mut records = self.store.load()?;
        if records.remove(id).is_none() {
            return Err(PatientError::NotFound(id.to_string()));
        }
        self.store.save(&records)?;

        tracing::info!(id = %id, "patient record deleted");
        Ok(())
    }

    /// Returns all records ordered by `field`.
    ///
    /// Ties on the sort key are broken by ascending id in both
    /// directions, so the ordering is deterministic.
    pub fn sort_by(&self, field: SortField, order: SortOrder) -> PatientResult<Vec<PatientRecord>> {
        let records = self.store.load()?;
        let mut list: Vec<PatientRecord> = records.into_values().collect();

        list.sort_by(|a, b| {
            let by_field = field.value_of(a).total_cmp(&field.value_of(b));
            let by_field = match order {
                SortOrder::Asc => by_field,
                SortOrder::Desc => by_field.reverse(),
            };
            by_field.then_with(|| a.id.cmp(&b.id))
        });

        Ok(list)
    }
}
