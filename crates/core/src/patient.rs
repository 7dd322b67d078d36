//! Patient record shapes and input validation.
//!
//! The wire-facing types here replace the loosely-typed request shapes of
//! earlier iterations with explicit structures validated at the boundary:
//!
//! - [`PatientRecord`] — the stored entity, including the derived
//!   `bmi`/`verdict` fields which are never accepted from callers
//! - [`PatientDraft`] — full caller input for record creation
//! - [`PatientPatch`] — partial update; any subset of the mutable fields
//!
//! All field constraints are checked before any store interaction, so a
//! validation failure can never leave the collection half-mutated.

use crate::error::{PatientError, PatientResult};
use crate::metrics;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Minimum accepted patient age, inclusive.
pub const MIN_AGE: u32 = 1;
/// Maximum accepted patient age, inclusive.
pub const MAX_AGE: u32 = 119;

/// Patient gender as accepted on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Others,
}

/// Health classification derived from BMI.
///
/// See [`Verdict::from_bmi`] for the threshold table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Verdict {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Verdict::Underweight => "Underweight",
            Verdict::Normal => "Normal",
            Verdict::Overweight => "Overweight",
            Verdict::Obese => "Obese",
        };
        write!(f, "{s}")
    }
}

/// A single patient record as stored and returned by the service.
///
/// `bmi` and `verdict` are always consistent with the current `height`
/// and `weight`; they are recomputed on every mutation that touches
/// either measurement and never taken from caller input.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PatientRecord {
    /// Caller-supplied primary key, immutable once created.
    pub id: String,
    pub name: String,
    pub city: String,
    pub age: u32,
    pub gender: Gender,
    /// Height in metres.
    pub height: f64,
    /// Weight in kilograms.
    pub weight: f64,
    /// Derived: weight / height², rounded to 2 decimal places.
    pub bmi: f64,
    /// Derived: BMI category.
    pub verdict: Verdict,
}

/// Full caller input for creating a patient record.
#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct PatientDraft {
    pub id: String,
    pub name: String,
    pub city: String,
    pub age: u32,
    pub gender: Gender,
    pub height: f64,
    pub weight: f64,
}

impl PatientDraft {
    /// Checks every field constraint without touching any storage.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::Validation` naming the offending field.
    pub fn validate(&self) -> PatientResult<()> {
        validate_id(&self.id)?;
        validate_name(&self.name)?;
        validate_age(self.age)?;
        validate_measurement("height", self.height)?;
        validate_measurement("weight", self.weight)?;
        Ok(())
    }

    /// Converts the draft into a stored record, computing the derived
    /// fields. The draft must already have passed [`validate`](Self::validate).
    pub fn into_record(self) -> PatientResult<PatientRecord> {
        let bmi = metrics::compute_bmi(self.height, self.weight)?;
        Ok(PatientRecord {
            id: self.id,
            name: self.name,
            city: self.city,
            age: self.age,
            gender: self.gender,
            height: self.height,
            weight: self.weight,
            bmi,
            verdict: Verdict::from_bmi(bmi),
        })
    }
}

/// Partial update for an existing patient record.
///
/// The `id` is addressed by path, never patched. Absent fields keep their
/// stored value.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct PatientPatch {
    pub name: Option<String>,
    pub city: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
}

impl PatientPatch {
    /// Checks the constraints of every field present in the patch.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::Validation` naming the offending field.
    pub fn validate(&self) -> PatientResult<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(age) = self.age {
            validate_age(age)?;
        }
        if let Some(height) = self.height {
            validate_measurement("height", height)?;
        }
        if let Some(weight) = self.weight {
            validate_measurement("weight", weight)?;
        }
        Ok(())
    }

    /// True when the patch touches `height` or `weight`, which forces a
    /// re-derivation of `bmi` and `verdict`.
    pub fn changes_measurements(&self) -> bool {
        self.height.is_some() || self.weight.is_some()
    }

    /// Overlays the present fields onto `record`, re-deriving `bmi` and
    /// `verdict` when a measurement changed.
    ///
    /// The patch must already have passed [`validate`](Self::validate).
    pub fn apply_to(&self, record: &mut PatientRecord) -> PatientResult<()> {
        if let Some(name) = &self.name {
            record.name = name.clone();
        }
        if let Some(city) = &self.city {
            record.city = city.clone();
        }
        if let Some(age) = self.age {
            record.age = age;
        }
        if let Some(gender) = self.gender {
            record.gender = gender;
        }
        if let Some(height) = self.height {
            record.height = height;
        }
        if let Some(weight) = self.weight {
            record.weight = weight;
        }

        if self.changes_measurements() {
            record.bmi = metrics::compute_bmi(record.height, record.weight)?;
            record.verdict = Verdict::from_bmi(record.bmi);
        }

        Ok(())
    }
}

fn validate_id(id: &str) -> PatientResult<()> {
    if id.trim().is_empty() {
        return Err(PatientError::validation("id", "id cannot be empty"));
    }
    Ok(())
}

fn validate_name(name: &str) -> PatientResult<()> {
    if name.trim().is_empty() {
        return Err(PatientError::validation("name", "name cannot be empty"));
    }
    Ok(())
}

fn validate_age(age: u32) -> PatientResult<()> {
    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(PatientError::validation(
            "age",
            format!("age must be between {MIN_AGE} and {MAX_AGE}, got {age}"),
        ));
    }
    Ok(())
}

fn validate_measurement(field: &'static str, value: f64) -> PatientResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(PatientError::validation(
            field,
            format!("{field} must be greater than zero, got {value}"),
        ));
    }
    Ok(())
}
