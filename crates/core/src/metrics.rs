//! Derived health metrics.
//!
//! Pure functions computing BMI and its verdict category. These are the
//! only places in the system that know the BMI formula and the threshold
//! table, so every stored record derives its fields through here.

use crate::error::{PatientError, PatientResult};
use crate::patient::Verdict;

/// Computes BMI (weight in kg / height in m, squared), rounded to two
/// decimal places.
///
/// Rounding is ties-to-even so that results match the service's
/// historical behaviour (e.g. 15.625 rounds to 15.62, not 15.63).
///
/// # Errors
///
/// Returns `PatientError::Validation` if either measurement is not a
/// finite positive number.
pub fn compute_bmi(height: f64, weight: f64) -> PatientResult<f64> {
    if !height.is_finite() || height <= 0.0 {
        return Err(PatientError::validation(
            "height",
            format!("height must be greater than zero, got {height}"),
        ));
    }
    if !weight.is_finite() || weight <= 0.0 {
        return Err(PatientError::validation(
            "weight",
            format!("weight must be greater than zero, got {weight}"),
        ));
    }

    Ok(round2(weight / (height * height)))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

impl Verdict {
    /// Classifies a BMI value using inclusive lower bounds, so boundary
    /// values fall into the higher category:
    ///
    /// | BMI         | Verdict     |
    /// |-------------|-------------|
    /// | < 18.5      | Underweight |
    /// | 18.5 – 24.9 | Normal      |
    /// | 25 – 29.9   | Overweight  |
    /// | ≥ 30        | Obese       |
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            Verdict::Underweight
        } else if bmi < 25.0 {
            Verdict::Normal
        } else if bmi < 30.0 {
            Verdict::Overweight
        } else {
            Verdict::Obese
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bmi_matches_formula() {
        assert_eq!(compute_bmi(1.75, 85.0).unwrap(), 27.76);
        assert_eq!(compute_bmi(1.75, 60.0).unwrap(), 19.59);
        assert_eq!(compute_bmi(2.0, 100.0).unwrap(), 25.0);
    }

    #[test]
    fn bmi_rounds_ties_to_even() {
        // 40 / 1.6² = 15.625 exactly
        assert_eq!(compute_bmi(1.6, 40.0).unwrap(), 15.62);
    }

    #[test]
    fn bmi_rejects_nonpositive_height() {
        for height in [0.0, -1.2, f64::NAN] {
            let err = compute_bmi(height, 70.0).unwrap_err();
            assert!(matches!(err, PatientError::Validation { field: "height", .. }));
        }
    }

    #[test]
    fn bmi_rejects_nonpositive_weight() {
        let err = compute_bmi(1.7, 0.0).unwrap_err();
        assert!(matches!(err, PatientError::Validation { field: "weight", .. }));
    }

    #[test]
    fn verdict_thresholds_are_inclusive_at_the_top() {
        assert_eq!(Verdict::from_bmi(18.49), Verdict::Underweight);
        assert_eq!(Verdict::from_bmi(18.5), Verdict::Normal);
        assert_eq!(Verdict::from_bmi(24.9), Verdict::Normal);
        assert_eq!(Verdict::from_bmi(25.0), Verdict::Overweight);
        assert_eq!(Verdict::from_bmi(29.9), Verdict::Overweight);
        assert_eq!(Verdict::from_bmi(30.0), Verdict::Obese);
        assert_eq!(Verdict::from_bmi(55.3), Verdict::Obese);
    }

    #[test]
    fn verdict_is_total_over_nonnegative_values() {
        assert_eq!(Verdict::from_bmi(0.0), Verdict::Underweight);
        assert_eq!(Verdict::from_bmi(f64::MAX), Verdict::Obese);
    }
}
