//! The premium model call contract.
//!
//! [`PremiumModel`] is the seam between the service and the external
//! pretrained artifact: implementations take the engineered
//! [`FeatureVector`] and answer with one of the model's trained class
//! labels. Failures cross the boundary only as the opaque
//! [`PredictError::Unavailable`](crate::PredictError::Unavailable).

use crate::features::{AgeGroup, FeatureVector, LifestyleRisk};
use crate::{PredictError, PredictResult, UserProfile};
use serde::Serialize;
use utoipa::ToSchema;

/// Categorical model output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct Prediction {
    /// One of the model's trained class labels (low/medium/high).
    pub predicted_category: String,
}

/// Call contract for the pretrained premium classifier.
pub trait PremiumModel: Send + Sync {
    /// Predicts the premium risk category for one feature vector.
    ///
    /// # Errors
    ///
    /// Implementations must surface every invocation failure as
    /// `PredictError::Unavailable`; internal model errors never leak.
    fn predict(&self, features: &FeatureVector) -> PredictResult<Prediction>;
}

/// Convenience: validates a profile, engineers its features and invokes
/// the model in one step.
pub fn predict_premium(
    model: &dyn PremiumModel,
    profile: &UserProfile,
) -> PredictResult<Prediction> {
    let features = FeatureVector::from_profile(profile)?;
    let prediction = model.predict(&features)?;
    tracing::debug!(category = %prediction.predicted_category, "premium predicted");
    Ok(prediction)
}

/// Deterministic baseline model.
///
/// Stands in for the trained artifact so the service runs without it:
/// scores the risk-bearing features and maps the total onto the same
/// low/medium/high label set the artifact emits. Not a substitute for
/// the real model's learned weights.
#[derive(Clone, Copy, Debug, Default)]
pub struct RuleModel;

impl PremiumModel for RuleModel {
    fn predict(&self, features: &FeatureVector) -> PredictResult<Prediction> {
        if !features.bmi.is_finite() {
            return Err(PredictError::Unavailable(
                "feature vector contains non-finite bmi".into(),
            ));
        }

        let mut score = match features.lifestyle_risk {
            LifestyleRisk::Low => 0,
            LifestyleRisk::Medium => 1,
            LifestyleRisk::High => 2,
        };
        score += match features.age_group {
            AgeGroup::Young | AgeGroup::Adult => 0,
            AgeGroup::MiddleAged => 1,
            AgeGroup::Senior => 2,
        };
        if features.city_tier == 1 {
            score += 1;
        }

        let category = if score >= 4 {
            "high"
        } else if score >= 2 {
            "medium"
        } else {
            "low"
        };

        Ok(Prediction {
            predicted_category: category.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::Occupation;

    fn profile(age: u32, smoker: bool, city: &str) -> UserProfile {
        UserProfile {
            age,
            weight: 70.0,
            height: 1.75,
            income_lpa: 10.0,
            smoker,
            city: city.into(),
            occupation: Occupation::PrivateJob,
        }
    }

    #[test]
    fn low_risk_profile_predicts_low() {
        let p = profile(30, false, "Nowhere Town");
        let prediction = predict_premium(&RuleModel, &p).unwrap();
        assert_eq!(prediction.predicted_category, "low");
    }

    #[test]
    fn senior_smoker_in_metro_predicts_high() {
        let mut p = profile(65, true, "Karachi");
        p.weight = 95.0; // bmi > 30 with height 1.75
        let prediction = predict_premium(&RuleModel, &p).unwrap();
        assert_eq!(prediction.predicted_category, "high");
    }

    #[test]
    fn middle_band_predicts_medium() {
        let p = profile(50, true, "Nowhere Town");
        let prediction = predict_premium(&RuleModel, &p).unwrap();
        assert_eq!(prediction.predicted_category, "medium");
    }

    #[test]
    fn invalid_profile_fails_before_the_model() {
        struct PanickyModel;
        impl PremiumModel for PanickyModel {
            fn predict(&self, _features: &FeatureVector) -> PredictResult<Prediction> {
                panic!("model must not be invoked for invalid input");
            }
        }

        let mut p = profile(30, false, "Lahore");
        p.height = 0.0;
        let err = predict_premium(&PanickyModel, &p).unwrap_err();
        assert!(matches!(err, PredictError::Validation { .. }));
    }

    #[test]
    fn model_failures_surface_as_unavailable() {
        struct BrokenModel;
        impl PremiumModel for BrokenModel {
            fn predict(&self, _features: &FeatureVector) -> PredictResult<Prediction> {
                Err(PredictError::Unavailable("artifact missing".into()))
            }
        }

        let err = predict_premium(&BrokenModel, &profile(30, false, "Lahore")).unwrap_err();
        assert!(matches!(err, PredictError::Unavailable(_)));
    }
}
