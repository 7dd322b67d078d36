//! # PMS Predict
//!
//! Premium-category prediction boundary.
//!
//! The pretrained model is an external collaborator: this crate owns the
//! call contract only. It validates the inbound profile, engineers the
//! fixed feature vector the model consumes (BMI, age group, lifestyle
//! risk, city tier) and exposes the [`PremiumModel`] trait seam. Model
//! training and artifact persistence live outside the system.

pub mod features;
pub mod model;

pub use features::{AgeGroup, FeatureVector, LifestyleRisk, Occupation, UserProfile};
pub use model::{predict_premium, Prediction, PremiumModel, RuleModel};

/// Errors raised at the prediction boundary.
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },
    /// Any model-invocation failure, deliberately opaque: internal model
    /// errors never propagate to callers.
    #[error("prediction model unavailable: {0}")]
    Unavailable(String),
}

impl PredictError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}

pub type PredictResult<T> = std::result::Result<T, PredictError>;
