//! Feature engineering for the premium model.
//!
//! Maps a validated [`UserProfile`] onto the fixed [`FeatureVector`] the
//! pretrained model was trained against: unrounded BMI, an age-group
//! bucket, a lifestyle-risk flag and a city tier from the fixed tier
//! tables. The encodings here must stay in lockstep with the model
//! artifact; changing a bucket boundary silently changes predictions.

use crate::{PredictError, PredictResult};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Tier 1 cities (metro).
const TIER_1_CITIES: &[&str] = &[
    "Islamabad",
    "Karachi",
    "Lahore",
    "Peshawar",
    "Quetta",
    "Rawalpindi",
    "Faisalabad",
];

/// Tier 2 cities (developed but smaller than tier 1).
const TIER_2_CITIES: &[&str] = &[
    "Multan",
    "Gujranwala",
    "Hyderabad",
    "Sialkot",
    "Bahawalpur",
    "Sargodha",
    "Sukkur",
    "Larkana",
    "Sheikhupura",
    "Abbottabad",
    "Jhelum",
    "Gujrat",
    "Mardan",
    "Kasur",
    "Okara",
    "Sahiwal",
    "Turbat",
    "Mingora",
    "Nawabshah",
    "Chiniot",
    "Kohat",
    "Muzaffarabad",
    "Gilgit",
    "Kotli",
    "Skardu",
    "Khuzdar",
    "Bannu",
    "Gwadar",
    "Jhang",
    "Hafizabad",
    "Kamoke",
    "Jacobabad",
    "Shikarpur",
    "Charsadda",
    "Mansehra",
    "Narowal",
    "Vehari",
    "Layyah",
    "Attock",
    "Lodhran",
    "Badin",
    "Khanewal",
    "Bhakkar",
    "Haripur",
    "Swabi",
    "Jamshoro",
    "Gojra",
    "Chakwal",
    "Jaranwala",
    "Khanpur",
    "Kamalia",
    "Daska",
    "Nowshera",
    "Thatta",
    "Pakpattan",
    // "Jaccobabad" is a misspelling, but it is part of the model's
    // training vocabulary alongside "Jacobabad" and must stay tier 2.
    "Jaccobabad",
    "Samundri",
    "Muridke",
    "Mianwali",
    "Kandhkot",
    "Shahdadpur",
    "Shahkot",
    "Arifwala",
    "Pattoki",
    "Hangu",
    "Burewala",
    "Jatoi",
];

/// Occupation vocabulary accepted by the model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Occupation {
    Retired,
    Freelancer,
    Student,
    GovernmentJob,
    BusinessOwner,
    Unemployed,
    PrivateJob,
}

/// Inbound prediction request.
#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct UserProfile {
    pub age: u32,
    /// Weight in kilograms.
    pub weight: f64,
    /// Height in metres.
    pub height: f64,
    /// Annual income in lakhs per annum.
    pub income_lpa: f64,
    pub smoker: bool,
    pub city: String,
    pub occupation: Occupation,
}

impl UserProfile {
    /// Checks every field constraint before any feature is derived.
    ///
    /// # Errors
    ///
    /// Returns `PredictError::Validation` naming the offending field.
    pub fn validate(&self) -> PredictResult<()> {
        if !(1..=119).contains(&self.age) {
            return Err(PredictError::validation(
                "age",
                format!("age must be between 1 and 119, got {}", self.age),
            ));
        }
        if !self.weight.is_finite() || self.weight <= 0.0 {
            return Err(PredictError::validation(
                "weight",
                format!("weight must be greater than zero, got {}", self.weight),
            ));
        }
        if !self.height.is_finite() || self.height <= 0.0 || self.height >= 2.5 {
            return Err(PredictError::validation(
                "height",
                format!("height must be between 0 and 2.5 metres, got {}", self.height),
            ));
        }
        if !self.income_lpa.is_finite() || self.income_lpa <= 0.0 {
            return Err(PredictError::validation(
                "income_lpa",
                format!("income_lpa must be greater than zero, got {}", self.income_lpa),
            ));
        }
        Ok(())
    }
}

/// Age bucket the model was trained on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AgeGroup {
    Young,
    Adult,
    MiddleAged,
    Senior,
}

impl AgeGroup {
    pub fn from_age(age: u32) -> Self {
        if age < 25 {
            AgeGroup::Young
        } else if age < 45 {
            AgeGroup::Adult
        } else if age < 60 {
            AgeGroup::MiddleAged
        } else {
            AgeGroup::Senior
        }
    }
}

/// Combined smoking/BMI risk flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LifestyleRisk {
    Low,
    Medium,
    High,
}

impl LifestyleRisk {
    pub fn assess(smoker: bool, bmi: f64) -> Self {
        if smoker && bmi > 30.0 {
            LifestyleRisk::High
        } else if smoker || bmi > 27.0 {
            LifestyleRisk::Medium
        } else {
            LifestyleRisk::Low
        }
    }
}

/// Tier of a city: 1 for metro, 2 for developed, 3 for everything else.
pub fn city_tier(city: &str) -> u8 {
    if TIER_1_CITIES.contains(&city) {
        1
    } else if TIER_2_CITIES.contains(&city) {
        2
    } else {
        3
    }
}

/// The exact input shape the premium model consumes.
///
/// `bmi` is deliberately unrounded here; the two-decimal rounding of the
/// patient subsystem is a presentation rule, not a model input rule.
#[derive(Clone, Debug, Serialize)]
pub struct FeatureVector {
    pub bmi: f64,
    pub age_group: AgeGroup,
    pub lifestyle_risk: LifestyleRisk,
    pub city_tier: u8,
    pub income_lpa: f64,
    pub city: String,
    pub occupation: Occupation,
}

impl FeatureVector {
    /// Validates the profile and derives the engineered features.
    ///
    /// # Errors
    ///
    /// Returns `PredictError::Validation` if the profile is out of range.
    pub fn from_profile(profile: &UserProfile) -> PredictResult<Self> {
        profile.validate()?;

        let bmi = profile.weight / (profile.height * profile.height);
        Ok(Self {
            bmi,
            age_group: AgeGroup::from_age(profile.age),
            lifestyle_risk: LifestyleRisk::assess(profile.smoker, bmi),
            city_tier: city_tier(&profile.city),
            income_lpa: profile.income_lpa,
            city: profile.city.clone(),
            occupation: profile.occupation,
        })
    }
}
