use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{PatientPreferences, ScoringWeights};

/// Query parameters for the recommendation endpoint
///
/// Every weight is optional; unset weights fall back to the configured
/// baseline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendQuery {
    pub top: Option<i32>,
    pub availability: Option<f64>,
    pub experience: Option<f64>,
    pub rating: Option<f64>,
    pub budget: Option<f64>,
    pub specialization: Option<f64>,
    #[serde(alias = "serviceArea")]
    pub desired_service: Option<f64>,
}

impl RecommendQuery {
    /// Overlay the caller's weight overrides onto `base`
    pub fn weights_over(&self, base: ScoringWeights) -> ScoringWeights {
        ScoringWeights {
            availability: self.availability.unwrap_or(base.availability),
            experience: self.experience.unwrap_or(base.experience),
            rating: self.rating.unwrap_or(base.rating),
            budget: self.budget.unwrap_or(base.budget),
            specialization: self.specialization.unwrap_or(base.specialization),
            desired_service: self.desired_service.unwrap_or(base.desired_service),
        }
    }

    pub fn has_weight_override(&self) -> bool {
        self.availability.is_some()
            || self.experience.is_some()
            || self.rating.is_some()
            || self.budget.is_some()
            || self.specialization.is_some()
            || self.desired_service.is_some()
    }
}

/// Body for a recommendation request that carries an explicit preferences override
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    #[serde(default)]
    pub preferences: Option<PatientPreferences>,
    #[serde(default)]
    pub weights: Option<ScoringWeights>,
}

/// Request to submit a rating
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRatingRequest {
    #[validate(range(min = 1))]
    pub patient_id: i32,
    #[validate(range(min = 1))]
    pub therapist_id: i32,
    #[serde(default)]
    pub session_id: Option<i32>,
    #[validate(range(min = 1, max = 5))]
    pub score: u8,
    #[validate(length(max = 2000))]
    #[serde(default)]
    pub comment: Option<String>,
}
