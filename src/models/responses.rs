use serde::{Deserialize, Serialize};

use crate::models::domain::{MatchResult, RatingAggregate, RatingSummary, TherapistId};

/// Response for the recommendation endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationsResponse {
    pub patient_id: i32,
    pub recommendations: Vec<MatchResult>,
    pub total_candidates: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Bayesian rating score for one therapist
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingScoreResponse {
    pub therapist_id: TherapistId,
    pub normalized_score: f64,
    pub raw_bayes: f64,
    pub rating_count: usize,
    pub average: f64,
    pub global_average: f64,
    pub smoothing_k: u32,
}

impl RatingScoreResponse {
    pub fn new(therapist_id: TherapistId, summary: RatingSummary) -> Self {
        Self {
            therapist_id,
            normalized_score: summary.normalized,
            raw_bayes: summary.raw_bayes,
            rating_count: summary.n,
            average: summary.avg,
            global_average: summary.global_avg,
            smoothing_k: summary.k,
        }
    }
}

/// Response after a rating has been stored
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRatingResponse {
    pub success: bool,
    pub aggregate: RatingAggregate,
}

/// Availability score for one therapist/patient pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityScoreResponse {
    pub score: f64,
}
