use futures::future::join_all;
use std::cmp::Ordering;
use std::sync::Arc;
use thiserror::Error;

use crate::core::{
    availability::score_availability,
    budget::score_budget,
    categorical::{match_desired_service, match_service_area, match_specialization},
    experience::ExperienceNormalizer,
    rating::{aggregate_ratings, rating_score},
};
use crate::models::{
    AvailabilityBlock, Dimension, MatchResult, PatientId, PatientPreferences, RatingSummary,
    ScoreBreakdown, ScoringWeights, TherapistCandidate, TherapistId,
};
use crate::services::{RecommendationStore, StoreError};

/// Errors that prevent a recommendation request from producing a ranking
#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("Failed to load patient {0}: {1}")]
    PatientLookup(PatientId, StoreError),

    #[error("Failed to load candidate pool: {0}")]
    CandidatePool(StoreError),
}

/// Rating aggregation settings
#[derive(Debug, Clone, Copy)]
pub struct RatingSettings {
    pub smoothing_k: u32,
    pub default_global_average: f64,
}

impl Default for RatingSettings {
    fn default() -> Self {
        Self {
            smoothing_k: crate::core::rating::DEFAULT_SMOOTHING_K,
            default_global_average: crate::core::rating::DEFAULT_GLOBAL_AVERAGE,
        }
    }
}

/// Per-request parameters
#[derive(Debug, Clone)]
pub struct RecommendParams {
    /// Values below 1 are treated as 1
    pub top: i32,
    /// Overrides the engine's configured weights
    pub weights: Option<ScoringWeights>,
    /// Used instead of the patient's stored preferences when set
    pub preferences: Option<PatientPreferences>,
}

impl Default for RecommendParams {
    fn default() -> Self {
        Self {
            top: 5,
            weights: None,
            preferences: None,
        }
    }
}

/// Ranked output of one recommendation request
#[derive(Debug)]
pub struct Recommendations {
    pub matches: Vec<MatchResult>,
    pub total_candidates: usize,
}

impl Recommendations {
    fn empty() -> Self {
        Self {
            matches: Vec::new(),
            total_candidates: 0,
        }
    }
}

/// Population statistics shared by every candidate in one request.
/// `None` means the statistic could not be loaded and its dimension scores 0.
struct RequestContext<'a> {
    preferences: Option<&'a PatientPreferences>,
    max_years: Option<i32>,
    global_rating_average: Option<f64>,
}

/// Recommendation orchestrator
///
/// # Pipeline
/// 1. Resolve the patient and effective preferences
/// 2. Load the bookable candidate pool
/// 3. Score every candidate on the six dimensions (concurrently)
/// 4. Weighted sum, rank, and truncate to top-N
#[derive(Clone)]
pub struct Recommender {
    store: Arc<dyn RecommendationStore>,
    weights: ScoringWeights,
    experience: ExperienceNormalizer,
    rating: RatingSettings,
}

impl Recommender {
    pub fn new(
        store: Arc<dyn RecommendationStore>,
        weights: ScoringWeights,
        experience: ExperienceNormalizer,
        rating: RatingSettings,
    ) -> Self {
        Self {
            store,
            weights,
            experience,
            rating,
        }
    }

    pub fn weights(&self) -> ScoringWeights {
        self.weights
    }

    pub fn store(&self) -> &dyn RecommendationStore {
        self.store.as_ref()
    }

    /// Rank bookable therapists for a patient
    ///
    /// An unknown patient or an empty candidate pool yields an empty list.
    /// A failure inside one dimension zeroes that dimension for the affected
    /// candidate and never aborts the request.
    pub async fn recommend(
        &self,
        patient_id: PatientId,
        params: RecommendParams,
    ) -> Result<Recommendations, RecommendError> {
        let patient = self
            .store
            .find_patient(patient_id)
            .await
            .map_err(|e| RecommendError::PatientLookup(patient_id, e))?;

        let Some(patient) = patient else {
            tracing::info!("Patient {} not found, returning no recommendations", patient_id);
            return Ok(Recommendations::empty());
        };

        let preferences = params.preferences.or(patient.preferences);
        let weights = params.weights.unwrap_or(self.weights).normalized();

        let candidates = self
            .store
            .bookable_therapists()
            .await
            .map_err(RecommendError::CandidatePool)?;

        let total_candidates = candidates.len();
        if candidates.is_empty() {
            tracing::info!("No bookable therapists for patient {}", patient_id);
            return Ok(Recommendations::empty());
        }

        let context = RequestContext {
            preferences: preferences.as_ref(),
            max_years: self.load_max_years().await,
            global_rating_average: self.load_global_average().await,
        };

        let mut matches: Vec<MatchResult> = join_all(
            candidates
                .into_iter()
                .map(|candidate| self.evaluate(candidate, &context, &weights)),
        )
        .await;

        rank(&mut matches);
        matches.truncate(params.top.max(1) as usize);

        tracing::info!(
            "Returning {} recommendations for patient {} (from {} candidates)",
            matches.len(),
            patient_id,
            total_candidates
        );

        Ok(Recommendations {
            matches,
            total_candidates,
        })
    }

    /// Availability score for one therapist against a patient's stored preferences
    pub async fn availability_score(
        &self,
        therapist_id: TherapistId,
        patient_id: PatientId,
    ) -> Result<f64, StoreError> {
        let blocks = self.store.therapist_availability(therapist_id).await?;
        let preferences = self
            .store
            .find_patient(patient_id)
            .await?
            .and_then(|p| p.preferences);
        Ok(score_availability(&blocks, preferences.as_ref()))
    }

    pub async fn therapist_availability(
        &self,
        therapist_id: TherapistId,
    ) -> Result<Vec<AvailabilityBlock>, StoreError> {
        self.store.therapist_availability(therapist_id).await
    }

    /// Bayesian rating summary for one therapist
    pub async fn rating_score(&self, therapist_id: TherapistId) -> Result<RatingSummary, StoreError> {
        rating_score(
            self.store.as_ref(),
            therapist_id,
            self.rating.default_global_average,
            self.rating.smoothing_k,
        )
        .await
    }

    async fn load_max_years(&self) -> Option<i32> {
        match self.experience.population_max_years(self.store.as_ref()).await {
            Ok(max_years) => Some(max_years),
            Err(e) => {
                tracing::warn!(
                    "Failed to derive population max years, experience scores default to 0: {}",
                    e
                );
                None
            }
        }
    }

    async fn load_global_average(&self) -> Option<f64> {
        match self.store.global_rating_average().await {
            Ok(avg) => Some(avg.unwrap_or(self.rating.default_global_average)),
            Err(e) => {
                tracing::warn!(
                    "Failed to load global rating average, rating scores default to 0: {}",
                    e
                );
                None
            }
        }
    }

    async fn evaluate(
        &self,
        candidate: TherapistCandidate,
        context: &RequestContext<'_>,
        weights: &ScoringWeights,
    ) -> MatchResult {
        let id = candidate.id;
        let preferences = context.preferences;

        let availability = or_dimension_default(
            id,
            Dimension::Availability,
            self.store
                .therapist_availability(id)
                .await
                .map(|blocks| score_availability(&blocks, preferences)),
        );

        let experience = context
            .max_years
            .map(|max| self.experience.score(candidate.years_of_experience, max))
            .unwrap_or(0.0);

        let rating = match context.global_rating_average {
            Some(global) => or_dimension_default(
                id,
                Dimension::Rating,
                self.store
                    .therapist_ratings(id)
                    .await
                    .map(|scores| aggregate_ratings(&scores, global, self.rating.smoothing_k).normalized),
            ),
            None => 0.0,
        };

        let budget = score_budget(
            candidate.fee_per_session,
            preferences.and_then(|p| p.session_budget),
        );

        let specialization = match_specialization(
            &candidate.specializations,
            preferences.and_then(|p| p.preferred_specialization.as_deref()),
        );

        let desired_service = match_desired_service(
            &candidate.conditions_treated,
            candidate.other_conditions_treated.as_deref(),
            preferences.and_then(|p| p.desired_service.as_deref()),
        );

        let service_area_match = match_service_area(
            &candidate.service_areas,
            preferences.and_then(|p| p.preferred_barangay.as_deref()),
        );

        let breakdown = ScoreBreakdown {
            availability,
            experience,
            rating,
            budget,
            specialization,
            desired_service,
        };

        MatchResult {
            therapist_id: id,
            therapist_name: candidate.name,
            score: breakdown.weighted_score(weights),
            breakdown,
            service_area_match,
            years_of_experience: candidate.years_of_experience,
            average_rating: candidate.average_rating,
            rating_count: candidate.rating_count,
            fee_per_session: candidate.fee_per_session,
            specializations: candidate.specializations,
            service_areas: candidate.service_areas,
        }
    }
}

impl std::fmt::Debug for Recommender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recommender")
            .field("weights", &self.weights)
            .field("experience", &self.experience)
            .field("rating", &self.rating)
            .finish()
    }
}

/// Collapse a failed dimension to 0.0, logging the failure
fn or_dimension_default(
    therapist_id: TherapistId,
    dimension: Dimension,
    result: Result<f64, StoreError>,
) -> f64 {
    result.unwrap_or_else(|e| {
        tracing::warn!(
            "Scoring {} failed for therapist {}, using 0.0: {}",
            dimension,
            therapist_id,
            e
        );
        0.0
    })
}

/// Sort by score (descending), then rating dimension (descending), then id
fn rank(matches: &mut [MatchResult]) {
    matches.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                b.breakdown
                    .rating
                    .partial_cmp(&a.breakdown.rating)
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| a.therapist_id.cmp(&b.therapist_id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(id: TherapistId, score: f64, rating: f64) -> MatchResult {
        MatchResult {
            therapist_id: id,
            therapist_name: format!("Therapist {}", id),
            score,
            breakdown: ScoreBreakdown {
                rating,
                ..Default::default()
            },
            service_area_match: 0.5,
            years_of_experience: 0,
            average_rating: None,
            rating_count: 0,
            fee_per_session: None,
            specializations: vec![],
            service_areas: vec![],
        }
    }

    #[test]
    fn test_rank_by_score_then_rating_then_id() {
        let mut matches = vec![
            result(3, 0.7, 0.6),
            result(1, 0.9, 0.1),
            result(4, 0.7, 0.9),
            result(2, 0.7, 0.6),
        ];

        rank(&mut matches);

        let ids: Vec<_> = matches.iter().map(|m| m.therapist_id).collect();
        assert_eq!(ids, vec![1, 4, 2, 3]);
    }

    #[test]
    fn test_dimension_failure_collapses_to_zero() {
        let score = or_dimension_default(
            7,
            Dimension::Availability,
            Err(StoreError::Unavailable("timeout".into())),
        );
        assert_eq!(score, 0.0);
        assert_eq!(or_dimension_default(7, Dimension::Rating, Ok(0.8)), 0.8);
    }
}
