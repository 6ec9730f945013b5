use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    AvailabilityBlock, Patient, PatientId, RatingAggregate, RatingRecord, SessionId,
    SessionSnapshot, TherapistCandidate, TherapistId,
};

/// Errors raised by a recommendation data source
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Read (and rating-write) access to the marketplace data the recommender needs
///
/// Implementations must not hold locks across their own awaits; the engine
/// calls these concurrently for different candidates.
#[async_trait]
pub trait RecommendationStore: Send + Sync {
    /// Look up a patient and their stored preferences
    async fn find_patient(&self, patient_id: PatientId) -> Result<Option<Patient>, StoreError>;

    /// Therapists that are verified and have completed onboarding
    async fn bookable_therapists(&self) -> Result<Vec<TherapistCandidate>, StoreError>;

    /// All availability blocks for a therapist, ordered by day then start time
    async fn therapist_availability(
        &self,
        therapist_id: TherapistId,
    ) -> Result<Vec<AvailabilityBlock>, StoreError>;

    /// Raw 1..5 scores submitted for a therapist
    async fn therapist_ratings(&self, therapist_id: TherapistId) -> Result<Vec<u8>, StoreError>;

    /// Mean score across every rating in the system, `None` if there are none
    async fn global_rating_average(&self) -> Result<Option<f64>, StoreError>;

    /// Largest years-of-experience across all therapists, `None` if there are none
    async fn max_years_of_experience(&self) -> Result<Option<i32>, StoreError>;

    async fn find_session(&self, session_id: SessionId) -> Result<Option<SessionSnapshot>, StoreError>;

    async fn has_completed_session(
        &self,
        patient_id: PatientId,
        therapist_id: TherapistId,
    ) -> Result<bool, StoreError>;

    /// Store a rating and recompute the therapist's denormalized aggregate
    async fn insert_rating(&self, rating: RatingRecord) -> Result<RatingAggregate, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError>;
}
