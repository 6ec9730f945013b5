use thiserror::Error;

use crate::models::{
    PatientId, RatingAggregate, RatingRecord, RatingSummary, SessionSnapshot, SessionStatus,
    SubmitRatingRequest, TherapistId,
};
use crate::services::{RecommendationStore, StoreError};

/// Smoothing constant used when none is configured
pub const DEFAULT_SMOOTHING_K: u32 = 5;

/// Prior used when the system has no ratings at all
pub const DEFAULT_GLOBAL_AVERAGE: f64 = 3.0;

/// Compute a Bayesian-smoothed rating for one therapist
///
/// The therapist's mean is pulled toward `global_average` with weight
/// `k / (n + k)`, so small samples stay close to the prior. Scores outside
/// 1..=5 are ignored.
pub fn aggregate_ratings(scores: &[u8], global_average: f64, smoothing_k: u32) -> RatingSummary {
    let valid: Vec<f64> = scores
        .iter()
        .filter(|s| (1..=5).contains(*s))
        .map(|s| f64::from(*s))
        .collect();

    let n = valid.len();
    let avg = if n == 0 { 0.0 } else { valid.iter().sum::<f64>() / n as f64 };

    let raw_bayes = if n == 0 {
        global_average
    } else {
        let n_f = n as f64;
        let k_f = f64::from(smoothing_k);
        (n_f / (n_f + k_f)) * avg + (k_f / (n_f + k_f)) * global_average
    };

    RatingSummary {
        normalized: (raw_bayes / 5.0).clamp(0.0, 1.0),
        raw_bayes,
        n,
        avg,
        global_avg: global_average,
        k: smoothing_k,
    }
}

/// Errors raised when a rating submission breaks the submission rules
#[derive(Debug, Error)]
pub enum RatingError {
    #[error("Score must be between 1 and 5, got {0}")]
    InvalidScore(u8),

    #[error("Session not found: {0}")]
    SessionNotFound(i32),

    #[error("Session {0} does not belong to this patient")]
    NotSessionOwner(i32),

    #[error("Session {0} was not with this therapist")]
    TherapistMismatch(i32),

    #[error("Session {0} is not completed")]
    SessionNotCompleted(i32),

    #[error("Session {0} has already been rated")]
    AlreadyRated(i32),

    #[error("No completed session found with this therapist")]
    NoCompletedSession,

    #[error("Patient not found: {0}")]
    PatientNotFound(i32),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Check a submission against the session it refers to
///
/// `session` is the looked-up session when the submission names one;
/// `has_completed_session` is consulted only when it does not.
pub fn validate_submission(
    score: u8,
    patient_id: PatientId,
    therapist_id: TherapistId,
    session_id: Option<i32>,
    session: Option<&SessionSnapshot>,
    has_completed_session: bool,
) -> Result<(), RatingError> {
    if !(1..=5).contains(&score) {
        return Err(RatingError::InvalidScore(score));
    }

    match session_id {
        Some(id) => {
            let session = session.ok_or(RatingError::SessionNotFound(id))?;
            if session.patient_id != patient_id {
                return Err(RatingError::NotSessionOwner(id));
            }
            if session.therapist_id != therapist_id {
                return Err(RatingError::TherapistMismatch(id));
            }
            if session.status != SessionStatus::Completed {
                return Err(RatingError::SessionNotCompleted(id));
            }
            if session.already_rated {
                return Err(RatingError::AlreadyRated(id));
            }
            Ok(())
        }
        None if has_completed_session => Ok(()),
        None => Err(RatingError::NoCompletedSession),
    }
}

/// Validate and store a rating, returning the therapist's refreshed aggregate
pub async fn submit_rating(
    store: &dyn RecommendationStore,
    request: &SubmitRatingRequest,
) -> Result<RatingAggregate, RatingError> {
    if store.find_patient(request.patient_id).await?.is_none() {
        return Err(RatingError::PatientNotFound(request.patient_id));
    }

    let (session, has_completed) = match request.session_id {
        Some(id) => (store.find_session(id).await?, false),
        None => (
            None,
            store
                .has_completed_session(request.patient_id, request.therapist_id)
                .await?,
        ),
    };

    validate_submission(
        request.score,
        request.patient_id,
        request.therapist_id,
        request.session_id,
        session.as_ref(),
        has_completed,
    )?;

    let aggregate = store
        .insert_rating(RatingRecord {
            therapist_id: request.therapist_id,
            patient_id: request.patient_id,
            session_id: request.session_id,
            score: request.score,
            comment: request.comment.clone(),
            created_at: chrono::Utc::now(),
        })
        .await?;

    tracing::info!(
        "Stored rating {} for therapist {} (count: {}, average: {:?})",
        request.score,
        request.therapist_id,
        aggregate.rating_count,
        aggregate.average_rating
    );

    Ok(aggregate)
}

/// Load a therapist's ratings and the global prior, then aggregate
pub async fn rating_score(
    store: &dyn RecommendationStore,
    therapist_id: TherapistId,
    default_global_average: f64,
    smoothing_k: u32,
) -> Result<RatingSummary, StoreError> {
    let global = store
        .global_rating_average()
        .await?
        .unwrap_or(default_global_average);
    let scores = store.therapist_ratings(therapist_id).await?;
    Ok(aggregate_ratings(&scores, global, smoothing_k))
}
