use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;

use crate::core::{submit_rating, RatingError};
use crate::models::{RatingScoreResponse, SubmitRatingRequest, SubmitRatingResponse, TherapistId};
use crate::routes::{error_response, AppState};
use crate::services::StoreError;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/ratings/therapist/{therapist_id}/score",
        web::get().to(rating_score),
    )
    .route("/ratings", web::post().to(submit));
}

/// Bayesian rating score for a therapist
///
/// GET /api/v1/ratings/therapist/{therapistId}/score
async fn rating_score(state: web::Data<AppState>, path: web::Path<TherapistId>) -> impl Responder {
    let therapist_id = path.into_inner();

    match state.recommender.rating_score(therapist_id).await {
        Ok(summary) => HttpResponse::Ok().json(RatingScoreResponse::new(therapist_id, summary)),
        Err(e) => {
            tracing::error!("Failed to score ratings for therapist {}: {}", therapist_id, e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to load ratings",
                e,
            )
        }
    }
}

/// Submit a rating for a therapist
///
/// POST /api/v1/ratings
///
/// Request body:
/// ```json
/// {
///   "patientId": 12,
///   "therapistId": 3,
///   "sessionId": 41,
///   "score": 5,
///   "comment": "string"
/// }
/// ```
async fn submit(state: web::Data<AppState>, req: web::Json<SubmitRatingRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for rating submission: {:?}", errors);
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    match submit_rating(state.recommender.store(), &req).await {
        Ok(aggregate) => HttpResponse::Created().json(SubmitRatingResponse {
            success: true,
            aggregate,
        }),
        Err(e) => {
            let status = rating_error_status(&e);
            if status.is_server_error() {
                tracing::error!("Failed to store rating: {}", e);
            } else {
                tracing::info!("Rejected rating submission: {}", e);
            }
            error_response(status, "Rating rejected", e)
        }
    }
}

fn rating_error_status(error: &RatingError) -> StatusCode {
    match error {
        RatingError::InvalidScore(_)
        | RatingError::TherapistMismatch(_)
        | RatingError::SessionNotCompleted(_) => StatusCode::BAD_REQUEST,
        RatingError::SessionNotFound(_) | RatingError::PatientNotFound(_) => StatusCode::NOT_FOUND,
        RatingError::NotSessionOwner(_) | RatingError::NoCompletedSession => StatusCode::FORBIDDEN,
        RatingError::AlreadyRated(_) | RatingError::Store(StoreError::InvalidData(_)) => {
            StatusCode::CONFLICT
        }
        RatingError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
