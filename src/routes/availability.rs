use actix_web::{http::StatusCode, web, HttpResponse, Responder};

use crate::models::{AvailabilityScoreResponse, PatientId, TherapistId};
use crate::routes::{error_response, AppState};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/availability/therapist/{therapist_id}",
        web::get().to(therapist_availability),
    )
    .route(
        "/availability/score/{therapist_id}/{patient_id}",
        web::get().to(availability_score),
    );
}

/// GET /api/v1/availability/therapist/{therapistId}
async fn therapist_availability(
    state: web::Data<AppState>,
    path: web::Path<TherapistId>,
) -> impl Responder {
    let therapist_id = path.into_inner();

    match state.recommender.therapist_availability(therapist_id).await {
        Ok(blocks) => HttpResponse::Ok().json(blocks),
        Err(e) => {
            tracing::error!("Failed to load availability for therapist {}: {}", therapist_id, e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to load availability",
                e,
            )
        }
    }
}

/// Score a therapist's availability against a patient's stored preferences
///
/// GET /api/v1/availability/score/{therapistId}/{patientId}
async fn availability_score(
    state: web::Data<AppState>,
    path: web::Path<(TherapistId, PatientId)>,
) -> impl Responder {
    let (therapist_id, patient_id) = path.into_inner();

    match state
        .recommender
        .availability_score(therapist_id, patient_id)
        .await
    {
        Ok(score) => HttpResponse::Ok().json(AvailabilityScoreResponse { score }),
        Err(e) => {
            tracing::error!(
                "Failed to score availability of therapist {} for patient {}: {}",
                therapist_id,
                patient_id,
                e
            );
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to score availability",
                e,
            )
        }
    }
}
