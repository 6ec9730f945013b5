use actix_web::{http::StatusCode, web, HttpResponse, Responder};

use crate::core::{RecommendError, RecommendParams};
use crate::models::{
    HealthResponse, PatientId, RecommendQuery, RecommendRequest, RecommendationsResponse,
};
use crate::routes::{error_response, AppState};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/recommendations/{patient_id}", web::get().to(recommend))
        .route(
            "/recommendations/{patient_id}",
            web::post().to(recommend_with_preferences),
        );
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = state
        .recommender
        .store()
        .health_check()
        .await
        .unwrap_or(false);

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Recommend therapists using the patient's stored preferences
///
/// GET /api/v1/recommendations/{patientId}?top=5&availability=0.3&rating=0.2
///
/// Any weight left out of the query keeps its configured value.
async fn recommend(
    state: web::Data<AppState>,
    path: web::Path<PatientId>,
    query: web::Query<RecommendQuery>,
) -> impl Responder {
    let patient_id = path.into_inner();
    let weights = query
        .has_weight_override()
        .then(|| query.weights_over(state.recommender.weights()));

    let params = RecommendParams {
        top: state.effective_top(query.top),
        weights,
        preferences: None,
    };

    run_recommendation(&state, patient_id, params).await
}

/// Recommend therapists against an explicit preferences override
///
/// POST /api/v1/recommendations/{patientId}?top=5
///
/// Request body:
/// ```json
/// {
///   "preferences": { "preferredDayOfWeek": "Monday", "sessionBudget": 1000 },
///   "weights": { "availability": 0.5 }
/// }
/// ```
async fn recommend_with_preferences(
    state: web::Data<AppState>,
    path: web::Path<PatientId>,
    query: web::Query<RecommendQuery>,
    body: web::Json<RecommendRequest>,
) -> impl Responder {
    let patient_id = path.into_inner();
    let body = body.into_inner();

    let weights = body.weights.or_else(|| {
        query
            .has_weight_override()
            .then(|| query.weights_over(state.recommender.weights()))
    });

    let params = RecommendParams {
        top: state.effective_top(query.top),
        weights,
        preferences: body.preferences,
    };

    run_recommendation(&state, patient_id, params).await
}

async fn run_recommendation(
    state: &AppState,
    patient_id: PatientId,
    params: RecommendParams,
) -> HttpResponse {
    tracing::info!(
        "Recommending therapists for patient {} (top: {})",
        patient_id,
        params.top
    );

    match state.recommender.recommend(patient_id, params).await {
        Ok(result) => HttpResponse::Ok().json(RecommendationsResponse {
            patient_id,
            recommendations: result.matches,
            total_candidates: result.total_candidates,
        }),
        Err(e) => {
            tracing::error!("Recommendation failed for patient {}: {}", patient_id, e);
            let error = match e {
                RecommendError::PatientLookup(..) => "Failed to load patient",
                RecommendError::CandidatePool(_) => "Failed to load therapists",
            };
            error_response(StatusCode::INTERNAL_SERVER_ERROR, error, e)
        }
    }
}
