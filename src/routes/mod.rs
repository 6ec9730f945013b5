// Route exports
pub mod availability;
pub mod ratings;
pub mod recommendations;

use actix_web::{http::StatusCode, web, HttpResponse};

use crate::core::Recommender;
use crate::models::ErrorResponse;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub recommender: Recommender,
    pub default_top: i32,
    pub max_top: i32,
}

impl AppState {
    pub fn new(recommender: Recommender, default_top: i32, max_top: i32) -> Self {
        Self {
            recommender,
            default_top,
            max_top,
        }
    }

    /// Clamp a requested top-N into `1..=max_top`
    pub fn effective_top(&self, requested: Option<i32>) -> i32 {
        requested
            .unwrap_or(self.default_top)
            .clamp(1, self.max_top.max(1))
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(recommendations::configure)
            .configure(ratings::configure)
            .configure(availability::configure),
    );
}

pub(crate) fn error_response(status: StatusCode, error: &str, message: impl ToString) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message: message.to_string(),
        status_code: status.as_u16(),
    })
}
