use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use agapay_match::config::{LogFormat, LoggingSettings, Settings, StoreBackend};
use agapay_match::core::{ExperienceNormalizer, RatingSettings, Recommender};
use agapay_match::models::ScoringWeights;
use agapay_match::routes::{self, AppState};
use agapay_match::services::{MemoryStore, PopulationStatsCache, PostgresStore, RecommendationStore};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("Query payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle path parameter errors (non-numeric ids)
pub fn handle_path_error(err: error::PathError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("Path error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_path".to_string(),
        message: format!("Invalid path parameter: {}", err),
        status_code: 400,
    }
    .into()
}

/// `RUST_LOG` wins over the configured level
fn init_tracing(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match logging.format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Pretty => subscriber.pretty().init(),
        LogFormat::Compact => subscriber.compact().init(),
    }
}

async fn build_store(settings: &Settings) -> std::io::Result<Arc<dyn RecommendationStore>> {
    match settings.store.backend {
        StoreBackend::Memory => {
            warn!("Using the in-memory store; recommendations will be empty until it is populated");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            let db = &settings.database;
            let store = PostgresStore::from_settings(
                &db.url,
                db.max_connections,
                db.min_connections,
                db.acquire_timeout_secs,
                db.idle_timeout_secs,
            )
            .await
            .map_err(|e| {
                error!("Failed to connect to PostgreSQL: {}", e);
                std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e.to_string())
            })?;

            info!(
                "PostgreSQL store initialized (max: {} connections)",
                db.max_connections.unwrap_or(10)
            );
            Ok(Arc::new(store))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            init_tracing(&LoggingSettings::default());
            error!("Failed to load configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    init_tracing(&settings.logging);

    info!("Starting Agapay therapist recommendation service...");

    let store = build_store(&settings).await?;

    let rec = &settings.recommendation;
    let cache = Arc::new(PopulationStatsCache::new(rec.experience.max_years_cache_secs));
    let experience = ExperienceNormalizer::new(
        rec.experience.baseline,
        rec.experience.default_max_years,
        cache,
    );
    let rating = RatingSettings {
        smoothing_k: rec.rating.smoothing_k,
        default_global_average: rec.rating.default_global_average,
    };
    let weights = ScoringWeights::from(&rec.weights);

    let recommender = Recommender::new(store, weights, experience, rating);

    info!("Recommender initialized with weights: {:?}", weights);

    let app_state = AppState::new(recommender, rec.default_top, rec.max_top);

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .app_data(web::PathConfig::default().error_handler(handle_path_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
