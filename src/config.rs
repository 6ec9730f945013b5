use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::ScoringWeights;

const ENV_PREFIX: &str = "AGAPAY";

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub recommendation: RecommendationSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Only read when `store.backend` is `postgres`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default)]
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

/// Which store the server reads from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Postgres,
    /// Empty in-process store, for local runs without a database
    Memory,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub backend: StoreBackend,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default = "default_top")]
    pub default_top: i32,
    #[serde(default = "default_max_top")]
    pub max_top: i32,
    #[serde(default)]
    pub experience: ExperienceSettings,
    #[serde(default)]
    pub rating: RatingConfig,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            weights: WeightsConfig::default(),
            default_top: default_top(),
            max_top: default_max_top(),
            experience: ExperienceSettings::default(),
            rating: RatingConfig::default(),
        }
    }
}

fn default_top() -> i32 { 5 }
fn default_max_top() -> i32 { 50 }

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_availability_weight")]
    pub availability: f64,
    #[serde(default = "default_experience_weight")]
    pub experience: f64,
    #[serde(default = "default_rating_weight")]
    pub rating: f64,
    #[serde(default = "default_budget_weight")]
    pub budget: f64,
    #[serde(default = "default_specialization_weight")]
    pub specialization: f64,
    #[serde(default = "default_desired_service_weight", alias = "service_area")]
    pub desired_service: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            availability: default_availability_weight(),
            experience: default_experience_weight(),
            rating: default_rating_weight(),
            budget: default_budget_weight(),
            specialization: default_specialization_weight(),
            desired_service: default_desired_service_weight(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        ScoringWeights {
            availability: config.availability,
            experience: config.experience,
            rating: config.rating,
            budget: config.budget,
            specialization: config.specialization,
            desired_service: config.desired_service,
        }
    }
}

fn default_availability_weight() -> f64 { 0.22 }
fn default_experience_weight() -> f64 { 0.17 }
fn default_rating_weight() -> f64 { 0.17 }
fn default_budget_weight() -> f64 { 0.17 }
fn default_specialization_weight() -> f64 { 0.17 }
fn default_desired_service_weight() -> f64 { 0.10 }

#[derive(Debug, Clone, Deserialize)]
pub struct ExperienceSettings {
    #[serde(default = "default_baseline")]
    pub baseline: f64,
    #[serde(default = "default_max_years")]
    pub default_max_years: i32,
    #[serde(default = "default_max_years_cache_secs")]
    pub max_years_cache_secs: u64,
}

impl Default for ExperienceSettings {
    fn default() -> Self {
        Self {
            baseline: default_baseline(),
            default_max_years: default_max_years(),
            max_years_cache_secs: default_max_years_cache_secs(),
        }
    }
}

fn default_baseline() -> f64 { 0.2 }
fn default_max_years() -> i32 { 30 }
fn default_max_years_cache_secs() -> u64 { 300 }

#[derive(Debug, Clone, Deserialize)]
pub struct RatingConfig {
    #[serde(default = "default_smoothing_k")]
    pub smoothing_k: u32,
    #[serde(default = "default_global_average")]
    pub default_global_average: f64,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            smoothing_k: default_smoothing_k(),
            default_global_average: default_global_average(),
        }
    }
}

fn default_smoothing_k() -> u32 { 5 }
fn default_global_average() -> f64 { 3.0 }

/// Log line format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per event
    #[default]
    Json,
    Pretty,
    Compact,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Later sources override earlier ones:
    /// 1. Serde defaults on each section
    /// 2. `config/default.toml`, then `config/local.toml`
    /// 3. Environment variables, e.g. `AGAPAY__SERVER__PORT` -> server.port
    /// 4. `DATABASE_URL`, when set
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(environment())
            .build()?;

        apply_database_url(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        apply_database_url(settings)?.try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// `DATABASE_URL` wins over every other source for the connection string
fn apply_database_url(settings: Config) -> Result<Config, ConfigError> {
    match std::env::var("DATABASE_URL") {
        Ok(url) if !url.trim().is_empty() => Config::builder()
            .add_source(settings)
            .set_override("database.url", url)?
            .build(),
        _ => Ok(settings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> Settings {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    const MINIMAL: &str = r#"
        [server]
        host = "127.0.0.1"
        port = 8080

        [database]
        url = "postgres://localhost/agapay"
    "#;

    #[test]
    fn test_default_weights() {
        let weights = WeightsConfig::default();
        assert_eq!(weights.availability, 0.22);
        assert_eq!(weights.experience, 0.17);
        assert_eq!(weights.rating, 0.17);
        assert_eq!(weights.budget, 0.17);
        assert_eq!(weights.specialization, 0.17);
        assert_eq!(weights.desired_service, 0.10);

        let scoring = ScoringWeights::from(&weights);
        assert_eq!(scoring, ScoringWeights::default());
    }

    #[test]
    fn test_minimal_file_fills_defaults() {
        let settings = from_toml(MINIMAL);
        assert_eq!(settings.store.backend, StoreBackend::Postgres);
        assert_eq!(settings.recommendation.default_top, 5);
        assert_eq!(settings.recommendation.max_top, 50);
        assert_eq!(settings.recommendation.experience.baseline, 0.2);
        assert_eq!(settings.recommendation.experience.default_max_years, 30);
        assert_eq!(settings.recommendation.experience.max_years_cache_secs, 300);
        assert_eq!(settings.recommendation.rating.smoothing_k, 5);
        assert_eq!(settings.recommendation.rating.default_global_average, 3.0);
        assert_eq!(settings.logging.level, "info");
        assert_eq!(settings.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_overrides_and_service_area_alias() {
        let settings = from_toml(&format!(
            "{}\n{}",
            MINIMAL,
            r#"
            [store]
            backend = "memory"

            [logging]
            format = "pretty"

            [recommendation.weights]
            availability = 0.5
            service_area = 0.3
            "#
        ));
        assert_eq!(settings.store.backend, StoreBackend::Memory);
        assert_eq!(settings.logging.format, LogFormat::Pretty);
        assert_eq!(settings.recommendation.weights.availability, 0.5);
        assert_eq!(settings.recommendation.weights.desired_service, 0.3);
        assert_eq!(settings.recommendation.weights.rating, 0.17);
    }
}
