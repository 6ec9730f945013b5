use std::sync::Arc;

use crate::services::{PopulationStatsCache, RecommendationStore, StoreError};

/// Default floor credited to every therapist regardless of tenure
pub const DEFAULT_BASELINE: f64 = 0.2;

/// Calculate experience score (0-1)
///
/// `baseline + (1 - baseline) * min(years, max) / max`. Years are clamped to
/// be non-negative and the population maximum to at least 1, so tenure above
/// the maximum plateaus at 1.0.
#[inline]
pub fn normalize_experience(years: i32, population_max_years: i32, baseline: f64) -> f64 {
    let baseline = if baseline.is_nan() { DEFAULT_BASELINE } else { baseline.clamp(0.0, 1.0) };
    let max_years = population_max_years.max(1);
    let years = years.clamp(0, max_years);

    let ratio = f64::from(years) / f64::from(max_years);
    (baseline + (1.0 - baseline) * ratio).clamp(0.0, 1.0)
}

/// Experience normalizer bound to its configuration and the population cache
#[derive(Clone)]
pub struct ExperienceNormalizer {
    baseline: f64,
    default_max_years: i32,
    cache: Arc<PopulationStatsCache>,
}

impl ExperienceNormalizer {
    pub fn new(baseline: f64, default_max_years: i32, cache: Arc<PopulationStatsCache>) -> Self {
        Self {
            baseline,
            default_max_years: default_max_years.max(1),
            cache,
        }
    }

    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    /// Population max years, served from the cache when fresh
    pub async fn population_max_years(
        &self,
        store: &dyn RecommendationStore,
    ) -> Result<i32, StoreError> {
        self.cache
            .max_years_or_load(self.default_max_years, || store.max_years_of_experience())
            .await
    }

    pub fn score(&self, years: i32, population_max_years: i32) -> f64 {
        normalize_experience(years, population_max_years, self.baseline)
    }

    pub fn cache(&self) -> &PopulationStatsCache {
        &self.cache
    }
}

impl std::fmt::Debug for ExperienceNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExperienceNormalizer")
            .field("baseline", &self.baseline)
            .field("default_max_years", &self.default_max_years)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_years_gets_baseline() {
        assert_eq!(normalize_experience(0, 20, 0.2), 0.2);
    }

    #[test]
    fn test_max_years_scores_one() {
        assert_eq!(normalize_experience(20, 20, 0.2), 1.0);
    }

    #[test]
    fn test_plateau_above_max() {
        assert_eq!(normalize_experience(45, 20, 0.2), 1.0);
    }

    #[test]
    fn test_linear_between() {
        let score = normalize_experience(10, 20, 0.2);
        assert!((score - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_inputs() {
        // Negative years clamp to zero
        assert_eq!(normalize_experience(-3, 20, 0.2), 0.2);
        // Max below one is treated as one
        assert_eq!(normalize_experience(0, 0, 0.2), 0.2);
        assert_eq!(normalize_experience(1, 0, 0.2), 1.0);
        // Baseline is clamped into [0, 1]
        assert_eq!(normalize_experience(0, 20, -1.0), 0.0);
        assert_eq!(normalize_experience(0, 20, 3.0), 1.0);
    }
}
