//! Agapay Match - therapist recommendation service for the Agapay
//! physical-therapy marketplace.
//!
//! Every bookable therapist is scored on six dimensions (availability overlap,
//! experience, Bayesian-smoothed rating, budget fit, specialization and
//! desired-service match). The weighted sum decides the ranking.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{aggregate_ratings, score_availability, score_budget, RecommendParams, Recommender};
pub use crate::models::{MatchResult, PatientPreferences, ScoreBreakdown, ScoringWeights, TherapistCandidate};
pub use crate::services::{MemoryStore, PostgresStore, RecommendationStore, StoreError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let summary = aggregate_ratings(&[5, 5, 5], 3.0, 5);
        assert!(summary.normalized > 0.0 && summary.normalized < 1.0);
        assert_eq!(score_budget(Some(500.0), Some(1000.0)), 1.0);
    }
}
