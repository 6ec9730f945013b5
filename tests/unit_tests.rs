// Unit tests for Agapay Match scorers

use agapay_match::core::{
    aggregate_ratings, match_desired_service, match_service_area, match_specialization,
    normalize_experience, score_availability, score_budget, validate_submission, RatingError,
};
use agapay_match::models::{
    AvailabilityBlock, DayOfWeek, Dimension, PatientPreferences, ScoreBreakdown, ScoringWeights,
    SessionSnapshot, SessionStatus,
};
use agapay_match::services::{Clock, PopulationStatsCache, StoreError};
use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use parking_lot::Mutex;
use std::sync::Arc;

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

fn block(day: DayOfWeek, start: NaiveTime, end: NaiveTime) -> AvailabilityBlock {
    AvailabilityBlock {
        therapist_id: 1,
        day_of_week: day,
        start_time: start,
        end_time: end,
        is_available: true,
        notes: None,
    }
}

fn window(day: DayOfWeek, start: NaiveTime, end: NaiveTime) -> PatientPreferences {
    PatientPreferences {
        preferred_day_of_week: Some(day),
        preferred_start_time: Some(start),
        preferred_end_time: Some(end),
        ..Default::default()
    }
}

#[test]
fn test_availability_partial_coverage() {
    let blocks = vec![block(DayOfWeek::Monday, hm(8, 0), hm(16, 0))];
    let prefs = window(DayOfWeek::Monday, hm(8, 0), hm(18, 0));

    let score = score_availability(&blocks, Some(&prefs));
    assert!((score - 0.8).abs() < 1e-9);
}

#[test]
fn test_availability_split_blocks_add_up() {
    let blocks = vec![
        block(DayOfWeek::Tuesday, hm(9, 0), hm(10, 30)),
        block(DayOfWeek::Tuesday, hm(13, 0), hm(14, 30)),
        block(DayOfWeek::Wednesday, hm(9, 0), hm(17, 0)),
    ];
    let prefs = window(DayOfWeek::Tuesday, hm(9, 0), hm(15, 0));

    // 90 + 90 minutes of a 360 minute window
    let score = score_availability(&blocks, Some(&prefs));
    assert!((score - 0.5).abs() < 1e-9);
}

#[test]
fn test_availability_edges() {
    let prefs = window(DayOfWeek::Friday, hm(10, 0), hm(12, 0));

    assert_eq!(score_availability(&[], Some(&prefs)), 0.0);
    assert_eq!(
        score_availability(&[block(DayOfWeek::Friday, hm(8, 0), hm(10, 0))], Some(&prefs)),
        0.0
    );
    assert_eq!(
        score_availability(&[block(DayOfWeek::Friday, hm(8, 0), hm(20, 0))], Some(&prefs)),
        1.0
    );
    assert_eq!(
        score_availability(&[block(DayOfWeek::Friday, hm(8, 0), hm(20, 0))], None),
        0.5
    );
}

#[test]
fn test_experience_normalization() {
    assert!((normalize_experience(0, 30, 0.2) - 0.2).abs() < 1e-9);
    assert!((normalize_experience(15, 30, 0.2) - 0.6).abs() < 1e-9);
    assert_eq!(normalize_experience(30, 30, 0.2), 1.0);
    assert_eq!(normalize_experience(45, 30, 0.2), 1.0);
    assert!((normalize_experience(-3, 30, 0.2) - 0.2).abs() < 1e-9);
    // Zero population max is treated as one year
    assert_eq!(normalize_experience(1, 0, 0.2), 1.0);
}

#[test]
fn test_rating_bayesian_scenario() {
    let mut scores = vec![5u8; 12];
    scores.extend([4, 4, 4]);
    // 12 fives and 3 fours average 4.8
    let summary = aggregate_ratings(&scores, 4.0, 5);

    assert_eq!(summary.n, 15);
    assert!((summary.avg - 4.8).abs() < 1e-9);
    assert!((summary.raw_bayes - 4.6).abs() < 1e-9);
    assert!((summary.normalized - 0.92).abs() < 1e-9);
}

#[test]
fn test_rating_without_ratings_is_the_prior() {
    let summary = aggregate_ratings(&[], 3.5, 5);
    assert_eq!(summary.raw_bayes, 3.5);
    assert!((summary.normalized - 0.7).abs() < 1e-9);
}

#[test]
fn test_rating_larger_k_pulls_toward_prior() {
    let scores = [5u8, 5, 5, 5];
    let loose = aggregate_ratings(&scores, 3.0, 1);
    let tight = aggregate_ratings(&scores, 3.0, 20);

    assert!(loose.raw_bayes > tight.raw_bayes);
    assert!(tight.raw_bayes > 3.0);
}

#[test]
fn test_budget_scenarios() {
    assert_eq!(score_budget(Some(900.0), Some(1000.0)), 1.0);
    assert!((score_budget(Some(1200.0), Some(1000.0)) - 1.0 / 1.2).abs() < 1e-9);
    assert_eq!(score_budget(None, Some(1000.0)), 0.5);
    assert_eq!(score_budget(Some(1200.0), Some(0.0)), 0.5);

    let far = score_budget(Some(1_000_000.0), Some(1000.0));
    assert!(far > 0.0 && far < 0.01);
}

#[test]
fn test_categorical_matchers() {
    let specs = vec!["Orthopedic".to_string(), "Neurological".to_string()];
    assert_eq!(match_specialization(&specs, Some("neurological")), 1.0);
    assert_eq!(match_specialization(&specs, Some("Neuro")), 0.0);
    assert_eq!(match_specialization(&specs, None), 0.5);

    let conditions = vec!["Post-Stroke Rehabilitation".to_string()];
    assert_eq!(match_desired_service(&conditions, None, Some("stroke")), 1.0);
    assert_eq!(match_desired_service(&[], Some("Scoliosis, back pain"), Some("back pain")), 1.0);
    assert_eq!(match_desired_service(&conditions, None, Some("vertigo")), 0.0);
    assert_eq!(match_desired_service(&conditions, None, Some("   ")), 0.5);

    let areas = vec!["Poblacion".to_string(), "San Isidro".to_string()];
    assert_eq!(match_service_area(&areas, Some("san isidro")), 1.0);
    assert_eq!(match_service_area(&areas, Some("Santo Niño")), 0.0);
}

#[test]
fn test_weights_normalization() {
    let weights = ScoringWeights {
        availability: 2.0,
        experience: 2.0,
        rating: -1.0,
        budget: f64::NAN,
        specialization: 0.0,
        desired_service: 0.0,
    }
    .normalized();

    assert_eq!(weights.get(Dimension::Availability), 0.5);
    assert_eq!(weights.get(Dimension::Experience), 0.5);
    assert_eq!(weights.get(Dimension::Rating), 0.0);
    assert_eq!(weights.get(Dimension::Budget), 0.0);

    let total: f64 = Dimension::ALL
        .iter()
        .map(|d| ScoringWeights::default().normalized().get(*d))
        .sum();
    assert!((total - 1.0).abs() < 1e-9);
}

#[test]
fn test_weighted_score_within_range() {
    let breakdown = ScoreBreakdown {
        availability: 1.0,
        experience: 1.0,
        rating: 1.0,
        budget: 1.0,
        specialization: 1.0,
        desired_service: 1.0,
    };
    let weights = ScoringWeights::default().normalized();

    assert!((breakdown.weighted_score(&weights) - 1.0).abs() < 1e-9);
    assert_eq!(ScoreBreakdown::default().weighted_score(&weights), 0.0);
}

#[test]
fn test_submission_validation() {
    let session = SessionSnapshot {
        id: 7,
        patient_id: 1,
        therapist_id: 2,
        status: SessionStatus::Completed,
        already_rated: false,
    };

    assert!(validate_submission(5, 1, 2, Some(7), Some(&session), false).is_ok());
    assert!(matches!(
        validate_submission(0, 1, 2, Some(7), Some(&session), false),
        Err(RatingError::InvalidScore(0))
    ));
    assert!(matches!(
        validate_submission(4, 1, 3, Some(7), Some(&session), false),
        Err(RatingError::TherapistMismatch(7))
    ));
    assert!(validate_submission(4, 1, 2, None, None, true).is_ok());
}

/// Clock that only moves when told to
struct ManualClock(Mutex<DateTime<Utc>>);

impl ManualClock {
    fn advance(&self, by: Duration) {
        *self.0.lock() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock()
    }
}

#[test]
fn test_population_cache_expires() {
    let clock = Arc::new(ManualClock(Mutex::new(
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap(),
    )));
    let cache = PopulationStatsCache::with_clock(300, clock.clone());

    let first = tokio_test::block_on(
        cache.max_years_or_load(30, || async { Ok::<_, StoreError>(Some(18)) }),
    )
    .unwrap();
    assert_eq!(first, 18);

    // Within the TTL the loader is not consulted
    clock.advance(Duration::seconds(299));
    let cached = tokio_test::block_on(
        cache.max_years_or_load(30, || async { Ok::<_, StoreError>(Some(40)) }),
    )
    .unwrap();
    assert_eq!(cached, 18);

    clock.advance(Duration::seconds(2));
    let refreshed = tokio_test::block_on(
        cache.max_years_or_load(30, || async { Ok::<_, StoreError>(None) }),
    )
    .unwrap();
    assert_eq!(refreshed, 30);

    let stats = cache.stats();
    assert_eq!(stats.hit_count, 1);
    assert_eq!(stats.miss_count, 2);
}
