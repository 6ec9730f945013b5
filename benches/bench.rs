// Criterion benchmarks for Agapay Match

use agapay_match::core::{
    aggregate_ratings, score_availability, score_budget, ExperienceNormalizer, RatingSettings,
    RecommendParams, Recommender,
};
use agapay_match::models::{
    AvailabilityBlock, DayOfWeek, PatientPreferences, ScoringWeights, TherapistCandidate,
};
use agapay_match::services::{MemoryStore, PopulationStatsCache};
use chrono::NaiveTime;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;

const SPECIALIZATIONS: [&str; 4] = ["Orthopedic", "Neurological", "Pediatric", "Geriatric"];
const CONDITIONS: [&str; 4] = ["Stroke", "Back Pain", "Sports Injury", "Arthritis"];

fn hm(hour: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, 0, 0).unwrap()
}

fn create_candidate(id: usize) -> TherapistCandidate {
    TherapistCandidate {
        id: id as i32,
        name: format!("Therapist {}", id),
        years_of_experience: (id % 25) as i32,
        fee_per_session: Some(500.0 + (id % 10) as f64 * 150.0),
        specializations: vec![SPECIALIZATIONS[id % 4].to_string()],
        conditions_treated: vec![CONDITIONS[(id / 4) % 4].to_string()],
        other_conditions_treated: None,
        service_areas: vec![format!("Barangay {}", id % 7)],
        average_rating: None,
        rating_count: 0,
    }
}

fn create_blocks(id: usize) -> Vec<AvailabilityBlock> {
    (0..3)
        .map(|i| AvailabilityBlock {
            therapist_id: id as i32,
            day_of_week: DayOfWeek::from_index(((id + i) % 7) as i32).unwrap(),
            start_time: hm(8 + (i as u32) * 3),
            end_time: hm(10 + (i as u32) * 3),
            is_available: true,
            notes: None,
        })
        .collect()
}

fn create_preferences() -> PatientPreferences {
    PatientPreferences {
        preferred_day_of_week: Some(DayOfWeek::Monday),
        preferred_start_time: Some(hm(8)),
        preferred_end_time: Some(hm(17)),
        session_budget: Some(1000.0),
        preferred_specialization: Some("Orthopedic".to_string()),
        desired_service: Some("stroke".to_string()),
        preferred_barangay: Some("Barangay 3".to_string()),
        preferred_therapist_gender: None,
    }
}

fn create_recommender(candidates: usize) -> Recommender {
    let store = MemoryStore::new();
    store.add_patient(1, Some(create_preferences()));

    for id in 1..=candidates {
        store.add_therapist(create_candidate(id));
        for block in create_blocks(id) {
            store.add_availability(block);
        }
        for r in 0..(id % 6) {
            store.add_rating(id as i32, r as i32, (1 + (id + r) % 5) as u8);
        }
    }

    let experience = ExperienceNormalizer::new(0.2, 30, Arc::new(PopulationStatsCache::new(300)));
    Recommender::new(
        Arc::new(store),
        ScoringWeights::default(),
        experience,
        RatingSettings::default(),
    )
}

fn bench_availability(c: &mut Criterion) {
    let blocks = create_blocks(1);
    let prefs = create_preferences();

    c.bench_function("availability_score", |b| {
        b.iter(|| score_availability(black_box(&blocks), black_box(Some(&prefs))));
    });
}

fn bench_rating_aggregation(c: &mut Criterion) {
    let scores: Vec<u8> = (0..200).map(|i| (1 + i % 5) as u8).collect();

    c.bench_function("rating_aggregation_200", |b| {
        b.iter(|| aggregate_ratings(black_box(&scores), black_box(3.8), black_box(5)));
    });
}

fn bench_budget(c: &mut Criterion) {
    c.bench_function("budget_score", |b| {
        b.iter(|| score_budget(black_box(Some(1200.0)), black_box(Some(1000.0))));
    });
}

fn bench_recommend(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("recommend");

    for size in [10usize, 100, 500].iter() {
        let recommender = create_recommender(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                runtime
                    .block_on(recommender.recommend(black_box(1), RecommendParams::default()))
                    .unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_availability,
    bench_rating_aggregation,
    bench_budget,
    bench_recommend
);
criterion_main!(benches);
