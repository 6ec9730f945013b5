use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

use crate::models::{
    AvailabilityBlock, Patient, PatientId, PatientPreferences, RatingAggregate, RatingRecord,
    SessionId, SessionSnapshot, SessionStatus, TherapistCandidate, TherapistId,
    VerificationStatus,
};
use crate::services::store::{RecommendationStore, StoreError};

#[derive(Debug, Clone)]
struct TherapistRow {
    candidate: TherapistCandidate,
    verification: VerificationStatus,
    onboarding_complete: bool,
}

#[derive(Debug, Clone)]
struct SessionRow {
    patient_id: PatientId,
    therapist_id: TherapistId,
    status: SessionStatus,
}

#[derive(Debug, Default)]
struct Tables {
    patients: HashMap<PatientId, Patient>,
    therapists: Vec<TherapistRow>,
    availability: Vec<AvailabilityBlock>,
    ratings: Vec<RatingRecord>,
    sessions: HashMap<SessionId, SessionRow>,
}

/// In-process store backed by plain collections
///
/// Mirrors the Postgres store's semantics (bookable filter, aggregate
/// recomputation) for tests, benchmarks, and local runs without a database.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_patient(&self, id: PatientId, preferences: Option<PatientPreferences>) {
        self.tables
            .write()
            .patients
            .insert(id, Patient { id, preferences });
    }

    /// Add a verified, onboarded therapist
    pub fn add_therapist(&self, candidate: TherapistCandidate) {
        self.add_therapist_with_status(candidate, VerificationStatus::Verified, true);
    }

    pub fn add_therapist_with_status(
        &self,
        candidate: TherapistCandidate,
        verification: VerificationStatus,
        onboarding_complete: bool,
    ) {
        self.tables.write().therapists.push(TherapistRow {
            candidate,
            verification,
            onboarding_complete,
        });
    }

    pub fn add_availability(&self, block: AvailabilityBlock) {
        self.tables.write().availability.push(block);
    }

    pub fn add_session(
        &self,
        id: SessionId,
        patient_id: PatientId,
        therapist_id: TherapistId,
        status: SessionStatus,
    ) {
        self.tables.write().sessions.insert(
            id,
            SessionRow {
                patient_id,
                therapist_id,
                status,
            },
        );
    }

    /// Add a raw rating without submission checks, refreshing the aggregate
    pub fn add_rating(&self, therapist_id: TherapistId, patient_id: PatientId, score: u8) {
        let mut tables = self.tables.write();
        tables.ratings.push(RatingRecord {
            therapist_id,
            patient_id,
            session_id: None,
            score,
            comment: None,
            created_at: chrono::Utc::now(),
        });
        refresh_aggregate(&mut tables, therapist_id);
    }
}

fn refresh_aggregate(tables: &mut Tables, therapist_id: TherapistId) -> RatingAggregate {
    let scores: Vec<f64> = tables
        .ratings
        .iter()
        .filter(|r| r.therapist_id == therapist_id)
        .map(|r| f64::from(r.score))
        .collect();

    let rating_count = scores.len() as i32;
    let average_rating = if scores.is_empty() {
        None
    } else {
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    };

    if let Some(row) = tables
        .therapists
        .iter_mut()
        .find(|t| t.candidate.id == therapist_id)
    {
        row.candidate.rating_count = rating_count;
        row.candidate.average_rating = average_rating;
    }

    RatingAggregate {
        therapist_id,
        rating_count,
        average_rating,
    }
}

#[async_trait]
impl RecommendationStore for MemoryStore {
    async fn find_patient(&self, patient_id: PatientId) -> Result<Option<Patient>, StoreError> {
        Ok(self.tables.read().patients.get(&patient_id).cloned())
    }

    async fn bookable_therapists(&self) -> Result<Vec<TherapistCandidate>, StoreError> {
        Ok(self
            .tables
            .read()
            .therapists
            .iter()
            .filter(|t| t.verification == VerificationStatus::Verified && t.onboarding_complete)
            .map(|t| t.candidate.clone())
            .collect())
    }

    async fn therapist_availability(
        &self,
        therapist_id: TherapistId,
    ) -> Result<Vec<AvailabilityBlock>, StoreError> {
        let mut blocks: Vec<AvailabilityBlock> = self
            .tables
            .read()
            .availability
            .iter()
            .filter(|b| b.therapist_id == therapist_id)
            .cloned()
            .collect();
        blocks.sort_by_key(|b| (b.day_of_week, b.start_time));
        Ok(blocks)
    }

    async fn therapist_ratings(&self, therapist_id: TherapistId) -> Result<Vec<u8>, StoreError> {
        Ok(self
            .tables
            .read()
            .ratings
            .iter()
            .filter(|r| r.therapist_id == therapist_id)
            .map(|r| r.score)
            .collect())
    }

    async fn global_rating_average(&self) -> Result<Option<f64>, StoreError> {
        let tables = self.tables.read();
        if tables.ratings.is_empty() {
            return Ok(None);
        }
        let total: f64 = tables.ratings.iter().map(|r| f64::from(r.score)).sum();
        Ok(Some(total / tables.ratings.len() as f64))
    }

    async fn max_years_of_experience(&self) -> Result<Option<i32>, StoreError> {
        Ok(self
            .tables
            .read()
            .therapists
            .iter()
            .map(|t| t.candidate.years_of_experience)
            .max())
    }

    async fn find_session(&self, session_id: SessionId) -> Result<Option<SessionSnapshot>, StoreError> {
        let tables = self.tables.read();
        Ok(tables.sessions.get(&session_id).map(|s| SessionSnapshot {
            id: session_id,
            patient_id: s.patient_id,
            therapist_id: s.therapist_id,
            status: s.status,
            already_rated: tables
                .ratings
                .iter()
                .any(|r| r.session_id == Some(session_id)),
        }))
    }

    async fn has_completed_session(
        &self,
        patient_id: PatientId,
        therapist_id: TherapistId,
    ) -> Result<bool, StoreError> {
        Ok(self.tables.read().sessions.values().any(|s| {
            s.patient_id == patient_id
                && s.therapist_id == therapist_id
                && s.status == SessionStatus::Completed
        }))
    }

    async fn insert_rating(&self, rating: RatingRecord) -> Result<RatingAggregate, StoreError> {
        let mut tables = self.tables.write();
        if let Some(session_id) = rating.session_id {
            if tables.ratings.iter().any(|r| r.session_id == Some(session_id)) {
                return Err(StoreError::InvalidData(format!(
                    "session {} already rated",
                    session_id
                )));
            }
        }
        let therapist_id = rating.therapist_id;
        tables.ratings.push(rating);
        Ok(refresh_aggregate(&mut tables, therapist_id))
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}
