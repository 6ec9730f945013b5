use chrono::NaiveTime;
use serde::de::{self, IgnoredAny, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub type TherapistId = i32;
pub type PatientId = i32;
pub type SessionId = i32;

/// Day of week, numbered the way the scheduling tables store it (0 = Sunday)
///
/// Deserializes from either the numeric code or the English name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DayOfWeek {
    Sunday = 0,
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
}

impl DayOfWeek {
    pub fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(Self::Sunday),
            1 => Some(Self::Monday),
            2 => Some(Self::Tuesday),
            3 => Some(Self::Wednesday),
            4 => Some(Self::Thursday),
            5 => Some(Self::Friday),
            6 => Some(Self::Saturday),
            _ => None,
        }
    }

    pub fn index(self) -> i32 {
        self as i32
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "sunday" => Some(Self::Sunday),
            "monday" => Some(Self::Monday),
            "tuesday" => Some(Self::Tuesday),
            "wednesday" => Some(Self::Wednesday),
            "thursday" => Some(Self::Thursday),
            "friday" => Some(Self::Friday),
            "saturday" => Some(Self::Saturday),
            _ => None,
        }
    }
}

struct DayOfWeekVisitor;

impl<'de> Visitor<'de> for DayOfWeekVisitor {
    type Value = DayOfWeek;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a day code 0..=6 (0 = Sunday) or a day name")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<DayOfWeek, E> {
        i32::try_from(v)
            .ok()
            .and_then(DayOfWeek::from_index)
            .ok_or_else(|| E::invalid_value(de::Unexpected::Signed(v), &self))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<DayOfWeek, E> {
        i32::try_from(v)
            .ok()
            .and_then(DayOfWeek::from_index)
            .ok_or_else(|| E::invalid_value(de::Unexpected::Unsigned(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<DayOfWeek, E> {
        DayOfWeek::from_name(v).ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}

impl<'de> Deserialize<'de> for DayOfWeek {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DayOfWeekVisitor)
    }
}

/// Deserialize an optional field, turning a malformed value into `None`
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient<V> {
        Valid(V),
        Invalid(IgnoredAny),
    }

    Ok(match Option::<Lenient<T>>::deserialize(deserializer)? {
        Some(Lenient::Valid(value)) => Some(value),
        _ => None,
    })
}

/// Therapist verification state as stored on the therapist row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationStatus {
    Pending = 0,
    Verified = 1,
    Rejected = 2,
}

impl VerificationStatus {
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// A weekly availability block published by a therapist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityBlock {
    pub therapist_id: TherapistId,
    pub day_of_week: DayOfWeek,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_true() -> bool { true }

/// A bookable therapist as seen by the recommender
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TherapistCandidate {
    pub id: TherapistId,
    pub name: String,
    pub years_of_experience: i32,
    #[serde(default)]
    pub fee_per_session: Option<f64>,
    #[serde(default)]
    pub specializations: Vec<String>,
    #[serde(default)]
    pub conditions_treated: Vec<String>,
    #[serde(default)]
    pub other_conditions_treated: Option<String>,
    #[serde(default)]
    pub service_areas: Vec<String>,
    /// Denormalized aggregate, maintained by rating submission
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub rating_count: i32,
}

/// Patient scheduling and matching preferences
///
/// Every field is independently optional. A missing field means the
/// corresponding dimension scores neutral, and so does a malformed one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientPreferences {
    #[serde(default, deserialize_with = "lenient")]
    pub preferred_day_of_week: Option<DayOfWeek>,
    #[serde(default, deserialize_with = "lenient")]
    pub preferred_start_time: Option<NaiveTime>,
    #[serde(default, deserialize_with = "lenient")]
    pub preferred_end_time: Option<NaiveTime>,
    #[serde(default, deserialize_with = "lenient")]
    pub session_budget: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub preferred_specialization: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub desired_service: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub preferred_barangay: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub preferred_therapist_gender: Option<String>,
}

impl PatientPreferences {
    /// The preferred weekly window, if day, start and end are all set
    pub fn preferred_window(&self) -> Option<(DayOfWeek, NaiveTime, NaiveTime)> {
        Some((
            self.preferred_day_of_week?,
            self.preferred_start_time?,
            self.preferred_end_time?,
        ))
    }
}

/// A patient record with its (optional) stored preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: PatientId,
    #[serde(default)]
    pub preferences: Option<PatientPreferences>,
}

/// One submitted rating
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingRecord {
    pub therapist_id: TherapistId,
    pub patient_id: PatientId,
    pub session_id: Option<SessionId>,
    pub score: u8,
    pub comment: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Denormalized rating aggregate stored on the therapist
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingAggregate {
    pub therapist_id: TherapistId,
    pub rating_count: i32,
    pub average_rating: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Scheduled = 0,
    Completed = 1,
    Cancelled = 2,
}

impl SessionStatus {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Scheduled),
            1 => Some(Self::Completed),
            2 => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// The parts of a therapy session that rating submission checks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub id: SessionId,
    pub patient_id: PatientId,
    pub therapist_id: TherapistId,
    pub status: SessionStatus,
    pub already_rated: bool,
}

/// The six weighted scoring axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    Availability,
    Experience,
    Rating,
    Budget,
    Specialization,
    DesiredService,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Dimension::Availability,
        Dimension::Experience,
        Dimension::Rating,
        Dimension::Budget,
        Dimension::Specialization,
        Dimension::DesiredService,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::Availability => "availability",
            Dimension::Experience => "experience",
            Dimension::Rating => "rating",
            Dimension::Budget => "budget",
            Dimension::Specialization => "specialization",
            Dimension::DesiredService => "desiredService",
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scoring weights
///
/// Values must be non-negative but need not sum to 1; the recommender
/// normalizes them before use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoringWeights {
    pub availability: f64,
    pub experience: f64,
    pub rating: f64,
    pub budget: f64,
    pub specialization: f64,
    #[serde(alias = "serviceArea")]
    pub desired_service: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            availability: 0.22,
            experience: 0.17,
            rating: 0.17,
            budget: 0.17,
            specialization: 0.17,
            desired_service: 0.10,
        }
    }
}

impl ScoringWeights {
    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Availability => self.availability,
            Dimension::Experience => self.experience,
            Dimension::Rating => self.rating,
            Dimension::Budget => self.budget,
            Dimension::Specialization => self.specialization,
            Dimension::DesiredService => self.desired_service,
        }
    }

    fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            availability: f(self.availability),
            experience: f(self.experience),
            rating: f(self.rating),
            budget: f(self.budget),
            specialization: f(self.specialization),
            desired_service: f(self.desired_service),
        }
    }

    /// Rescale so the weights sum to 1.0
    ///
    /// Negative, NaN or infinite weights count as zero. If nothing positive
    /// remains the total is taken as 1.0, which yields an all-zero vector.
    pub fn normalized(&self) -> Self {
        let clamped = self.map(|w| if w.is_finite() && w > 0.0 { w } else { 0.0 });
        let total: f64 = Dimension::ALL.iter().map(|d| clamped.get(*d)).sum();
        let total = if total > 0.0 { total } else { 1.0 };
        clamped.map(|w| w / total)
    }
}

/// Per-dimension scores for one candidate, each in [0, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub availability: f64,
    pub experience: f64,
    pub rating: f64,
    pub budget: f64,
    pub specialization: f64,
    pub desired_service: f64,
}

impl ScoreBreakdown {
    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Availability => self.availability,
            Dimension::Experience => self.experience,
            Dimension::Rating => self.rating,
            Dimension::Budget => self.budget,
            Dimension::Specialization => self.specialization,
            Dimension::DesiredService => self.desired_service,
        }
    }

    /// Weighted sum clamped to [0, 1]. `weights` should already be normalized.
    /// A non-finite sum scores 0.
    pub fn weighted_score(&self, weights: &ScoringWeights) -> f64 {
        let total: f64 = Dimension::ALL
            .iter()
            .map(|d| weights.get(*d) * self.get(*d))
            .sum();
        if total.is_finite() {
            total.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// One ranked recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub therapist_id: TherapistId,
    pub therapist_name: String,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
    /// Informational only, not part of the weighted score
    pub service_area_match: f64,
    pub years_of_experience: i32,
    pub average_rating: Option<f64>,
    pub rating_count: i32,
    pub fee_per_session: Option<f64>,
    pub specializations: Vec<String>,
    pub service_areas: Vec<String>,
}

/// Output of the Bayesian rating aggregation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    /// `raw_bayes / 5`, clamped to [0, 1]
    pub normalized: f64,
    /// Smoothed average on the 1..5 scale
    pub raw_bayes: f64,
    pub n: usize,
    pub avg: f64,
    pub global_avg: f64,
    pub k: u32,
}
