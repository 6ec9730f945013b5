// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AvailabilityBlock, DayOfWeek, Dimension, MatchResult, Patient, PatientId, PatientPreferences,
    RatingAggregate, RatingRecord, RatingSummary, ScoreBreakdown, ScoringWeights, SessionId,
    SessionSnapshot, SessionStatus, TherapistCandidate, TherapistId, VerificationStatus,
};
pub use requests::{RecommendQuery, RecommendRequest, SubmitRatingRequest};
pub use responses::{
    AvailabilityScoreResponse, ErrorResponse, HealthResponse, RatingScoreResponse,
    RecommendationsResponse, SubmitRatingResponse,
};
