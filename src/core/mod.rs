// Core algorithm exports
pub mod availability;
pub mod budget;
pub mod categorical;
pub mod experience;
pub mod rating;
pub mod recommender;

pub use availability::score_availability;
pub use budget::score_budget;
pub use categorical::{match_desired_service, match_service_area, match_specialization};
pub use experience::{normalize_experience, ExperienceNormalizer};
pub use rating::{aggregate_ratings, submit_rating, validate_submission, RatingError};
pub use recommender::{RatingSettings, RecommendError, RecommendParams, Recommendations, Recommender};
