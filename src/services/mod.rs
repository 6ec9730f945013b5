// Service exports
pub mod cache;
pub mod memory;
pub mod postgres;
pub mod store;

pub use cache::{CacheStats, Clock, PopulationStatsCache, SystemClock};
pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use store::{RecommendationStore, StoreError};
