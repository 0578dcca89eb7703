pub mod loader;
pub mod metadata;
pub mod query_log;
pub mod recommender;
