use std::sync::Arc;

use tokio::sync::RwLock;

use crate::db::FavoritesStore;
use crate::services::{
    metadata::MetadataProvider, query_log::QueryLog, recommender::Recommender,
};

/// Shared application state
///
/// The recommender sits behind a lock only so catalog uploads can swap it
/// atomically; readers clone the inner `Arc` and work on a consistent
/// snapshot, never a half-loaded mix.
#[derive(Clone)]
pub struct AppState {
    recommender: Arc<RwLock<Arc<Recommender>>>,
    pub metadata: Arc<dyn MetadataProvider>,
    pub query_log: Arc<dyn QueryLog>,
    pub favorites: Option<FavoritesStore>,
}

impl AppState {
    pub fn new(
        recommender: Recommender,
        metadata: Arc<dyn MetadataProvider>,
        query_log: Arc<dyn QueryLog>,
        favorites: Option<FavoritesStore>,
    ) -> Self {
        Self {
            recommender: Arc::new(RwLock::new(Arc::new(recommender))),
            metadata,
            query_log,
            favorites,
        }
    }

    /// Snapshot of the current recommender
    pub async fn recommender(&self) -> Arc<Recommender> {
        self.recommender.read().await.clone()
    }

    /// Atomically replaces the recommender with a freshly validated one
    pub async fn swap_recommender(&self, recommender: Recommender) {
        *self.recommender.write().await = Arc::new(recommender);
    }
}
