use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::{CatalogEntry, Enrichment, Rating};
use crate::services::recommender::Recommender;

use super::AppState;

// Request/Response types

#[derive(Debug, Serialize)]
pub struct MovieSummary {
    pub movie_id: u32,
    pub title: String,
}

impl From<&CatalogEntry> for MovieSummary {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            movie_id: entry.movie_id,
            title: entry.title.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RecommendationsQuery {
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct RecommendedMovie {
    pub movie_id: u32,
    pub title: String,
    pub poster_url: String,
    pub rating: Rating,
    pub overview: String,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub input_title: String,
    pub recommendations: Vec<RecommendedMovie>,
}

#[derive(Debug, Deserialize)]
pub struct CatalogUploadRequest {
    pub catalog: Vec<CatalogEntry>,
    pub similarity: Vec<Vec<f32>>,
}

#[derive(Debug, Serialize)]
pub struct CatalogUploadResponse {
    pub movies: usize,
}

#[derive(Debug, Deserialize)]
pub struct SaveFavoriteRequest {
    pub user_id: String,
    pub movie: String,
}

#[derive(Debug, Deserialize)]
pub struct FavoritesQuery {
    pub user_id: String,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Lists the catalog in load order, for the title selector
pub async fn get_movies(State(state): State<AppState>) -> Json<Vec<MovieSummary>> {
    let recommender = state.recommender().await;
    let movies: Vec<MovieSummary> = recommender.entries().iter().map(MovieSummary::from).collect();
    Json(movies)
}

/// Recommends up to five similar movies, enriched with metadata
///
/// The ranking is computed first, then the metadata fetches fan out in
/// parallel (each independently falling back on failure) and the query is
/// logged off the request path.
pub async fn get_recommendations(
    State(state): State<AppState>,
    Query(params): Query<RecommendationsQuery>,
) -> AppResult<Json<RecommendationsResponse>> {
    if params.title.trim().is_empty() {
        return Err(AppError::InvalidInput("Title cannot be empty".to_string()));
    }

    let recommender = state.recommender().await;
    let picks = recommender.recommend(&params.title)?;

    // Parallel enrichment fan-out, one task per recommendation
    let mut tasks = Vec::with_capacity(picks.len());
    for entry in &picks {
        let provider = state.metadata.clone();
        let movie_id = entry.movie_id;
        tasks.push(tokio::spawn(async move {
            provider.fetch_details(movie_id).await
        }));
    }

    let mut recommendations = Vec::with_capacity(picks.len());
    for (entry, task) in picks.iter().zip(tasks) {
        let enrichment = match task.await {
            Ok(enrichment) => enrichment,
            Err(e) => {
                tracing::error!(movie_id = entry.movie_id, error = %e, "Enrichment task failed");
                Enrichment::Fallback
            }
        };

        let details = enrichment.into_details();
        recommendations.push(RecommendedMovie {
            movie_id: entry.movie_id,
            title: entry.title.clone(),
            poster_url: details.poster_url,
            rating: details.rating,
            overview: details.overview,
        });
    }

    // Fire-and-forget query log; a dead sink never touches the response
    let query_log = state.query_log.clone();
    let input_title = params.title.clone();
    let recommended: Vec<String> = picks.iter().map(|e| e.title.clone()).collect();
    tokio::spawn(async move {
        query_log.record(&input_title, &recommended).await;
    });

    Ok(Json(RecommendationsResponse {
        input_title: params.title,
        recommendations,
    }))
}

/// Accepts uploaded catalog/similarity artifacts and swaps them in
///
/// Validation runs before the swap, so a malformed upload leaves the
/// serving dataset untouched and comes back as 422.
pub async fn upload_catalog(
    State(state): State<AppState>,
    Json(request): Json<CatalogUploadRequest>,
) -> AppResult<(StatusCode, Json<CatalogUploadResponse>)> {
    let recommender = Recommender::new(request.catalog, request.similarity)?;
    let movies = recommender.len();

    state.swap_recommender(recommender).await;
    tracing::info!(movies, "Catalog replaced by upload");

    Ok((StatusCode::OK, Json(CatalogUploadResponse { movies })))
}

/// Saves a favorite movie for a user
pub async fn save_favorite(
    State(state): State<AppState>,
    Json(request): Json<SaveFavoriteRequest>,
) -> AppResult<StatusCode> {
    let store = state
        .favorites
        .as_ref()
        .ok_or_else(|| AppError::Unavailable("Favorites are not configured".to_string()))?;

    store.save(&request.user_id, &request.movie).await?;
    Ok(StatusCode::CREATED)
}

/// Lists a user's favorite movies
pub async fn get_favorites(
    State(state): State<AppState>,
    Query(params): Query<FavoritesQuery>,
) -> AppResult<Json<Vec<String>>> {
    let store = state
        .favorites
        .as_ref()
        .ok_or_else(|| AppError::Unavailable("Favorites are not configured".to_string()))?;

    let movies = store.list(&params.user_id).await?;
    Ok(Json(movies))
}
