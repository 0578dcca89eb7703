use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::{
    cached,
    config::Config,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{ApiMovieDetails, Enrichment, MovieDetails, Rating, DEFAULT_OVERVIEW, NO_POSTER_URL},
};

const DETAILS_CACHE_TTL: u64 = 604800; // 1 week

/// Trait for movie metadata providers
///
/// A provider turns a movie ID into presentation data (poster, rating,
/// overview). The contract is fallback-on-failure: `fetch_details` never
/// returns an error, only `Enrichment::Fallback`, so one broken or slow
/// upstream call degrades a single result row instead of the whole query.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch presentation data for a movie, falling back on any failure
    async fn fetch_details(&self, movie_id: u32) -> Enrichment;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// TMDB-backed metadata provider
///
/// Fetches `/movie/{id}` from the TMDB API with an independent per-request
/// timeout, and caches converted details in Redis so repeat queries skip
/// the upstream call entirely.
#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    image_base_url: String,
    fetch_timeout: Duration,
    cache: Cache,
}

impl TmdbProvider {
    pub fn new(cache: Cache, config: &Config) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key: config.tmdb_api_key.clone(),
            api_url: config.tmdb_api_url.clone(),
            image_base_url: config.image_base_url.clone(),
            fetch_timeout: Duration::from_secs(config.fetch_timeout_secs),
            cache,
        }
    }

    fn convert_api_response(&self, details: ApiMovieDetails) -> MovieDetails {
        let poster_url = match details.poster_path {
            Some(path) => format!("{}{}", self.image_base_url, path),
            None => NO_POSTER_URL.to_string(),
        };

        let rating = match details.vote_average {
            Some(score) => Rating::Score(score),
            None => Rating::not_available(),
        };

        let overview = details
            .overview
            .unwrap_or_else(|| DEFAULT_OVERVIEW.to_string());

        MovieDetails {
            poster_url,
            rating,
            overview,
        }
    }

    async fn try_fetch(&self, movie_id: u32) -> AppResult<MovieDetails> {
        cached!(
            self.cache,
            CacheKey::MovieDetails(movie_id),
            DETAILS_CACHE_TTL,
            async move {
                let url = format!("{}/movie/{}", self.api_url, movie_id);
                let response = self
                    .http_client
                    .get(&url)
                    .query(&[
                        ("api_key", self.api_key.as_str()),
                        ("language", "en-US"),
                    ])
                    .timeout(self.fetch_timeout)
                    .send()
                    .await?;

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    return Err(AppError::ExternalApi(format!(
                        "API returned status {}: {}",
                        status, body
                    )));
                }

                let details: ApiMovieDetails = response.json().await?;

                tracing::info!(
                    movie_id,
                    provider = "tmdb",
                    "Movie details fetched"
                );

                Ok(self.convert_api_response(details))
            }
        )
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn fetch_details(&self, movie_id: u32) -> Enrichment {
        match self.try_fetch(movie_id).await {
            Ok(details) => Enrichment::Fetched(details),
            Err(e) => {
                tracing::warn!(
                    movie_id,
                    error = %e,
                    provider = "tmdb",
                    "Movie detail fetch failed; using fallback"
                );
                Enrichment::Fallback
            }
        }
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
