use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::CatalogEntry,
    services::recommender::Recommender,
};

/// Loads the catalog and similarity artifacts and builds a validated
/// `Recommender`
///
/// Each artifact source is either a local path or an http(s) URL (remote
/// object store). Format is JSON: an array of `{movie_id, title}` rows for
/// the catalog, an array of equal-length number arrays for the matrix.
pub async fn load_recommender(config: &Config) -> AppResult<Recommender> {
    let http_client = HttpClient::new();

    let catalog: Vec<CatalogEntry> = read_artifact(&http_client, &config.catalog_source).await?;
    let similarity: Vec<Vec<f32>> =
        read_artifact(&http_client, &config.similarity_source).await?;

    tracing::info!(
        catalog_source = %config.catalog_source,
        similarity_source = %config.similarity_source,
        movies = catalog.len(),
        "Artifacts loaded"
    );

    Recommender::new(catalog, similarity)
}

async fn read_artifact<T: DeserializeOwned>(
    http_client: &HttpClient,
    source: &str,
) -> AppResult<T> {
    let bytes = if source.starts_with("http://") || source.starts_with("https://") {
        let response = http_client.get(source).send().await?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "Artifact fetch from {} returned status {}",
                source,
                response.status()
            )));
        }

        response.bytes().await?.to_vec()
    } else {
        tokio::fs::read(source).await.map_err(|e| {
            AppError::DataIntegrity(format!("Failed to read artifact {}: {}", source, e))
        })?
    };

    serde_json::from_slice(&bytes).map_err(|e| {
        AppError::DataIntegrity(format!("Failed to decode artifact {}: {}", source, e))
    })
}
