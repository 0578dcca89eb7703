use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum_test::TestServer;
use serde_json::json;

use cineplex_api::api::{create_router, AppState};
use cineplex_api::models::{
    CatalogEntry, Enrichment, MovieDetails, Rating, DEFAULT_OVERVIEW, ERROR_POSTER_URL,
};
use cineplex_api::services::metadata::MetadataProvider;
use cineplex_api::services::query_log::QueryLog;
use cineplex_api::services::recommender::Recommender;

/// Metadata stub: deterministic details, optionally failing for one ID
struct StubMetadata {
    fail_for: Option<u32>,
}

#[async_trait::async_trait]
impl MetadataProvider for StubMetadata {
    async fn fetch_details(&self, movie_id: u32) -> Enrichment {
        if self.fail_for == Some(movie_id) {
            return Enrichment::Fallback;
        }
        Enrichment::Fetched(MovieDetails {
            poster_url: format!("https://posters.test/{}.jpg", movie_id),
            rating: Rating::Score(7.5),
            overview: format!("Overview for movie {}", movie_id),
        })
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

/// Query log sink that counts records
#[derive(Default)]
struct CountingQueryLog {
    records: AtomicUsize,
}

#[async_trait::async_trait]
impl QueryLog for CountingQueryLog {
    async fn record(&self, _input_title: &str, _recommended: &[String]) {
        self.records.fetch_add(1, Ordering::SeqCst);
    }
}

/// Query log sink that dies on every write
struct PanickyQueryLog;

#[async_trait::async_trait]
impl QueryLog for PanickyQueryLog {
    async fn record(&self, _input_title: &str, _recommended: &[String]) {
        panic!("log sink is down");
    }
}

fn entry(movie_id: u32, title: &str) -> CatalogEntry {
    CatalogEntry {
        movie_id,
        title: title.to_string(),
    }
}

fn test_recommender() -> Recommender {
    let catalog = vec![
        entry(1, "A"),
        entry(2, "B"),
        entry(3, "C"),
        entry(4, "D"),
    ];
    let similarity = vec![
        vec![1.0, 0.9, 0.2, 0.5],
        vec![0.9, 1.0, 0.4, 0.3],
        vec![0.2, 0.4, 1.0, 0.6],
        vec![0.5, 0.3, 0.6, 1.0],
    ];
    Recommender::new(catalog, similarity).unwrap()
}

fn create_test_server_with(
    metadata: Arc<dyn MetadataProvider>,
    query_log: Arc<dyn QueryLog>,
) -> TestServer {
    let state = AppState::new(test_recommender(), metadata, query_log, None);
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

fn create_test_server() -> TestServer {
    create_test_server_with(
        Arc::new(StubMetadata { fail_for: None }),
        Arc::new(CountingQueryLog::default()),
    )
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_get_movies_in_catalog_order() {
    let server = create_test_server();

    let response = server.get("/movies").await;
    response.assert_status_ok();

    let movies: Vec<serde_json::Value> = response.json();
    let titles: Vec<&str> = movies.iter().map(|m| m["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["A", "B", "C", "D"]);
    assert_eq!(movies[0]["movie_id"], 1);
}

#[tokio::test]
async fn test_recommendations_ranked_and_enriched() {
    let server = create_test_server();

    let response = server
        .get("/recommendations")
        .add_query_param("title", "A")
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["input_title"], "A");

    // Row for A is [1.0, 0.9, 0.2, 0.5]: B, D, C, and only 3 since the
    // catalog has 4 entries
    let recs = body["recommendations"].as_array().unwrap();
    let titles: Vec<&str> = recs.iter().map(|r| r["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["B", "D", "C"]);

    assert_eq!(recs[0]["poster_url"], "https://posters.test/2.jpg");
    assert_eq!(recs[0]["rating"], 7.5);
    assert_eq!(recs[0]["overview"], "Overview for movie 2");
}

#[tokio::test]
async fn test_unknown_title_is_404() {
    let server = create_test_server();

    let response = server
        .get("/recommendations")
        .add_query_param("title", "Nonexistent")
        .await;
    response.assert_status(axum::http::StatusCode::NOT_FOUND);

    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("Nonexistent"));
}

#[tokio::test]
async fn test_empty_title_is_400() {
    let server = create_test_server();

    let response = server
        .get("/recommendations")
        .add_query_param("title", "  ")
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_one_failing_fetch_degrades_one_row() {
    // Metadata fails for movie 4 ("D") only
    let server = create_test_server_with(
        Arc::new(StubMetadata { fail_for: Some(4) }),
        Arc::new(CountingQueryLog::default()),
    );

    let response = server
        .get("/recommendations")
        .add_query_param("title", "A")
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    let recs = body["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 3);

    // "D" carries the fallback triple, ranking position unchanged
    assert_eq!(recs[1]["title"], "D");
    assert_eq!(recs[1]["poster_url"], ERROR_POSTER_URL);
    assert_eq!(recs[1]["rating"], "N/A");
    assert_eq!(recs[1]["overview"], DEFAULT_OVERVIEW);

    // The other rows still rendered from real details
    assert_eq!(recs[0]["poster_url"], "https://posters.test/2.jpg");
    assert_eq!(recs[2]["poster_url"], "https://posters.test/3.jpg");
}

#[tokio::test]
async fn test_dead_query_log_never_surfaces() {
    let server = create_test_server_with(
        Arc::new(StubMetadata { fail_for: None }),
        Arc::new(PanickyQueryLog),
    );

    let response = server
        .get("/recommendations")
        .add_query_param("title", "B")
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    let titles: Vec<&str> = body["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["title"].as_str().unwrap())
        .collect();
    // Row for B is [0.9, 1.0, 0.4, 0.3]: A, C, D
    assert_eq!(titles, vec!["A", "C", "D"]);
}

#[tokio::test]
async fn test_catalog_upload_swaps_dataset() {
    let server = create_test_server();

    let response = server
        .post("/catalog")
        .json(&json!({
            "catalog": [
                {"movie_id": 10, "title": "X"},
                {"movie_id": 20, "title": "Y"}
            ],
            "similarity": [
                [1.0, 0.7],
                [0.7, 1.0]
            ]
        }))
        .await;
    response.assert_status_ok();

    let uploaded: serde_json::Value = response.json();
    assert_eq!(uploaded["movies"], 2);

    let response = server
        .get("/recommendations")
        .add_query_param("title", "X")
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    let recs = body["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0]["title"], "Y");
}

#[tokio::test]
async fn test_malformed_upload_rejected_and_old_dataset_survives() {
    let server = create_test_server();

    // 3 rows for a 2-entry catalog
    let response = server
        .post("/catalog")
        .json(&json!({
            "catalog": [
                {"movie_id": 10, "title": "X"},
                {"movie_id": 20, "title": "Y"}
            ],
            "similarity": [
                [1.0, 0.7],
                [0.7, 1.0],
                [0.1, 0.1]
            ]
        }))
        .await;
    response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);

    // The original catalog still serves
    let response = server
        .get("/recommendations")
        .add_query_param("title", "A")
        .await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_favorites_unconfigured_is_503() {
    let server = create_test_server();

    let response = server
        .post("/favorites")
        .json(&json!({"user_id": "u1", "movie": "A"}))
        .await;
    response.assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);

    let response = server
        .get("/favorites")
        .add_query_param("user_id", "u1")
        .await;
    response.assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_response_carries_request_id() {
    let server = create_test_server();

    let response = server.get("/health").await;
    response.assert_status_ok();

    let request_id = response.header("x-request-id");
    assert!(!request_id.is_empty());
}
