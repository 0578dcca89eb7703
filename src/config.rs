use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Catalog artifact: local path or http(s) URL
    #[serde(default = "default_catalog_source")]
    pub catalog_source: String,

    /// Similarity matrix artifact: local path or http(s) URL
    #[serde(default = "default_similarity_source")]
    pub similarity_source: String,

    /// TMDB API key
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Base URL for poster images
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,

    /// Per-request timeout for metadata fetches, in seconds
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Redis connection URL (metadata cache)
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// PostgreSQL connection URL; query logging and favorites are
    /// disabled when unset
    #[serde(default)]
    pub database_url: Option<String>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_catalog_source() -> String {
    "data/movies.json".to_string()
}

fn default_similarity_source() -> String {
    "data/similarity.json".to_string()
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    5
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
