use serde::{Deserialize, Serialize};

/// Placeholder poster shown when TMDB has no poster for a movie
pub const NO_POSTER_URL: &str = "https://via.placeholder.com/300x450?text=No+Poster";

/// Placeholder poster shown when the metadata fetch itself failed
pub const ERROR_POSTER_URL: &str = "https://via.placeholder.com/300x450?text=Error";

/// Overview shown when TMDB returns none or the fetch failed
pub const DEFAULT_OVERVIEW: &str = "No description available.";

/// One row of the catalog artifact
///
/// The position of an entry in the catalog is the index space shared with
/// the similarity matrix: row `i` of the matrix describes similarities from
/// catalog entry `i`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogEntry {
    /// TMDB movie ID, used for metadata lookups
    pub movie_id: u32,
    pub title: String,
}

/// Audience rating for a movie
///
/// TMDB may omit `vote_average`; the UI renders that (and any fetch
/// failure) as the literal string "N/A", so the wire form is either a
/// number or that string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Rating {
    Score(f32),
    NotAvailable(String),
}

impl Rating {
    pub fn not_available() -> Self {
        Rating::NotAvailable("N/A".to_string())
    }
}

/// Presentation data for a single movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    pub poster_url: String,
    pub rating: Rating,
    pub overview: String,
}

impl MovieDetails {
    /// The well-defined triple substituted when the metadata fetch fails
    pub fn fallback() -> Self {
        Self {
            poster_url: ERROR_POSTER_URL.to_string(),
            rating: Rating::not_available(),
            overview: DEFAULT_OVERVIEW.to_string(),
        }
    }
}

/// Outcome of a metadata fetch
///
/// Fetch failures never cross the provider boundary as errors; they come
/// back as the `Fallback` variant so the degraded path is an explicit
/// branch for callers.
#[derive(Debug, Clone, PartialEq)]
pub enum Enrichment {
    Fetched(MovieDetails),
    Fallback,
}

impl Enrichment {
    pub fn into_details(self) -> MovieDetails {
        match self {
            Enrichment::Fetched(details) => details,
            Enrichment::Fallback => MovieDetails::fallback(),
        }
    }
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Raw movie details response from the TMDB API
///
/// Every field is optional: the fallback rules in `TmdbProvider` decide
/// what a missing field renders as.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiMovieDetails {
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f32>,
    #[serde(default)]
    pub overview: Option<String>,
}
