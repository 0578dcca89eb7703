use std::cmp::Ordering;
use std::collections::HashMap;

use crate::{
    error::{AppError, AppResult},
    models::CatalogEntry,
};

/// Number of recommendations returned per query
pub const TOP_N: usize = 5;

/// Ranks catalog entries by precomputed similarity to a queried entry
///
/// Holds the ordered movie catalog and the square similarity matrix aligned
/// to catalog order. Both are validated at construction and immutable
/// afterwards; `recommend` is a pure function over them.
#[derive(Debug)]
pub struct Recommender {
    catalog: Vec<CatalogEntry>,
    similarity: Vec<Vec<f32>>,
}

impl Recommender {
    /// Builds a recommender, validating the artifacts eagerly
    ///
    /// A malformed artifact must fail here, before any query is accepted,
    /// rather than surface as wrong answers or out-of-bounds reads later.
    pub fn new(catalog: Vec<CatalogEntry>, similarity: Vec<Vec<f32>>) -> AppResult<Self> {
        if catalog.is_empty() {
            return Err(AppError::DataIntegrity("Catalog is empty".to_string()));
        }

        if similarity.len() != catalog.len() {
            return Err(AppError::DataIntegrity(format!(
                "Similarity matrix has {} rows for {} catalog entries",
                similarity.len(),
                catalog.len()
            )));
        }

        for (i, row) in similarity.iter().enumerate() {
            if row.len() != catalog.len() {
                return Err(AppError::DataIntegrity(format!(
                    "Similarity row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    catalog.len()
                )));
            }
        }

        // Duplicate titles resolve to the first match; warn so a misleading
        // artifact is at least visible in the logs.
        let mut seen: HashMap<&str, u32> = HashMap::new();
        for entry in &catalog {
            *seen.entry(entry.title.as_str()).or_insert(0) += 1;
        }
        for (title, count) in seen {
            if count > 1 {
                tracing::warn!(%title, count, "Duplicate title in catalog; queries resolve to the first match");
            }
        }

        Ok(Self {
            catalog,
            similarity,
        })
    }

    /// The catalog in load order
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.catalog
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    /// Returns up to `TOP_N` entries most similar to the titled movie
    ///
    /// Resolves `title` to its catalog index (first match wins), reads that
    /// similarity row, and ranks every other entry by descending score. The
    /// sort is stable, so ties keep catalog order. The queried movie never
    /// appears in its own results, and a catalog of six or fewer entries
    /// simply yields fewer results.
    pub fn recommend(&self, title: &str) -> AppResult<Vec<CatalogEntry>> {
        let index = self
            .catalog
            .iter()
            .position(|entry| entry.title == title)
            .ok_or_else(|| AppError::NotFound(format!("No movie titled '{}'", title)))?;

        let row = &self.similarity[index];

        let mut ranked: Vec<(usize, f32)> = row
            .iter()
            .copied()
            .enumerate()
            .filter(|&(k, _)| k != index)
            .collect();

        // Descending by score; a NaN cell (corrupt artifact) sorts last so
        // it can never float into the results ahead of a real score.
        ranked.sort_by(|a, b| match b.1.partial_cmp(&a.1) {
            Some(ordering) => ordering,
            None => match (a.1.is_nan(), b.1.is_nan()) {
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                _ => Ordering::Equal,
            },
        });

        Ok(ranked
            .into_iter()
            .take(TOP_N)
            .map(|(k, _)| self.catalog[k].clone())
            .collect())
    }
}
