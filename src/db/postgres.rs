use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::error::AppResult;

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Runs pending schema migrations (query_log and favorites tables)
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Read/write store for per-user favorite movies
///
/// Separate from the recommendation flow; nothing here can affect a
/// recommendation result.
#[derive(Clone)]
pub struct FavoritesStore {
    pool: PgPool,
}

impl FavoritesStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn save(&self, user_id: &str, movie: &str) -> AppResult<()> {
        sqlx::query("INSERT INTO favorites (user_id, movie) VALUES ($1, $2)")
            .bind(user_id)
            .bind(movie)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn list(&self, user_id: &str) -> AppResult<Vec<String>> {
        let movies: Vec<String> = sqlx::query_scalar(
            "SELECT movie FROM favorites WHERE user_id = $1 ORDER BY saved_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(movies)
    }
}
