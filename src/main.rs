use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use cineplex_api::{
    api::{create_router, AppState},
    config::Config,
    db,
    services::{
        loader,
        metadata::TmdbProvider,
        query_log::{NoopQueryLog, PostgresQueryLog, QueryLog},
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cineplex_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    // A malformed artifact halts here, before any query is accepted
    let recommender = loader::load_recommender(&config)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load catalog artifacts: {}", e))?;
    tracing::info!(movies = recommender.len(), "Catalog loaded");

    let redis_client = db::create_redis_client(&config.redis_url)?;
    let (cache, cache_writer) = db::Cache::new(redis_client).await;
    let metadata = Arc::new(TmdbProvider::new(cache, &config));

    let (query_log, favorites): (Arc<dyn QueryLog>, Option<db::FavoritesStore>) =
        match &config.database_url {
            Some(database_url) => {
                let pool = db::create_pool(database_url).await?;
                db::run_migrations(&pool).await?;
                tracing::info!("Query logging and favorites enabled");
                (
                    Arc::new(PostgresQueryLog::new(pool.clone())),
                    Some(db::FavoritesStore::new(pool)),
                )
            }
            None => {
                tracing::info!("DATABASE_URL not set; query logging and favorites disabled");
                (Arc::new(NoopQueryLog), None)
            }
        };

    let state = AppState::new(recommender, metadata, query_log, favorites);
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Server running");
    axum::serve(listener, app).await?;

    cache_writer.shutdown().await;

    Ok(())
}
