use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;
use tokio::sync::mpsc;

/// Creates a Redis client for the metadata cache
///
/// Connection establishment is lazy; a missing Redis server degrades every
/// lookup to a miss rather than failing startup.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Converted TMDB details for one movie
    MovieDetails(u32),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::MovieDetails(movie_id) => write!(f, "movie:{}", movie_id),
        }
    }
}

/// Message for asynchronous cache writes
struct CacheWriteMessage {
    key: String,
    value: String,
    ttl: u64,
}

/// Redis-backed cache with non-blocking writes
///
/// Reads go straight to Redis; any read failure is logged and reported as
/// a miss, so a broken cache slows queries down instead of breaking them.
/// Writes are handed to a background task via a channel and never block
/// the request path.
#[derive(Clone)]
pub struct Cache {
    redis_client: Client,
    write_tx: mpsc::UnboundedSender<CacheWriteMessage>,
}

/// Handle for gracefully shutting down the cache writer
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
}

impl CacheWriterHandle {
    /// Signals the writer task to flush pending writes and stop
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Cache writer shutdown signal sent");
    }
}

impl Cache {
    /// Creates a cache and spawns its background writer task
    pub async fn new(redis_client: Client) -> (Self, CacheWriterHandle) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let client = redis_client.clone();
        tokio::spawn(async move {
            Self::cache_writer_task(client, write_rx, shutdown_rx).await;
        });

        let cache = Self {
            redis_client,
            write_tx,
        };

        (cache, CacheWriterHandle { shutdown_tx })
    }

    /// Cache wired to nothing: every read misses, every write is dropped
    #[cfg(test)]
    pub fn disconnected() -> Self {
        let (write_tx, _) = mpsc::unbounded_channel();
        Self {
            redis_client: Client::open("redis://127.0.0.1:1").unwrap(),
            write_tx,
        }
    }

    /// Background task that drains cache write messages into Redis
    ///
    /// On shutdown signal, flushes whatever is still queued before exiting.
    async fn cache_writer_task(
        client: Client,
        mut write_rx: mpsc::UnboundedReceiver<CacheWriteMessage>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!("Cache writer task started");

        loop {
            tokio::select! {
                Some(msg) = write_rx.recv() => {
                    if let Err(e) = Self::write_to_redis(&client, msg).await {
                        tracing::warn!(error = %e, "Failed to write to Redis cache");
                    }
                }
                _ = shutdown_rx.recv() => {
                    write_rx.close();
                    let mut flushed = 0;
                    while let Some(msg) = write_rx.recv().await {
                        flushed += 1;
                        if let Err(e) = Self::write_to_redis(&client, msg).await {
                            tracing::warn!(error = %e, "Failed to flush cache write during shutdown");
                        }
                    }
                    tracing::info!(flushed, "Cache writer task stopped");
                    break;
                }
            }
        }
    }

    async fn write_to_redis(client: &Client, msg: CacheWriteMessage) -> redis::RedisResult<()> {
        let mut conn = client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(msg.key, msg.value, msg.ttl).await?;
        Ok(())
    }

    /// Looks up a cached value; failures count as misses
    pub async fn get<T: serde::de::DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let mut conn = match self.redis_client.get_multiplexed_async_connection().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cache unreachable, treating as miss");
                return None;
            }
        };

        let cached: Option<String> = match conn.get(format!("{}", key)).await {
            Ok(cached) => cached,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cache read failed, treating as miss");
                return None;
            }
        };

        let json = cached?;
        match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cache entry undecodable, treating as miss");
                None
            }
        }
    }

    /// Queues a cache write without blocking
    ///
    /// Serialization happens inline; the Redis write happens on the
    /// background task. There is no confirmation the write landed.
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cache serialization error");
                return;
            }
        };

        let msg = CacheWriteMessage {
            key: format!("{}", key),
            value: json,
            ttl,
        };

        if self.write_tx.send(msg).is_err() {
            tracing::warn!(key = %key, "Cache writer gone, dropping write");
        }
    }
}
