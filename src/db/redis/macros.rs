/// A macro to simplify caching logic using Redis.
///
/// Checks the cache for a value under `$key`. On a hit the cached value is
/// returned; on a miss (including any cache failure, which `Cache::get`
/// reports as a miss) the block computes the value, queues a background
/// write, and returns it.
///
/// # Arguments
/// * `$cache`: The cache instance. Must have `get` and `set_in_background`
///   methods.
/// * `$key`: The key to cache the value under.
/// * `$ttl`: The time-to-live (TTL) for the cached value in seconds.
/// * `$block`: The block of code to execute if the value is not found in cache.
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        if let Some(cached) = $cache.get(&$key).await {
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.set_in_background(&$key, &value, $ttl);
            Ok(value)
        }
    }};
}
