//! Caching layer for directions responses.
//!
//! Toggling modes back and forth re-issues the same request many times, so
//! successful candidate lists are cached per (from, to, mode). Keys use the
//! exact coordinate bits, matching the session's exact pick equality. Errors
//! are never cached, so a retry after a failure reaches the provider again.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::trace;

use crate::directions::{DirectionsError, DirectionsProvider};
use crate::domain::{Coordinate, Route, TransportMode};

/// Coordinate as its (latitude, longitude) bit patterns.
type CoordinateKey = (u64, u64);

/// Cache key for candidate lists: (from, to, mode).
type RouteKey = (CoordinateKey, CoordinateKey, TransportMode);

/// Cached candidate list.
type RouteEntry = Arc<Vec<Route>>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_capacity: 256,
        }
    }
}

/// Bit-exact key for a coordinate.
///
/// `0.0` and `-0.0` compare equal, so the sign of zero is dropped to keep
/// equal coordinates on the same key.
fn coordinate_key(c: Coordinate) -> CoordinateKey {
    ((c.latitude + 0.0).to_bits(), (c.longitude + 0.0).to_bits())
}

fn route_key(from: Coordinate, to: Coordinate, mode: TransportMode) -> RouteKey {
    (coordinate_key(from), coordinate_key(to), mode)
}

/// Directions provider with caching.
///
/// Wraps any `DirectionsProvider` and caches its successful responses.
pub struct CachedDirections<P> {
    provider: P,
    routes: MokaCache<RouteKey, RouteEntry>,
}

impl<P: DirectionsProvider> CachedDirections<P> {
    /// Create a new cached provider.
    pub fn new(provider: P, config: &CacheConfig) -> Self {
        let routes = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { provider, routes }
    }

    /// Get cache statistics.
    pub fn cache_entry_count(&self) -> u64 {
        self.routes.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_cache(&self) {
        self.routes.invalidate_all();
    }
}

impl<P: DirectionsProvider> DirectionsProvider for CachedDirections<P> {
    async fn request_route(
        &self,
        from: Coordinate,
        to: Coordinate,
        mode: TransportMode,
    ) -> Result<Vec<Route>, DirectionsError> {
        let key = route_key(from, to, mode);

        // Try cache first
        if let Some(cached) = self.routes.get(&key).await {
            trace!(%from, %to, %mode, "Directions cache hit");
            return Ok(cached.as_ref().clone());
        }

        let routes = self.provider.request_route(from, to, mode).await?;

        self.routes.insert(key, Arc::new(routes.clone())).await;

        Ok(routes)
    }
}
