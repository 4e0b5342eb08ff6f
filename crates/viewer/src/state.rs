//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::SqlitePool;

use mensa_core::{CanteenLevel, Category, MenuItem};

use crate::config::ViewerConfig;
use crate::watch::RevisionWatcher;

/// Listing cache TTL. Entries are also invalidated eagerly whenever the
/// catalog revision changes; the TTL is a backstop.
const LISTING_CACHE_TTL: Duration = Duration::from_secs(300);

/// Maximum cached listings (one per filter combination; the key space is
/// tiny, this is a formality).
const LISTING_CACHE_CAPACITY: u64 = 64;

/// Cache key: one entry per filter combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListingKey {
    pub level: Option<CanteenLevel>,
    pub category: Option<Category>,
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources. It is built once at startup and read-only thereafter.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ViewerConfig,
    pool: SqlitePool,
    listing_cache: Cache<ListingKey, Arc<Vec<MenuItem>>>,
    watcher: RevisionWatcher,
}

impl AppState {
    /// Create a new application state and start the revision watcher.
    #[must_use]
    pub fn new(config: ViewerConfig, pool: SqlitePool) -> Self {
        let listing_cache = Cache::builder()
            .max_capacity(LISTING_CACHE_CAPACITY)
            .time_to_live(LISTING_CACHE_TTL)
            .build();

        let watcher = RevisionWatcher::spawn(pool.clone(), config.revision_poll_interval);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                listing_cache,
                watcher,
            }),
        }
    }

    /// Get a reference to the viewer configuration.
    #[must_use]
    pub fn config(&self) -> &ViewerConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// Get a reference to the listing cache.
    #[must_use]
    pub fn listing_cache(&self) -> &Cache<ListingKey, Arc<Vec<MenuItem>>> {
        &self.inner.listing_cache
    }

    /// Get a reference to the revision watcher.
    #[must_use]
    pub fn watcher(&self) -> &RevisionWatcher {
        &self.inner.watcher
    }
}
