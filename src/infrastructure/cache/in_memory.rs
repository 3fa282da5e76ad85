//! In-memory cache implementation using moka

use std::time::{Duration, Instant};

use moka::sync::Cache as MokaCache;
use moka::Expiry;

use crate::domain::cache::Cache;
use crate::domain::MemoError;

/// Configuration for in-memory cache
#[derive(Debug, Clone)]
pub struct InMemoryCacheConfig {
    /// Maximum number of entries
    pub max_capacity: u64,
}

impl Default for InMemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
        }
    }
}

impl InMemoryCacheConfig {
    /// Sets the maximum number of entries
    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = capacity;
        self
    }
}

/// Cache entry stored in moka
#[derive(Debug, Clone)]
struct CacheEntry {
    /// Serialized JSON outcome
    data: String,
    /// TTL given to the write that created this entry
    ttl: Duration,
    expires_at: Instant,
}

/// Each entry lives for the TTL of the write that produced it
#[derive(Debug)]
struct EntryExpiry;

impl Expiry<String, CacheEntry> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CacheEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Thread-safe in-memory cache implementation using moka
///
/// Features:
/// - TTL per entry, restarted on overwrite
/// - Eviction when capacity is reached
/// - Concurrent access from threads and async tasks
#[derive(Debug)]
pub struct InMemoryCache {
    cache: MokaCache<String, CacheEntry>,
    config: InMemoryCacheConfig,
}

impl InMemoryCache {
    /// Creates a new in-memory cache with default configuration
    pub fn new() -> Self {
        Self::with_config(InMemoryCacheConfig::default())
    }

    /// Creates a new in-memory cache with the given configuration
    pub fn with_config(config: InMemoryCacheConfig) -> Self {
        let cache = MokaCache::builder()
            .max_capacity(config.max_capacity)
            .expire_after(EntryExpiry)
            .build();

        tracing::info!(max_capacity = config.max_capacity, "In-memory cache created");

        Self { cache, config }
    }

    pub fn config(&self) -> &InMemoryCacheConfig {
        &self.config
    }

    fn live_entry(&self, key: &str) -> Option<CacheEntry> {
        let entry = self.cache.get(key)?;

        if Instant::now() >= entry.expires_at {
            self.cache.invalidate(key);
            return None;
        }

        Some(entry)
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl Cache for InMemoryCache {
    fn get_raw(&self, key: &str) -> Result<Option<String>, MemoError> {
        Ok(self.live_entry(key).map(|entry| entry.data))
    }

    fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), MemoError> {
        if ttl.is_zero() {
            return Err(MemoError::invalid_ttl(0));
        }

        let Some(expires_at) = Instant::now().checked_add(ttl) else {
            let seconds = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
            return Err(MemoError::invalid_ttl(seconds));
        };

        let entry = CacheEntry {
            data: value.to_string(),
            ttl,
            expires_at,
        };

        self.cache.insert(key.to_string(), entry);
        Ok(())
    }

    fn flush_all(&self) -> Result<(), MemoError> {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks();
        Ok(())
    }

    fn size(&self) -> Result<usize, MemoError> {
        self.cache.run_pending_tasks();
        Ok(self.cache.entry_count() as usize)
    }

    fn ttl(&self, key: &str) -> Result<Option<Duration>, MemoError> {
        Ok(self
            .live_entry(key)
            .map(|entry| entry.expires_at.saturating_duration_since(Instant::now())))
    }
}
