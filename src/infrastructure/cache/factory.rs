//! Cache factory for runtime selection

use std::sync::Arc;

use crate::config::CacheSettings;
use crate::domain::cache::Cache;
use crate::domain::MemoError;

use super::in_memory::{InMemoryCache, InMemoryCacheConfig};

/// Supported cache types
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CacheType {
    /// In-memory cache using moka
    #[default]
    InMemory,
}

impl std::fmt::Display for CacheType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheType::InMemory => write!(f, "in_memory"),
        }
    }
}

impl std::str::FromStr for CacheType {
    type Err = MemoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "in_memory" | "inmemory" | "memory" => Ok(CacheType::InMemory),
            _ => Err(MemoError::configuration(format!(
                "Unknown cache type: {}. Valid types: in_memory",
                s
            ))),
        }
    }
}

/// Configuration for cache factory
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Type of cache to create
    pub cache_type: CacheType,
    /// Maximum capacity (for in-memory cache)
    pub max_capacity: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_type: CacheType::InMemory,
            max_capacity: Some(10_000),
        }
    }
}

impl CacheConfig {
    /// Creates a new configuration for in-memory cache
    pub fn in_memory() -> Self {
        Self {
            cache_type: CacheType::InMemory,
            ..Default::default()
        }
    }

    /// Sets the maximum capacity (in-memory only)
    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = Some(capacity);
        self
    }

    /// Creates config from loaded application settings
    pub fn from_settings(settings: &CacheSettings) -> Result<Self, MemoError> {
        Ok(Self {
            cache_type: settings.cache_type.parse()?,
            max_capacity: Some(settings.max_capacity),
        })
    }
}

/// Factory for creating cache instances
#[derive(Debug, Default)]
pub struct CacheFactory;

impl CacheFactory {
    /// Creates a new cache factory
    pub fn new() -> Self {
        Self
    }

    /// Creates a cache instance based on configuration
    pub fn create(&self, config: &CacheConfig) -> Result<Arc<dyn Cache>, MemoError> {
        match config.cache_type {
            CacheType::InMemory => {
                let mut in_memory_config = InMemoryCacheConfig::default();

                if let Some(capacity) = config.max_capacity {
                    if capacity == 0 {
                        return Err(MemoError::configuration(
                            "In-memory cache capacity must be greater than zero",
                        ));
                    }
                    in_memory_config = in_memory_config.with_max_capacity(capacity);
                }

                Ok(Arc::new(InMemoryCache::with_config(in_memory_config)))
            }
        }
    }
}
