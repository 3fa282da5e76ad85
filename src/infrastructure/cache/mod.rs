//! Cache infrastructure - Cache implementations

mod factory;
mod in_memory;

pub use factory::{CacheConfig, CacheFactory, CacheType};
pub use in_memory::{InMemoryCache, InMemoryCacheConfig};
