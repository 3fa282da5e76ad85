//! ttl-memo
//!
//! Transparent memoization for synchronous and asynchronous operations:
//! - Deterministic cache keys from an operation identity and its arguments
//! - Successes and failures cached alike, replayed for a fixed TTL
//! - Pluggable TTL store, with a moka-backed in-memory implementation
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use ttl_memo::domain::{MemoError, OperationIdentity};
//! use ttl_memo::infrastructure::cache::InMemoryCache;
//! use ttl_memo::infrastructure::memo::Memoizer;
//!
//! let memoizer = Memoizer::new(Arc::new(InMemoryCache::new()));
//! let describe = memoizer.wrap(
//!     OperationIdentity::new("Greeter", "describe"),
//!     10,
//!     |(a, b): (String, String)| Ok::<_, MemoError>(format!("Result for {}-{}", a, b)),
//! )?;
//!
//! let result = describe.call(("John".to_string(), "Doe".to_string()))?;
//! assert_eq!(result, "Result for John-Doe");
//! # Ok::<(), MemoError>(())
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::{Cache, CacheExt, CacheKey, KeyDeriver, MemoError, OperationIdentity, Outcome, Ttl};
pub use infrastructure::cache::{CacheConfig, CacheFactory, InMemoryCache, InMemoryCacheConfig};
pub use infrastructure::memo::{AsyncMemoized, Memoized, Memoizer};
