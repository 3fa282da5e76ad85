//! Domain layer - core memoization types and contracts

pub mod cache;
pub mod error;
pub mod memo;

pub use cache::{Cache, CacheExt, CacheKey, KeyDeriver, OperationIdentity};
pub use error::MemoError;
pub use memo::{Outcome, Ttl};
