//! Memoization infrastructure - wrapping operations with TTL caching

mod async_memoized;
mod interceptor;
mod memoized;
mod memoizer;

pub use async_memoized::AsyncMemoized;
pub use memoized::Memoized;
pub use memoizer::Memoizer;
