//! Entry point for wrapping operations with TTL memoization

use std::future::Future;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use super::async_memoized::AsyncMemoized;
use super::interceptor::Interceptor;
use super::memoized::Memoized;
use crate::domain::cache::{Cache, KeyDeriver, OperationIdentity};
use crate::domain::memo::Ttl;
use crate::domain::MemoError;

/// Wraps operations so their outcomes are cached in a shared store
///
/// The store is injected, so every wrapper built from the same `Memoizer`
/// (or from clones of it) shares entries, and tests can swap or flush it.
/// Wrappers with the same identity share entries for equal arguments.
///
/// Concurrent misses for the same key are not coalesced: each caller runs
/// the operation and writes its own outcome, and the last write wins.
#[derive(Debug, Clone)]
pub struct Memoizer {
    cache: Arc<dyn Cache>,
    keys: KeyDeriver,
}

impl Memoizer {
    /// Creates a memoizer backed by the given store
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self {
            cache,
            keys: KeyDeriver::new(),
        }
    }

    /// Uses a custom key deriver (e.g. one with a namespace prefix)
    pub fn with_key_deriver(mut self, keys: KeyDeriver) -> Self {
        self.keys = keys;
        self
    }

    pub fn cache(&self) -> &Arc<dyn Cache> {
        &self.cache
    }

    /// Clears every cached outcome in the underlying store
    pub fn flush_all(&self) -> Result<(), MemoError> {
        tracing::debug!("Flushing all memoized outcomes");
        self.cache.flush_all()
    }

    /// Wraps a synchronous operation with a TTL in whole seconds
    ///
    /// Fails with [`MemoError::InvalidTtl`] when `ttl_secs` is zero, negative or
    /// above [`Ttl::MAX_SECS`].
    pub fn wrap<A, T, E, F>(
        &self,
        identity: OperationIdentity,
        ttl_secs: i64,
        operation: F,
    ) -> Result<Memoized<A, T, E, F>, MemoError>
    where
        A: Serialize,
        T: Serialize + DeserializeOwned,
        E: Serialize + DeserializeOwned + From<MemoError>,
        F: Fn(A) -> Result<T, E>,
    {
        self.wrap_with_ttl(identity, Ttl::from_secs(ttl_secs)?, operation)
    }

    /// Wraps a synchronous operation with an already validated TTL
    pub fn wrap_with_ttl<A, T, E, F>(
        &self,
        identity: OperationIdentity,
        ttl: Ttl,
        operation: F,
    ) -> Result<Memoized<A, T, E, F>, MemoError>
    where
        A: Serialize,
        T: Serialize + DeserializeOwned,
        E: Serialize + DeserializeOwned + From<MemoError>,
        F: Fn(A) -> Result<T, E>,
    {
        Ok(Memoized::new(self.interceptor(identity, ttl), operation))
    }

    /// Wraps an asynchronous operation with a TTL in whole seconds
    ///
    /// Fails with [`MemoError::InvalidTtl`] when `ttl_secs` is zero or negative.
    pub fn wrap_async<A, T, E, F, Fut>(
        &self,
        identity: OperationIdentity,
        ttl_secs: i64,
        operation: F,
    ) -> Result<AsyncMemoized<A, T, E, F>, MemoError>
    where
        A: Serialize,
        T: Serialize + DeserializeOwned,
        E: Serialize + DeserializeOwned + From<MemoError>,
        F: Fn(A) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.wrap_async_with_ttl(identity, Ttl::from_secs(ttl_secs)?, operation)
    }

    /// Wraps an asynchronous operation with an already validated TTL
    pub fn wrap_async_with_ttl<A, T, E, F, Fut>(
        &self,
        identity: OperationIdentity,
        ttl: Ttl,
        operation: F,
    ) -> Result<AsyncMemoized<A, T, E, F>, MemoError>
    where
        A: Serialize,
        T: Serialize + DeserializeOwned,
        E: Serialize + DeserializeOwned + From<MemoError>,
        F: Fn(A) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        Ok(AsyncMemoized::new(self.interceptor(identity, ttl), operation))
    }

    fn interceptor(&self, identity: OperationIdentity, ttl: Ttl) -> Interceptor {
        tracing::debug!(operation = %identity, ttl = %ttl, "Wrapping operation");
        Interceptor::new(identity, ttl, self.cache.clone(), self.keys.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use serde::Deserialize;

    use super::*;
    use crate::infrastructure::cache::InMemoryCache;

    #[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize, Deserialize)]
    enum TestError {
        #[error("{0}")]
        Operation(String),
        #[error(transparent)]
        Memo(#[from] MemoError),
    }

    fn memoizer() -> Memoizer {
        Memoizer::new(Arc::new(InMemoryCache::new()))
    }

    fn identity() -> OperationIdentity {
        OperationIdentity::new("TestClass", "test_method")
    }

    fn echo((value,): (u32,)) -> Result<u32, TestError> {
        Ok(value)
    }

    #[test]
    fn test_zero_ttl_is_rejected() {
        let result = memoizer().wrap(identity(), 0, echo);
        assert_eq!(result.unwrap_err(), MemoError::InvalidTtl { seconds: 0 });
    }

    #[test]
    fn test_negative_ttl_is_rejected() {
        let result = memoizer().wrap(identity(), -1, echo);
        assert_eq!(result.unwrap_err(), MemoError::InvalidTtl { seconds: -1 });
    }

    #[test]
    fn test_oversized_ttl_is_rejected_at_wrap_time() {
        let result = memoizer().wrap(identity(), i64::MAX, echo);
        assert_eq!(
            result.unwrap_err(),
            MemoError::InvalidTtl { seconds: i64::MAX }
        );

        let longest = memoizer().wrap(identity(), Ttl::MAX_SECS, echo).unwrap();
        assert_eq!(longest.call((1,)).unwrap(), 1);
        assert_eq!(longest.call((1,)).unwrap(), 1);
    }

    #[test]
    fn test_async_zero_ttl_is_rejected() {
        let result = memoizer().wrap_async(identity(), 0, |(value,): (u32,)| async move {
            Ok::<u32, TestError>(value)
        });
        assert!(matches!(result, Err(MemoError::InvalidTtl { seconds: 0 })));
    }

    #[test]
    fn test_wrapper_reports_identity_and_ttl() {
        let memoized = memoizer().wrap(identity(), 10, echo).unwrap();

        assert_eq!(memoized.identity().to_string(), "TestClass.test_method");
        assert_eq!(memoized.ttl().as_duration(), Duration::from_secs(10));
    }

    #[test]
    fn test_sub_second_ttl() {
        let ttl = Ttl::new(Duration::from_millis(500)).unwrap();
        let memoized = memoizer().wrap_with_ttl(identity(), ttl, echo).unwrap();

        assert_eq!(memoized.ttl(), ttl);
        assert_eq!(memoized.call((3,)).unwrap(), 3);
    }

    #[test]
    fn test_flush_all_resets_entries() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let memoizer = memoizer();

        let memoized = memoizer
            .wrap(identity(), 10, move |(value,): (u32,)| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, TestError>(value)
            })
            .unwrap();

        memoized.call((1,)).unwrap();
        memoizer.flush_all().unwrap();
        memoized.call((1,)).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_same_identity_shares_entries() {
        let memoizer = memoizer();

        let first = memoizer.wrap(identity(), 10, echo).unwrap();
        let second = memoizer
            .wrap(identity(), 10, |(_value,): (u32,)| {
                Err::<u32, TestError>(TestError::Operation("not reached".to_string()))
            })
            .unwrap();

        assert_eq!(first.call((5,)).unwrap(), 5);
        assert_eq!(second.call((5,)).unwrap(), 5);
    }

    #[test]
    fn test_different_identity_does_not_share_entries() {
        let memoizer = memoizer();

        let first = memoizer.wrap(identity(), 10, echo).unwrap();
        let second = memoizer
            .wrap(
                OperationIdentity::new("TestClass", "other_method"),
                10,
                |(value,): (u32,)| Ok::<u32, TestError>(value * 2),
            )
            .unwrap();

        assert_eq!(first.call((5,)).unwrap(), 5);
        assert_eq!(second.call((5,)).unwrap(), 10);
    }

    #[test]
    fn test_namespaced_keys() {
        let cache: Arc<dyn Cache> = Arc::new(InMemoryCache::new());
        let memoizer = Memoizer::new(cache.clone())
            .with_key_deriver(KeyDeriver::new().with_namespace("memo"));

        let memoized = memoizer.wrap(identity(), 10, echo).unwrap();
        memoized.call((5,)).unwrap();

        let key = KeyDeriver::new()
            .with_namespace("memo")
            .derive(&identity(), &(5,))
            .unwrap();
        assert!(cache.get_raw(key.as_str()).unwrap().is_some());
    }
}
