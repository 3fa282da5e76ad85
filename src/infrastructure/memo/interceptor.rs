//! Lookup and store steps shared by the sync and async wrappers

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{de::DeserializeOwned, Serialize};

use crate::domain::cache::{Cache, CacheExt, CacheKey, KeyDeriver, OperationIdentity};
use crate::domain::memo::{Outcome, Ttl};
use crate::domain::MemoError;
use crate::infrastructure::observability::{self, LookupResult, StoreStage};

/// Result of consulting the store for one invocation
#[derive(Debug)]
pub(crate) enum Lookup<T, E> {
    Hit(Outcome<T, E>),
    Miss(CacheKey),
}

#[derive(Debug, Clone)]
pub(crate) struct Interceptor {
    identity: OperationIdentity,
    label: String,
    ttl: Ttl,
    cache: Arc<dyn Cache>,
    keys: KeyDeriver,
}

impl Interceptor {
    pub(crate) fn new(
        identity: OperationIdentity,
        ttl: Ttl,
        cache: Arc<dyn Cache>,
        keys: KeyDeriver,
    ) -> Self {
        let label = identity.to_string();

        Self {
            identity,
            label,
            ttl,
            cache,
            keys,
        }
    }

    pub(crate) fn identity(&self) -> &OperationIdentity {
        &self.identity
    }

    pub(crate) fn ttl(&self) -> Ttl {
        self.ttl
    }

    /// Derives the key and looks it up
    ///
    /// Only key derivation can fail. A store fault, or an entry that does not
    /// decode as `Outcome<T, E>`, is reported as a miss.
    pub(crate) fn lookup<A, T, E>(&self, args: &A) -> Result<Lookup<T, E>, MemoError>
    where
        A: Serialize + ?Sized,
        T: DeserializeOwned,
        E: DeserializeOwned,
    {
        let key = self.keys.derive(&self.identity, args)?;

        match self.cache.get_outcome::<T, E>(key.as_str()) {
            Ok(Some(outcome)) => {
                tracing::debug!(
                    operation = %self.label,
                    key = %key,
                    failure = outcome.is_failure(),
                    "Cache hit, replaying stored outcome"
                );
                observability::record_lookup(&self.label, LookupResult::Hit);
                Ok(Lookup::Hit(outcome))
            }
            Ok(None) => {
                tracing::debug!(operation = %self.label, key = %key, "Cache miss, invoking operation");
                observability::record_lookup(&self.label, LookupResult::Miss);
                Ok(Lookup::Miss(key))
            }
            Err(e) => {
                tracing::warn!(
                    operation = %self.label,
                    key = %key,
                    error = %e,
                    "Cache lookup failed, invoking operation"
                );
                observability::record_store_error(&self.label, StoreStage::Get);
                observability::record_lookup(&self.label, LookupResult::Miss);
                Ok(Lookup::Miss(key))
            }
        }
    }

    /// Stores a freshly computed outcome, replacing any entry for `key`
    ///
    /// A failed write is logged; the caller still receives its outcome.
    pub(crate) fn store<T, E>(&self, key: &CacheKey, outcome: &Outcome<T, E>, started: Instant)
    where
        T: Serialize,
        E: Serialize,
    {
        let elapsed: Duration = started.elapsed();
        observability::record_invocation(&self.label, outcome.is_success(), elapsed);

        match self
            .cache
            .set_outcome(key.as_str(), outcome, self.ttl.as_duration())
        {
            Ok(()) => {
                tracing::debug!(
                    operation = %self.label,
                    key = %key,
                    ttl = %self.ttl,
                    failure = outcome.is_failure(),
                    "Outcome cached"
                );
            }
            Err(e) => {
                tracing::warn!(
                    operation = %self.label,
                    key = %key,
                    error = %e,
                    "Failed to cache outcome"
                );
                observability::record_store_error(&self.label, StoreStage::Set);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::MockCache;
    use crate::infrastructure::cache::InMemoryCache;

    fn interceptor(cache: Arc<dyn Cache>) -> Interceptor {
        Interceptor::new(
            OperationIdentity::new("TestClass", "test_method"),
            Ttl::from_secs(10).unwrap(),
            cache,
            KeyDeriver::new(),
        )
    }

    #[test]
    fn test_lookup_miss_then_hit() {
        let interceptor = interceptor(Arc::new(InMemoryCache::new()));
        let args = ("John", "Doe");

        let key = match interceptor.lookup::<_, String, String>(&args).unwrap() {
            Lookup::Miss(key) => key,
            Lookup::Hit(_) => panic!("expected a miss on an empty cache"),
        };

        let outcome: Outcome<String, String> = Outcome::Success("Result for John-Doe".to_string());
        interceptor.store(&key, &outcome, Instant::now());

        match interceptor.lookup::<_, String, String>(&args).unwrap() {
            Lookup::Hit(stored) => assert_eq!(stored, outcome),
            Lookup::Miss(_) => panic!("expected a hit after storing"),
        }
    }

    #[test]
    fn test_store_uses_wrap_ttl() {
        let mut cache = MockCache::new();
        cache
            .expect_set_raw()
            .withf(|_, _, ttl| *ttl == Duration::from_secs(10))
            .times(1)
            .returning(|_, _, _| Ok(()));

        let interceptor = interceptor(Arc::new(cache));
        let key = KeyDeriver::new()
            .derive(interceptor.identity(), &(1,))
            .unwrap();

        let outcome: Outcome<String, String> = Outcome::Success("ok".to_string());
        interceptor.store(&key, &outcome, Instant::now());
    }

    #[test]
    fn test_lookup_error_is_a_miss() {
        let mut cache = MockCache::new();
        cache
            .expect_get_raw()
            .returning(|_| Err(MemoError::cache("store unavailable")));

        let interceptor = interceptor(Arc::new(cache));

        let lookup = interceptor.lookup::<_, String, String>(&(1,)).unwrap();
        assert!(matches!(lookup, Lookup::Miss(_)));
    }

    #[test]
    fn test_undecodable_entry_is_a_miss() {
        let mut cache = MockCache::new();
        cache
            .expect_get_raw()
            .returning(|_| Ok(Some("not json".to_string())));

        let interceptor = interceptor(Arc::new(cache));

        let lookup = interceptor.lookup::<_, String, String>(&(1,)).unwrap();
        assert!(matches!(lookup, Lookup::Miss(_)));
    }

    #[test]
    fn test_store_error_is_swallowed() {
        let mut cache = MockCache::new();
        cache
            .expect_set_raw()
            .returning(|_, _, _| Err(MemoError::cache("store unavailable")));

        let interceptor = interceptor(Arc::new(cache));
        let key = KeyDeriver::new()
            .derive(interceptor.identity(), &(1,))
            .unwrap();

        let outcome: Outcome<String, String> = Outcome::Failure("boom".to_string());
        interceptor.store(&key, &outcome, Instant::now());
    }

    #[test]
    fn test_lookup_fails_on_unserializable_args() {
        let interceptor = interceptor(Arc::new(InMemoryCache::new()));

        let mut args = std::collections::BTreeMap::new();
        args.insert(vec![1], "list key");

        let result = interceptor.lookup::<_, String, String>(&(args,));
        assert!(matches!(result, Err(MemoError::Serialization { .. })));
    }
}
