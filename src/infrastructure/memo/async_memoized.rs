//! Memoizing wrapper for asynchronous operations

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::time::Instant;

use serde::{de::DeserializeOwned, Serialize};

use super::interceptor::{Interceptor, Lookup};
use crate::domain::cache::OperationIdentity;
use crate::domain::memo::{Outcome, Ttl};
use crate::domain::MemoError;

/// An asynchronous operation whose resolved outcomes are cached for a fixed TTL
///
/// Created by [`Memoizer::wrap_async`](super::Memoizer::wrap_async). Only the
/// resolved `Result` is stored, never a pending future. Stored failures are
/// replayed through the returned future, so nothing surfaces before `.await`.
pub struct AsyncMemoized<A, T, E, F> {
    interceptor: Interceptor,
    operation: F,
    _marker: PhantomData<fn(A) -> Result<T, E>>,
}

impl<A, T, E, F> AsyncMemoized<A, T, E, F> {
    pub(crate) fn new(interceptor: Interceptor, operation: F) -> Self {
        Self {
            interceptor,
            operation,
            _marker: PhantomData,
        }
    }

    pub fn identity(&self) -> &OperationIdentity {
        self.interceptor.identity()
    }

    pub fn ttl(&self) -> Ttl {
        self.interceptor.ttl()
    }
}

impl<A, T, E, F, Fut> AsyncMemoized<A, T, E, F>
where
    A: Serialize,
    T: Serialize + DeserializeOwned,
    E: Serialize + DeserializeOwned + From<MemoError>,
    F: Fn(A) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    /// Awaits the operation, or replays the stored outcome for these arguments
    pub async fn call(&self, args: A) -> Result<T, E> {
        let key = match self.interceptor.lookup::<A, T, E>(&args)? {
            Lookup::Hit(outcome) => return outcome.into_result(),
            Lookup::Miss(key) => key,
        };

        let started = Instant::now();
        let outcome = Outcome::from((self.operation)(args).await);
        self.interceptor.store(&key, &outcome, started);

        outcome.into_result()
    }
}

impl<A, T, E, F> fmt::Debug for AsyncMemoized<A, T, E, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncMemoized")
            .field("identity", &self.identity().to_string())
            .field("ttl", &self.ttl())
            .finish()
    }
}
