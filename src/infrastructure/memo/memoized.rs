//! Memoizing wrapper for synchronous operations

use std::fmt;
use std::marker::PhantomData;
use std::time::Instant;

use serde::{de::DeserializeOwned, Serialize};

use super::interceptor::{Interceptor, Lookup};
use crate::domain::cache::OperationIdentity;
use crate::domain::memo::{Outcome, Ttl};
use crate::domain::MemoError;

/// A synchronous operation whose outcomes are cached for a fixed TTL
///
/// Created by [`Memoizer::wrap`](super::Memoizer::wrap). Calling it has the
/// same shape as calling the operation: arguments in, `Result<T, E>` out.
pub struct Memoized<A, T, E, F> {
    interceptor: Interceptor,
    operation: F,
    _marker: PhantomData<fn(A) -> Result<T, E>>,
}

impl<A, T, E, F> Memoized<A, T, E, F> {
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

impl<A, T, E, F> Memoized<A, T, E, F>
where
    A: Serialize,
    T: Serialize + DeserializeOwned,
    E: Serialize + DeserializeOwned + From<MemoError>,
    F: Fn(A) -> Result<T, E>,
{
    /// Calls the operation, or replays the stored outcome for these arguments
    ///
    /// A stored failure is returned as `Err` exactly as it was captured. The
    /// only error this wrapper adds is [`MemoError::Serialization`] for
    /// arguments that cannot be keyed, converted through `E::from`.
    pub fn call(&self, args: A) -> Result<T, E> {
        let key = match self.interceptor.lookup::<A, T, E>(&args)? {
            Lookup::Hit(outcome) => return outcome.into_result(),
            Lookup::Miss(key) => key,
        };

        let started = Instant::now();
        let outcome = Outcome::from((self.operation)(args));
        self.interceptor.store(&key, &outcome, started);

        outcome.into_result()
    }
}

impl<A, T, E, F> fmt::Debug for Memoized<A, T, E, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memoized")
            .field("identity", &self.identity().to_string())
            .field("ttl", &self.ttl())
            .finish()
    }
}
