//! Cache trait definition

use std::fmt::Debug;
use std::time::Duration;

#[cfg(test)]
use mockall::automock;
use serde::{de::DeserializeOwned, Serialize};

use crate::domain::memo::Outcome;
use crate::domain::MemoError;

/// TTL key-value store consumed by the memoization layer
///
/// Values are JSON strings so the trait stays dyn-compatible; use
/// [`CacheExt`] for typed access. The trait is synchronous so that wrappers
/// around synchronous operations never need an executor.
#[cfg_attr(test, automock)]
pub trait Cache: Send + Sync + Debug {
    /// Gets a raw JSON value, `None` when there is no live entry
    fn get_raw(&self, key: &str) -> Result<Option<String>, MemoError>;

    /// Sets a raw JSON value, replacing any entry for `key` and its TTL
    fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), MemoError>;

    /// Clears all entries immediately
    fn flush_all(&self) -> Result<(), MemoError>;

    /// Returns the approximate number of live entries
    fn size(&self) -> Result<usize, MemoError>;

    /// Gets the remaining TTL for a key
    fn ttl(&self, key: &str) -> Result<Option<Duration>, MemoError>;
}

/// Extension trait providing typed outcome access
pub trait CacheExt: Cache {
    /// Gets a stored outcome
    fn get_outcome<T, E>(&self, key: &str) -> Result<Option<Outcome<T, E>>, MemoError>
    where
        T: DeserializeOwned,
        E: DeserializeOwned,
    {
        match self.get_raw(key)? {
            Some(data) => {
                let outcome = serde_json::from_str(&data).map_err(|e| {
                    MemoError::cache(format!("Failed to deserialize cached outcome: {}", e))
                })?;
                Ok(Some(outcome))
            }
            None => Ok(None),
        }
    }

    /// Stores an outcome with a TTL
    fn set_outcome<T, E>(
        &self,
        key: &str,
        outcome: &Outcome<T, E>,
        ttl: Duration,
    ) -> Result<(), MemoError>
    where
        T: Serialize,
        E: Serialize,
    {
        let data = serde_json::to_string(outcome).map_err(|e| {
            MemoError::cache(format!("Failed to serialize outcome: {}", e))
        })?;
        self.set_raw(key, &data, ttl)
    }
}

// Blanket implementation for all types implementing Cache
impl<C: Cache + ?Sized> CacheExt for C {}
