//! Demo command - runs memoization scenarios against a configured store

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::AppConfig;
use crate::domain::{MemoError, OperationIdentity};
use crate::infrastructure::cache::{CacheConfig, CacheFactory};
use crate::infrastructure::logging;
use crate::infrastructure::memo::Memoizer;

/// Arguments for the demo command
#[derive(Args, Clone, Debug)]
pub struct DemoArgs {
    /// TTL in seconds for wrapped operations (overrides config)
    #[arg(long)]
    pub ttl: Option<i64>,

    /// Scenario to run
    #[arg(long, value_enum, default_value_t = Scenario::All)]
    pub scenario: Scenario,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scenario {
    /// Repeated call with identical arguments
    Repeat,
    /// Call, wait past the TTL, call again
    Expiry,
    /// Failures are cached like values
    Failure,
    /// Asynchronous operation
    Async,
    All,
}

/// A single runnable scenario; `Scenario::All` expands to every step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Repeat,
    Expiry,
    Failure,
    Async,
}

#[derive(Debug, Clone, thiserror::Error, Serialize, Deserialize)]
enum DemoError {
    #[error("{0}")]
    Operation(String),
    #[error(transparent)]
    Memo(#[from] MemoError),
}

/// Run the demo scenarios
pub async fn run(args: DemoArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging)?;

    let cache = CacheFactory::new().create(&CacheConfig::from_settings(&config.cache)?)?;
    let memoizer = Memoizer::new(cache);
    let ttl = args.ttl.unwrap_or(config.cache.default_ttl_secs);

    for step in selected(args.scenario) {
        memoizer.flush_all()?;
        info!(scenario = ?step, ttl_secs = ttl, "Running scenario");

        let calls = match step {
            Step::Repeat => repeat(&memoizer, ttl)?,
            Step::Expiry => expiry(&memoizer, ttl).await?,
            Step::Failure => failure(&memoizer, ttl)?,
            Step::Async => run_async(&memoizer, ttl).await?,
        };

        info!(scenario = ?step, invocations = calls, "Scenario finished");
    }

    Ok(())
}

fn selected(scenario: Scenario) -> Vec<Step> {
    match scenario {
        Scenario::Repeat => vec![Step::Repeat],
        Scenario::Expiry => vec![Step::Expiry],
        Scenario::Failure => vec![Step::Failure],
        Scenario::Async => vec![Step::Async],
        Scenario::All => vec![Step::Repeat, Step::Expiry, Step::Failure, Step::Async],
    }
}

fn counted(calls: Arc<AtomicUsize>) -> impl Fn((String, String)) -> Result<String, DemoError> {
    move |(a, b): (String, String)| {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("Result for {}-{}", a, b))
    }
}

fn names() -> (String, String) {
    ("John".to_string(), "Doe".to_string())
}

fn repeat(memoizer: &Memoizer, ttl: i64) -> anyhow::Result<usize> {
    let calls = Arc::new(AtomicUsize::new(0));
    let memoized = memoizer.wrap(
        OperationIdentity::new("Demo", "describe"),
        ttl,
        counted(calls.clone()),
    )?;

    for _ in 0..2 {
        let result = memoized.call(names())?;
        info!(result = %result, "describe(John, Doe)");
    }

    Ok(calls.load(Ordering::SeqCst))
}

async fn expiry(memoizer: &Memoizer, ttl: i64) -> anyhow::Result<usize> {
    let calls = Arc::new(AtomicUsize::new(0));
    let memoized = memoizer.wrap(
        OperationIdentity::new("Demo", "describe"),
        ttl,
        counted(calls.clone()),
    )?;

    let first = memoized.call(names())?;
    info!(result = %first, "describe(John, Doe)");

    let wait = memoized.ttl().as_duration() + Duration::from_millis(100);
    info!(wait_ms = wait.as_millis() as u64, "Waiting past TTL");
    tokio::time::sleep(wait).await;

    let second = memoized.call(names())?;
    info!(result = %second, "describe(John, Doe)");

    Ok(calls.load(Ordering::SeqCst))
}

fn failure(memoizer: &Memoizer, ttl: i64) -> anyhow::Result<usize> {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let memoized = memoizer.wrap(
        OperationIdentity::new("Demo", "checked"),
        ttl,
        move |(param,): (u32,)| {
            counter.fetch_add(1, Ordering::SeqCst);
            if param == 1 {
                Err(DemoError::Operation(format!("Error with param {}", param)))
            } else {
                Ok(format!("Result for {}", param))
            }
        },
    )?;

    for param in [2, 1, 2, 1] {
        match memoized.call((param,)) {
            Ok(result) => info!(param, result = %result, "checked"),
            Err(e) => info!(param, error = %e, "checked failed"),
        }
    }

    Ok(calls.load(Ordering::SeqCst))
}

async fn run_async(memoizer: &Memoizer, ttl: i64) -> anyhow::Result<usize> {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let memoized = memoizer.wrap_async(
        OperationIdentity::new("Demo", "describe_async"),
        ttl,
        move |(a, b): (String, String)| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                tokio::task::yield_now().await;
                Ok::<_, DemoError>(format!("Result for {}-{}", a, b))
            }
        },
    )?;

    for _ in 0..2 {
        let result = memoized.call(names()).await?;
        info!(result = %result, "describe_async(John, Doe)");
    }

    Ok(calls.load(Ordering::SeqCst))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::cache::InMemoryCache;

    fn memoizer() -> Memoizer {
        Memoizer::new(Arc::new(InMemoryCache::new()))
    }

    #[test]
    fn test_all_expands_to_every_scenario() {
        assert_eq!(
            selected(Scenario::All),
            vec![Step::Repeat, Step::Expiry, Step::Failure, Step::Async]
        );
        assert_eq!(selected(Scenario::Failure), vec![Step::Failure]);
        assert_eq!(selected(Scenario::Async), vec![Step::Async]);
    }

    #[test]
    fn test_repeat_invokes_once() {
        assert_eq!(repeat(&memoizer(), 10).unwrap(), 1);
    }

    #[test]
    fn test_failure_invokes_once_per_argument() {
        assert_eq!(failure(&memoizer(), 10).unwrap(), 2);
    }

    #[tokio::test]
    async fn test_async_invokes_once() {
        assert_eq!(run_async(&memoizer(), 10).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_expiry_invokes_twice() {
        assert_eq!(expiry(&memoizer(), 1).await.unwrap(), 2);
    }

    #[test]
    fn test_invalid_ttl_is_reported() {
        assert!(repeat(&memoizer(), 0).is_err());
    }
}
