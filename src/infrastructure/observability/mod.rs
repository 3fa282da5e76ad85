//! Observability infrastructure - memoization metrics

mod metrics;

pub use self::metrics::{record_invocation, record_lookup, record_store_error, LookupResult, StoreStage};
