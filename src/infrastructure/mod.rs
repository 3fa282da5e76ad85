//! Infrastructure layer - store implementations, wrappers and observability

pub mod cache;
pub mod logging;
pub mod memo;
pub mod observability;
