//! Memoization domain - outcomes and TTLs

mod outcome;
mod ttl;

pub use outcome::Outcome;
pub use ttl::Ttl;
