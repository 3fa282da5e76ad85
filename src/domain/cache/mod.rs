//! Cache domain - store contract and key derivation

mod key;
mod repository;

pub use key::{CacheKey, KeyDeriver, OperationIdentity};
pub use repository::{Cache, CacheExt};

#[cfg(test)]
pub use repository::MockCache;
