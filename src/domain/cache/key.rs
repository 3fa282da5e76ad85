//! Cache key derivation for memoized operations

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Serialize;
use serde_json::Value;

use crate::domain::MemoError;

/// Static identity of a memoized operation: owning type plus operation name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationIdentity {
    owner: String,
    operation: String,
}

impl OperationIdentity {
    /// Creates an identity from an explicit owner and operation name
    pub fn new(owner: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            operation: operation.into(),
        }
    }

    /// Creates an identity owned by the Rust type `T`
    ///
    /// Only the last path segment of the type name is used, so
    /// `my_crate::users::UserService` becomes `UserService`. Generic
    /// parameters are kept as written by the compiler.
    pub fn of<T: ?Sized>(operation: impl Into<String>) -> Self {
        Self::new(short_type_name::<T>(), operation)
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }
}

impl fmt::Display for OperationIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner, self.operation)
    }
}

fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);

    match base.rfind("::") {
        Some(idx) => &full[idx + 2..],
        None => full,
    }
}

/// A derived cache key
///
/// Keys are printable: `[namespace:]Owner.operation:<base64 of canonical args>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Derives cache keys from an operation identity and its argument tuple
#[derive(Debug, Clone, Default)]
pub struct KeyDeriver {
    namespace: Option<String>,
}

impl KeyDeriver {
    /// Creates a deriver producing keys without a namespace prefix
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefixes every derived key with `namespace:`
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Derives the key for a call of `identity` with `args`
    ///
    /// Arguments are serialized to JSON with object keys sorted, so equal
    /// structs and maps always encode the same way. Maps with non-string keys
    /// cannot be encoded and fail with [`MemoError::Serialization`].
    pub fn derive<A>(&self, identity: &OperationIdentity, args: &A) -> Result<CacheKey, MemoError>
    where
        A: Serialize + ?Sized,
    {
        let encoded = STANDARD.encode(canonical_json(args)?);

        let key = match &self.namespace {
            Some(namespace) => format!("{}:{}:{}", namespace, identity, encoded),
            None => format!("{}:{}", identity, encoded),
        };

        Ok(CacheKey(key))
    }
}

fn canonical_json<A: Serialize + ?Sized>(args: &A) -> Result<Vec<u8>, MemoError> {
    let value = canonicalize(serde_json::to_value(args)?);
    Ok(serde_json::to_vec(&value)?)
}

// Sorted explicitly: `serde_json/preserve_order` may be enabled elsewhere in the graph.
fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));

            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, canonicalize(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}
