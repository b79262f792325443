//! Compiled-validator cache.
//!
//! Validators are keyed by a SHA-256 digest of the schema description's
//! canonical form, so structurally equal descriptions built independently
//! share one compiled validator.

use crate::error::SchemaError;
use crate::validator::CompiledValidator;
use dashmap::DashMap;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::Arc;

/// Content key of a schema description.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaKey([u8; 32]);

impl SchemaKey {
    /// Compute the key of a schema description.
    ///
    /// Object keys are hashed in sorted order, so key order never changes
    /// the digest.
    pub fn of(description: &Value) -> Self {
        let mut hasher = Sha256::new();
        feed(&mut hasher, description);
        SchemaKey(hasher.finalize().into())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

fn feed(hasher: &mut Sha256, value: &Value) {
    match value {
        Value::Null => hasher.update([0u8]),
        Value::Bool(flag) => hasher.update([1u8, u8::from(*flag)]),
        Value::Number(number) => {
            hasher.update([2u8]);
            feed_str(hasher, &number.to_string());
        }
        Value::String(text) => {
            hasher.update([3u8]);
            feed_str(hasher, text);
        }
        Value::Array(elements) => {
            hasher.update([4u8]);
            hasher.update((elements.len() as u64).to_be_bytes());
            for element in elements {
                feed(hasher, element);
            }
        }
        Value::Object(map) => {
            hasher.update([5u8]);
            hasher.update((map.len() as u64).to_be_bytes());
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            for (key, value) in entries {
                feed_str(hasher, key);
                feed(hasher, value);
            }
        }
    }
}

fn feed_str(hasher: &mut Sha256, text: &str) {
    hasher.update((text.len() as u64).to_be_bytes());
    hasher.update(text.as_bytes());
}

impl fmt::Display for SchemaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Debug for SchemaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SchemaKey({})", self)
    }
}

/// Concurrent map from schema content key to compiled validator.
///
/// Cloning is cheap and clones share entries. There is no eviction.
#[derive(Clone, Default)]
pub struct ValidatorCache {
    entries: Arc<DashMap<SchemaKey, CompiledValidator>>,
}

impl ValidatorCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
        }
    }

    /// Return the cached validator for `description`, compiling and storing
    /// it on a miss.
    ///
    /// Compilation failures are returned and never cached. Concurrent misses
    /// on the same key may both compile; the first stored entry wins.
    pub fn get_or_compile(&self, description: &Value) -> Result<CompiledValidator, SchemaError> {
        let key = SchemaKey::of(description);
        if let Some(hit) = self.entries.get(&key) {
            return Ok(hit.value().clone());
        }
        let compiled = CompiledValidator::compile_with_key(description, key)?;
        let stored = self.entries.entry(key).or_insert(compiled);
        Ok(stored.value().clone())
    }

    /// Store a validator under its own key, replacing any previous entry.
    pub fn put(&self, validator: CompiledValidator) -> Option<CompiledValidator> {
        self.entries.insert(validator.key(), validator)
    }

    pub fn get(&self, key: &SchemaKey) -> Option<CompiledValidator> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Remove an entry.
    pub fn del(&self, key: &SchemaKey) -> Option<CompiledValidator> {
        self.entries.remove(key).map(|(_, validator)| validator)
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for ValidatorCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorCache")
            .field("entries", &self.entries.len())
            .finish()
    }
}
