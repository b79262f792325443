//! Name-to-schema registries.

use serde_json::Value;
use std::collections::HashMap;

/// Resolves schema names to schema descriptions.
///
/// The facade only ever reads from a registry; population happens before
/// it is handed over.
pub trait SchemaRegistry: Send + Sync {
    /// Look up a schema description by name.
    fn resolve(&self, name: &str) -> Option<&Value>;

    /// All registered names, sorted.
    fn names(&self) -> Vec<&str>;

    fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }
}

/// In-memory registry backed by a `HashMap`.
#[derive(Debug, Clone, Default)]
pub struct MemoryRegistry {
    schemas: HashMap<String, Value>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema, returning the description it replaced.
    pub fn insert(&mut self, name: impl Into<String>, description: Value) -> Option<Value> {
        self.schemas.insert(name.into(), description)
    }

    /// Builder-style [`MemoryRegistry::insert`].
    pub fn with(mut self, name: impl Into<String>, description: Value) -> Self {
        self.insert(name, description);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.schemas.remove(name)
    }

    /// Move every schema of `other` into this registry; `other` wins on
    /// collisions.
    pub fn extend_from(&mut self, other: MemoryRegistry) {
        self.schemas.extend(other.schemas);
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

impl SchemaRegistry for MemoryRegistry {
    fn resolve(&self, name: &str) -> Option<&Value> {
        self.schemas.get(name)
    }

    fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for MemoryRegistry {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            schemas: iter
                .into_iter()
                .map(|(name, description)| (name.into(), description))
                .collect(),
        }
    }
}

impl<K: Into<String>> Extend<(K, Value)> for MemoryRegistry {
    fn extend<I: IntoIterator<Item = (K, Value)>>(&mut self, iter: I) {
        for (name, description) in iter {
            self.insert(name, description);
        }
    }
}
