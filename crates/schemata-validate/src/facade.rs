//! Validation facade: registry + cache + evaluator + renderer.

use crate::cache::{SchemaKey, ValidatorCache};
use crate::error::{ValidateError, ValidationFailure};
use crate::registry::{MemoryRegistry, SchemaRegistry};
use crate::request::{RequestSchemas, RequestValidator};
use crate::validator::{CompiledValidator, ValidationResult};
use dashmap::DashMap;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// The schema to validate against.
#[derive(Debug, Clone, Copy)]
pub enum SchemaRef<'a> {
    /// A registry name.
    Name(&'a str),
    /// A raw schema description.
    Description(&'a Value),
    /// An already compiled validator; skips the cache.
    Compiled(&'a CompiledValidator),
}

impl<'a> From<&'a str> for SchemaRef<'a> {
    fn from(name: &'a str) -> Self {
        SchemaRef::Name(name)
    }
}

impl<'a> From<&'a String> for SchemaRef<'a> {
    fn from(name: &'a String) -> Self {
        SchemaRef::Name(name)
    }
}

impl<'a> From<&'a Value> for SchemaRef<'a> {
    fn from(description: &'a Value) -> Self {
        SchemaRef::Description(description)
    }
}

impl<'a> From<&'a CompiledValidator> for SchemaRef<'a> {
    fn from(validator: &'a CompiledValidator) -> Self {
        SchemaRef::Compiled(validator)
    }
}

/// Entry point for validating instances.
///
/// Cloning is cheap; clones share the registry and the caches.
#[derive(Clone)]
pub struct Validation {
    registry: Arc<dyn SchemaRegistry>,
    cache: ValidatorCache,
    /// Content key of each name resolved so far; the validators live in `cache`.
    by_name: Arc<DashMap<String, SchemaKey>>,
}

impl Validation {
    /// Create a facade over `registry` with a fresh cache.
    pub fn new(registry: impl SchemaRegistry + 'static) -> Self {
        Self::builder().registry(registry).build()
    }

    pub fn builder() -> ValidationBuilder {
        ValidationBuilder::default()
    }

    /// Validate `instance` against the schema registered as `name`.
    ///
    /// Returns `Err` only for configuration problems: an unknown name or a
    /// malformed schema. Invalid instances are reported in the `Ok` value.
    pub fn validate_by_name(
        &self,
        name: &str,
        instance: &Value,
    ) -> Result<ValidationResult, ValidateError> {
        Ok(self.compiled_by_name(name)?.validate(instance))
    }

    /// Validate `instance` against a name, a raw description or a compiled
    /// validator.
    pub fn validate_instance<'a>(
        &self,
        instance: &Value,
        schema: impl Into<SchemaRef<'a>>,
    ) -> Result<ValidationResult, ValidateError> {
        match schema.into() {
            SchemaRef::Compiled(validator) => Ok(validator.validate(instance)),
            other => Ok(self.resolve(other)?.validate(instance)),
        }
    }

    /// Like [`Validation::validate_by_name`], flattening both failure kinds
    /// into `Err`.
    pub fn check_by_name(&self, name: &str, instance: &Value) -> Result<(), ValidationFailure> {
        self.validate_by_name(name, instance)?
            .into_result()
            .map_err(ValidationFailure::from)
    }

    /// Like [`Validation::validate_instance`], flattening both failure kinds
    /// into `Err`.
    pub fn check_instance<'a>(
        &self,
        instance: &Value,
        schema: impl Into<SchemaRef<'a>>,
    ) -> Result<(), ValidationFailure> {
        self.validate_instance(instance, schema)?
            .into_result()
            .map_err(ValidationFailure::from)
    }

    /// Precompile the configured request schemas.
    ///
    /// Unknown names and malformed schemas fail here rather than per request.
    pub fn create_validator(
        &self,
        schemas: RequestSchemas<'_>,
    ) -> Result<RequestValidator, ValidateError> {
        let query = schemas.query.map(|s| self.resolve(s)).transpose()?;
        let body = schemas.body.map(|s| self.resolve(s)).transpose()?;
        Ok(RequestValidator::new(query, body))
    }

    /// Resolve a schema reference to a compiled validator.
    pub fn resolve<'a>(
        &self,
        schema: impl Into<SchemaRef<'a>>,
    ) -> Result<CompiledValidator, ValidateError> {
        match schema.into() {
            SchemaRef::Name(name) => self.compiled_by_name(name),
            SchemaRef::Description(description) => Ok(self.cache.get_or_compile(description)?),
            SchemaRef::Compiled(validator) => Ok(validator.clone()),
        }
    }

    /// Compile every registered schema, returning how many were compiled.
    ///
    /// Stops at the first malformed schema.
    pub fn warm(&self) -> Result<usize, ValidateError> {
        let names = self.registry.names();
        for name in &names {
            self.compiled_by_name(name)?;
        }
        Ok(names.len())
    }

    /// The registered description for `name`.
    pub fn schema(&self, name: &str) -> Option<&Value> {
        self.registry.resolve(name)
    }

    pub fn registry(&self) -> &Arc<dyn SchemaRegistry> {
        &self.registry
    }

    /// The content-addressed cache. Named lookups go through it too, so
    /// [`ValidatorCache::del`] and [`ValidatorCache::clear`] force them to
    /// recompile.
    pub fn cache(&self) -> &ValidatorCache {
        &self.cache
    }

    fn compiled_by_name(&self, name: &str) -> Result<CompiledValidator, ValidateError> {
        let known = self.by_name.get(name).map(|key| *key.value());
        if let Some(hit) = known.and_then(|key| self.cache.get(&key)) {
            return Ok(hit);
        }
        let description = self
            .registry
            .resolve(name)
            .ok_or_else(|| ValidateError::unknown_schema(name))?;
        let compiled = self.cache.get_or_compile(description)?;
        self.by_name.insert(name.to_string(), compiled.key());
        Ok(compiled)
    }
}

impl fmt::Debug for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validation")
            .field("schemas", &self.registry.names().len())
            .field("cache", &self.cache)
            .finish()
    }
}

/// Builder for [`Validation`].
#[derive(Default)]
pub struct ValidationBuilder {
    registry: Option<Arc<dyn SchemaRegistry>>,
    cache: Option<ValidatorCache>,
}

impl ValidationBuilder {
    /// Use `registry` for name resolution.
    pub fn registry(mut self, registry: impl SchemaRegistry + 'static) -> Self {
        self.registry = Some(Arc::new(registry));
        self
    }

    /// Use an already shared registry.
    pub fn shared_registry(mut self, registry: Arc<dyn SchemaRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Share a cache with other facades.
    pub fn cache(mut self, cache: ValidatorCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn build(self) -> Validation {
        Validation {
            registry: self
                .registry
                .unwrap_or_else(|| Arc::new(MemoryRegistry::new())),
            cache: self.cache.unwrap_or_default(),
            by_name: Arc::new(DashMap::new()),
        }
    }
}
