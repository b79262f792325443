//! Request validation.
//!
//! A [`RequestValidator`] holds precompiled body and query validators and
//! checks anything implementing [`RequestFields`].

use crate::facade::SchemaRef;
use crate::render::RenderedError;
use crate::validator::CompiledValidator;
use serde_json::{Map, Value};
use std::borrow::Cow;

/// Access to the parts of a request that can be validated.
pub trait RequestFields {
    /// The parsed request body, if any.
    fn body(&self) -> Option<Cow<'_, Value>>;

    /// The parsed query parameters, if any.
    fn query(&self) -> Option<Cow<'_, Value>>;
}

/// A plain request representation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestParts {
    pub body: Option<Value>,
    pub query: Option<Value>,
}

impl RequestParts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, query: Value) -> Self {
        self.query = Some(query);
        self
    }

    /// Parse a raw `a=1&b=2` query string into the query parameters.
    pub fn with_query_string(self, raw: &str) -> Self {
        self.with_query(parse_query(raw))
    }
}

impl RequestFields for RequestParts {
    fn body(&self) -> Option<Cow<'_, Value>> {
        self.body.as_ref().map(Cow::Borrowed)
    }

    fn query(&self) -> Option<Cow<'_, Value>> {
        self.query.as_ref().map(Cow::Borrowed)
    }
}

impl RequestFields for http::Request<Value> {
    fn body(&self) -> Option<Cow<'_, Value>> {
        Some(Cow::Borrowed(http::Request::body(self)))
    }

    fn query(&self) -> Option<Cow<'_, Value>> {
        self.uri().query().map(|raw| Cow::Owned(parse_query(raw)))
    }
}

/// Decode a query string into an object of string values.
///
/// Repeated keys collect into an array. A string that cannot be decoded is
/// returned as-is so the schema can reject it.
pub(crate) fn parse_query(raw: &str) -> Value {
    let pairs: Vec<(String, String)> = match serde_urlencoded::from_str(raw) {
        Ok(pairs) => pairs,
        Err(_) => return Value::String(raw.to_string()),
    };
    let mut map = Map::new();
    for (key, value) in pairs {
        match map.get_mut(&key) {
            None => {
                map.insert(key, Value::String(value));
            }
            Some(Value::Array(values)) => values.push(Value::String(value)),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, Value::String(value)]);
            }
        }
    }
    Value::Object(map)
}

/// Schemas to check request parts against.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSchemas<'a> {
    pub body: Option<SchemaRef<'a>>,
    pub query: Option<SchemaRef<'a>>,
}

impl<'a> RequestSchemas<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(mut self, schema: impl Into<SchemaRef<'a>>) -> Self {
        self.body = Some(schema.into());
        self
    }

    pub fn query(mut self, schema: impl Into<SchemaRef<'a>>) -> Self {
        self.query = Some(schema.into());
        self
    }
}

/// Precompiled request checks, built by
/// [`Validation::create_validator`](crate::Validation::create_validator).
#[derive(Debug, Clone, Default)]
pub struct RequestValidator {
    query: Option<CompiledValidator>,
    body: Option<CompiledValidator>,
}

impl RequestValidator {
    pub(crate) fn new(query: Option<CompiledValidator>, body: Option<CompiledValidator>) -> Self {
        Self { query, body }
    }

    /// Check the query, then the body, stopping at the first failure.
    ///
    /// A missing query is checked as an empty object; a missing body as
    /// `null`.
    pub fn validate<R>(&self, request: &R) -> Result<(), RenderedError>
    where
        R: RequestFields + ?Sized,
    {
        if let Some(validator) = &self.query {
            let query = request
                .query()
                .unwrap_or_else(|| Cow::Owned(Value::Object(Map::new())));
            validator.validate(&query).into_result()?;
        }
        if let Some(validator) = &self.body {
            let body = request.body().unwrap_or(Cow::Owned(Value::Null));
            validator.validate(&body).into_result()?;
        }
        Ok(())
    }

    pub fn has_query(&self) -> bool {
        self.query.is_some()
    }

    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    /// Wrap this validator into a tower layer.
    #[cfg(feature = "tower")]
    pub fn layer(self) -> crate::layer::ValidationLayer {
        crate::layer::ValidationLayer::new(self)
    }
}
