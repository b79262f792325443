//! # schemata validation engine
//!
//! Compiles declarative schema descriptions into reusable validators,
//! evaluates instances against them and renders the violations into a
//! public-safe error report.
//!
//! ## Example
//!
//! ```rust
//! use schemata_validate::prelude::*;
//! use serde_json::json;
//!
//! let registry = MemoryRegistry::new().with(
//!     "nonce",
//!     json!({
//!         "title": "Nonce",
//!         "type": "string",
//!         "minLength": 8,
//!         "maxLength": 64
//!     }),
//! );
//! let validation = Validation::new(registry);
//!
//! let result = validation.validate_by_name("nonce", &json!("12345678")).unwrap();
//! assert!(result.valid);
//!
//! let result = validation.validate_by_name("nonce", &json!("1234567")).unwrap();
//! assert!(!result.valid);
//! ```
//!
//! ## Schema dialect
//!
//! - `type` - a kind name (`string`, `number`, `integer`, `boolean`, `object`,
//!   `array`, `null`, `any`) or a list of kind names / sub-schemas
//! - `anyOf`, `oneOf`, `allOf`, `not`, `disallow` - combinators
//! - `properties`, `required` (array or per-property boolean),
//!   `additionalProperties`
//! - `items` (schema or tuple), `prefixItems`, `additionalItems`,
//!   `minItems`, `maxItems`, `uniqueItems`
//! - `minLength`, `maxLength`, `pattern`, `minimum`, `maximum`, `enum`, `const`
//! - `errors` - custom `invalid` / `missing` messages and a `mask`
//!
//! ## Error Format
//!
//! A failed validation renders to:
//!
//! ```json
//! {
//!   "type": "ValidationError",
//!   "message": "A validation error occurred in the 'Nonce' validator.",
//!   "details": {
//!     "public": true,
//!     "httpStatusCode": 400,
//!     "errors": [
//!       {
//!         "type": "ValidationError",
//!         "message": "Length must be at least 8 characters",
//!         "details": {"path": "", "public": true, "value": "1234567", "...": "..."}
//!       }
//!     ]
//!   }
//! }
//! ```

mod cache;
mod error;
mod evaluate;
mod facade;
#[cfg(feature = "tower")]
mod layer;
pub mod merge;
mod registry;
mod render;
mod request;
mod schema;
mod validator;
mod value;
mod violation;

pub use cache::{SchemaKey, ValidatorCache};
pub use error::{ErrorKind, SchemaError, ValidateError, ValidationFailure};
pub use evaluate::evaluate;
pub use facade::{SchemaRef, Validation, ValidationBuilder};
#[cfg(feature = "tower")]
pub use layer::{ValidationLayer, ValidationService, ValidationServiceError};
pub use registry::{MemoryRegistry, SchemaRegistry};
pub use render::{
    render, MessagePair, RenderedError, RenderedViolation, SchemaSummary, DEFAULT_INVALID,
    DEFAULT_MISSING, MASKED,
};
pub use request::{RequestFields, RequestParts, RequestSchemas, RequestValidator};
pub use schema::{Additional, ErrorMessages, InstanceKind, Items, Mask, Schema, TypeRule};
pub use validator::{CompiledValidator, ValidationResult};
pub use violation::{Violation, ViolationKind};

/// Prelude module for schema validation
pub mod prelude {
    pub use crate::error::{ErrorKind, SchemaError, ValidateError, ValidationFailure};
    pub use crate::facade::{SchemaRef, Validation};
    pub use crate::merge::extend;
    pub use crate::registry::{MemoryRegistry, SchemaRegistry};
    pub use crate::render::RenderedError;
    pub use crate::request::{RequestFields, RequestParts, RequestSchemas, RequestValidator};
    pub use crate::validator::{CompiledValidator, ValidationResult};
}
