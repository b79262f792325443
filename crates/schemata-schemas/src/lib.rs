//! # schemata-schemas
//!
//! Built-in schema builders. Every builder returns a fresh schema
//! description; passing extension data deep-merges it into a copy of the
//! base without touching the base itself.
//!
//! ```rust
//! use schemata_schemas::comment;
//! use serde_json::json;
//!
//! let base = comment(None);
//! let short = comment(Some(&json!({"maxLength": 140})));
//!
//! assert_eq!(base["maxLength"], 5000);
//! assert_eq!(short["maxLength"], 140);
//! assert_eq!(short["title"], "Comment");
//! ```

use schemata_validate::merge::extend;
use schemata_validate::MemoryRegistry;
use serde_json::Value;

/// Define a builder over a lazily initialized base schema.
macro_rules! builder {
    ($(#[$meta:meta])* $name:ident => $base:expr) => {
        $(#[$meta])*
        pub fn $name(ext: Option<&serde_json::Value>) -> serde_json::Value {
            static BASE: std::sync::OnceLock<serde_json::Value> = std::sync::OnceLock::new();
            crate::build(BASE.get_or_init(|| $base), ext)
        }
    };
}

mod credentials;
mod jsonld;
mod keys;
mod patch;
mod signatures;
mod text;

pub use credentials::{
    credential, presentation, verifiable_credential, verifiable_presentation, CREDENTIALS_CONTEXT,
};
pub use jsonld::{
    id_or_object_with_id, identifier, jsonld_context, jsonld_type, linked_data_signature, proof,
};
pub use keys::{private_key_pem, public_key_pem};
pub use patch::{json_patch, sequenced_patch};
pub use signatures::{
    equihash_signature, graph_signature, linked_data_signature_2018, linked_data_signature_2020,
};
pub use text::{
    comment, description, email, label, nonce, person_name, slug, title, url, w3c_date_time,
    EmailOptions,
};

/// Copy `base`, deep-merging `ext` into the copy when given.
pub(crate) fn build(base: &Value, ext: Option<&Value>) -> Value {
    match ext {
        Some(ext) => extend(true, base.clone(), ext),
        None => base.clone(),
    }
}

/// Names under which [`register_all`] registers the built-in schemas.
pub const BUILTIN_NAMES: &[&str] = &[
    "comment",
    "credential",
    "description",
    "email",
    "equihashSignature",
    "graphSignature",
    "idOrObjectWithId",
    "identifier",
    "jsonPatch",
    "jsonldContext",
    "label",
    "linkedDataSignature",
    "linkedDataSignature2018",
    "linkedDataSignature2020",
    "nonce",
    "personName",
    "presentation",
    "privateKeyPem",
    "proof",
    "publicKeyPem",
    "sequencedPatch",
    "slug",
    "title",
    "url",
    "verifiableCredential",
    "verifiablePresentation",
    "w3cDateTime",
];

/// The built-in schema registered under `name`, if any.
pub fn builtin(name: &str) -> Option<Value> {
    Some(match name {
        "comment" => comment(None),
        "credential" => credential(None),
        "description" => description(None),
        "email" => email(None, EmailOptions::default()),
        "equihashSignature" => equihash_signature(None),
        "graphSignature" => graph_signature(None),
        "idOrObjectWithId" => id_or_object_with_id(None),
        "identifier" => identifier(None),
        "jsonPatch" => json_patch(None),
        "jsonldContext" => jsonld_context(None, None),
        "label" => label(None),
        "linkedDataSignature" => linked_data_signature(None),
        "linkedDataSignature2018" => linked_data_signature_2018(None),
        "linkedDataSignature2020" => linked_data_signature_2020(None),
        "nonce" => nonce(None),
        "personName" => person_name(None),
        "presentation" => presentation(None),
        "privateKeyPem" => private_key_pem(None),
        "proof" => proof(None),
        "publicKeyPem" => public_key_pem(None),
        "sequencedPatch" => sequenced_patch(None),
        "slug" => slug(None),
        "title" => title(None),
        "url" => url(None),
        "verifiableCredential" => verifiable_credential(None),
        "verifiablePresentation" => verifiable_presentation(None),
        "w3cDateTime" => w3c_date_time(None),
        _ => return None,
    })
}

/// Register every built-in schema, returning how many were registered.
pub fn register_all(registry: &mut MemoryRegistry) -> usize {
    let mut count = 0;
    for name in BUILTIN_NAMES {
        if let Some(schema) = builtin(name) {
            registry.insert(*name, schema);
            count += 1;
        }
    }
    count
}

/// A registry holding only the built-in schemas.
pub fn registry() -> MemoryRegistry {
    let mut registry = MemoryRegistry::new();
    register_all(&mut registry);
    registry
}
