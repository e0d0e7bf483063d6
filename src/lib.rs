//! JSON:API Deserializer
//!
//! Converts JSON:API documents into graphs of plain models, resolving
//! relationships against sideloaded `included` resources.
//!
//! Models live in a [`ModelGraph`] arena and reference each other through
//! [`ModelId`] handles, so circular relationships between resources are
//! represented exactly: a cycle that closes back on a resource resolves to
//! the same handle instead of recursing forever.
//!
//! # Example
//!
//! ```
//! use jsonapi_deserialize::{deserialize_document, ModelRegistry, Schema};
//! use serde_json::json;
//!
//! let registry = ModelRegistry::new()
//!     .with_model("article", Schema::new().attribute("title").has_one("author"))
//!     .with_model("person", Schema::new().attribute("name"));
//!
//! let document = json!({
//!     "data": {
//!         "type": "articles",
//!         "id": "1",
//!         "attributes": { "title": "A" },
//!         "relationships": { "author": { "data": { "type": "people", "id": "9" } } }
//!     },
//!     "included": [
//!         { "type": "people", "id": "9", "attributes": { "name": "Bob" } }
//!     ]
//! });
//!
//! let out = deserialize_document(&registry, &document).unwrap();
//! assert_eq!(
//!     out.to_json(),
//!     json!({
//!         "id": "1",
//!         "type": "articles",
//!         "title": "A",
//!         "author": { "id": "9", "type": "people", "name": "Bob" }
//!     })
//! );
//! ```
//!
//! # Schema Mismatches
//!
//! | Situation | Code | Effect |
//! |-----------|------|--------|
//! | Attribute not declared | `W001` | Field skipped, warning |
//! | Relationship not declared | `W002` | Field skipped, warning |
//! | Relationship declared as plain attribute | `W003` | Field skipped, warning |
//! | Resource type without schema | - | `DeserializeError::SchemaNotFound` |
//!
//! Warnings are emitted through `tracing` and collected as [`Diagnostic`]s.

mod cache;
mod deserializer;
mod diagnostic;
mod error;
mod filter;
mod inflect;
mod loader;
mod model;
mod relations;
mod schema;
mod types;
mod validator;

pub use cache::DeserializeCache;
pub use deserializer::{
    deserialize_document, deserialize_document_with, Deserialized, Deserializer, Primary,
};
pub use diagnostic::{Diagnostic, SchemaMismatch};
pub use error::{DefinitionError, DeserializeError, LoadError, RegistryError};
pub use filter::{matches, matches_attributes};
pub use inflect::{EnglishInflector, Inflector};
pub use loader::{
    load_document, load_json, load_json_str, load_models, parse_attribute_spec, parse_models,
};
pub use model::{Model, ModelGraph, ModelId, Relation};
pub use schema::{AttributeSpec, CustomDeserializer, ModelRegistry, Schema, SchemaRegistry};
pub use types::{
    json_type_name, DeserializeOptions, Document, Linkage, PrimaryData, Relationship,
    ResourceIdentifier, ResourceObject,
};
pub use validator::validate_models;
