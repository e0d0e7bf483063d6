//! Loading of documents and model definitions.
//!
//! Model definition files map singular model names to field declarations:
//!
//! ```json
//! {
//!   "article": {
//!     "title": {},
//!     "author": { "jsonApi": "hasOne", "type": "person" },
//!     "comments": { "jsonApi": "hasMany", "filter": { "approved": true } }
//!   }
//! }
//! ```

use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{LoadError, RegistryError};
use crate::schema::{AttributeSpec, ModelRegistry, Schema};
use crate::types::{json_type_name, Document};
use crate::validator::validate_models;

/// Load a JSON file.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist,
/// or `LoadError::InvalidJson` if the file isn't valid JSON.
pub fn load_json(path: &Path) -> Result<Value, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    load_json_str(&content)
}

/// Parse a JSON string.
///
/// # Errors
///
/// Returns `LoadError::InvalidJson` if the string isn't valid JSON.
pub fn load_json_str(content: &str) -> Result<Value, LoadError> {
    serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })
}

/// Load a JSON:API document file.
///
/// # Errors
///
/// Returns the `load_json` errors, or `LoadError::InvalidDocument` if the
/// JSON is not shaped like a JSON:API document.
pub fn load_document(path: &Path) -> Result<Document, LoadError> {
    let value = load_json(path)?;
    Document::deserialize(&value).map_err(|source| LoadError::InvalidDocument {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a model definition file into a registry.
pub fn load_models(path: &Path) -> Result<ModelRegistry, LoadError> {
    let definitions = load_json(path)?;
    Ok(parse_models(&definitions)?)
}

/// Build a registry from a model definition document.
///
/// # Errors
///
/// Returns `RegistryError::Invalid` with every violation if the document
/// does not match the definition format.
pub fn parse_models(definitions: &Value) -> Result<ModelRegistry, RegistryError> {
    validate_models(definitions)?;

    let Some(models) = definitions.as_object() else {
        return Err(RegistryError::NotAnObject {
            actual: json_type_name(definitions).to_string(),
        });
    };

    let mut registry = ModelRegistry::new();
    for (name, fields) in models {
        let path = format!("/{}", escape_pointer(name));
        let Some(fields) = fields.as_object() else {
            return Err(RegistryError::InvalidModel {
                path,
                actual: json_type_name(fields).to_string(),
            });
        };
        registry.define(name.clone(), parse_schema(fields, &path)?);
    }

    Ok(registry)
}

fn parse_schema(fields: &Map<String, Value>, path: &str) -> Result<Schema, RegistryError> {
    let mut schema = Schema::new();
    for (field, declaration) in fields {
        let field_path = format!("{}/{}", path, escape_pointer(field));
        schema = schema.field(field.clone(), parse_attribute_spec(declaration, &field_path)?);
    }
    Ok(schema)
}

/// Parse a single field declaration.
///
/// Objects carrying a `jsonApi` key declare relationships; everything else
/// is a plain attribute.
pub fn parse_attribute_spec(declaration: &Value, path: &str) -> Result<AttributeSpec, RegistryError> {
    let Some(kind) = declaration.get("jsonApi") else {
        return Ok(AttributeSpec::Scalar);
    };

    let filter = match declaration.get("filter") {
        None => None,
        Some(filter @ Value::Object(_)) => Some(filter.clone()),
        Some(other) => {
            return Err(RegistryError::InvalidFilterType {
                path: format!("{}/filter", path),
                actual: json_type_name(other).to_string(),
            })
        }
    };

    match kind.as_str() {
        Some("hasOne") => Ok(AttributeSpec::HasOne { filter }),
        Some("hasMany") => Ok(AttributeSpec::HasMany { filter }),
        _ => Err(RegistryError::UnknownRelationKind {
            path: format!("{}/jsonApi", path),
            value: kind.as_str().map_or_else(|| kind.to_string(), String::from),
        }),
    }
}

/// Escape a key for use in a JSON Pointer (~ → ~0, / → ~1).
fn escape_pointer(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}
