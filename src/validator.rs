//! Structural validation of model definition files.

use std::sync::OnceLock;

use serde_json::{json, Value};

use crate::error::{DefinitionError, RegistryError};

/// JSON Schema every model definition file must satisfy.
fn definitions_schema() -> &'static Value {
    static SCHEMA: OnceLock<Value> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        json!({
            "type": "object",
            "additionalProperties": {
                "type": "object",
                "additionalProperties": {
                    "if": {
                        "type": "object",
                        "required": ["jsonApi"]
                    },
                    "then": {
                        "properties": {
                            "jsonApi": { "enum": ["hasOne", "hasMany"] },
                            "type": { "type": "string" },
                            "filter": { "type": "object" }
                        }
                    }
                }
            }
        })
    })
}

/// Validate a model definition document, collecting every violation.
///
/// # Errors
///
/// Returns `RegistryError::Invalid` listing each offending path, or
/// `RegistryError::InvalidSchema` if the embedded schema fails to compile.
pub fn validate_models(definitions: &Value) -> Result<(), RegistryError> {
    let validator = jsonschema::validator_for(definitions_schema()).map_err(|e| {
        RegistryError::InvalidSchema {
            message: e.to_string(),
        }
    })?;

    let errors: Vec<DefinitionError> = validator
        .iter_errors(definitions)
        .map(|e| DefinitionError {
            path: e.instance_path.to_string(),
            message: e.to_string(),
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(RegistryError::Invalid { errors })
    }
}
