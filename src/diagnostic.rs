//! Non-fatal schema mismatch diagnostics.

use serde::Serialize;

/// Kind of mismatch between a resource and its model schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaMismatch {
    /// Attribute not declared on the model.
    UnknownAttribute,
    /// Relationship not declared on the model.
    UnknownRelationship,
    /// Relationship declared on the model as a plain attribute.
    RelationshipDeclaredAsAttribute,
}

impl SchemaMismatch {
    /// Stable diagnostic code.
    pub fn code(&self) -> &'static str {
        match self {
            SchemaMismatch::UnknownAttribute => "W001",
            SchemaMismatch::UnknownRelationship => "W002",
            SchemaMismatch::RelationshipDeclaredAsAttribute => "W003",
        }
    }
}

/// A field skipped during deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub mismatch: SchemaMismatch,
    /// Resource type as it appeared in the document.
    pub model: String,
    pub id: String,
    pub field: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(mismatch: SchemaMismatch, model: &str, id: &str, field: &str) -> Self {
        let message = match mismatch {
            SchemaMismatch::UnknownAttribute => format!(
                "resource contains attribute \"{}\", but it is not present on model config and therefore not deserialized",
                field
            ),
            SchemaMismatch::UnknownRelationship => format!(
                "resource contains relationship \"{}\", but it is not present on model config and therefore not deserialized",
                field
            ),
            SchemaMismatch::RelationshipDeclaredAsAttribute => format!(
                "resource contains relationship \"{}\", but it is present on model config as a plain attribute",
                field
            ),
        };
        Self {
            mismatch,
            model: model.to_string(),
            id: id.to_string(),
            field: field.to_string(),
            message,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {}/{}: {}",
            self.mismatch.code(),
            self.model,
            self.id,
            self.message
        )
    }
}
