//! Error types for JSON:API deserialization and model definition loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a deserialization call.
#[derive(Debug, Error)]
pub enum DeserializeError {
    #[error("could not find definition for model \"{model}\" which was returned by the JSON API")]
    SchemaNotFound { model: String },

    #[error("invalid JSON:API document: {source}")]
    InvalidDocument {
        #[source]
        source: serde_json::Error,
    },
}

impl DeserializeError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

/// Errors in a model definition file.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("model definitions must be an object, got {actual}")]
    NotAnObject { actual: String },

    #[error("invalid model definition at {path}: expected object, got {actual}")]
    InvalidModel { path: String, actual: String },

    #[error("unknown relationship kind \"{value}\" at {path}: expected hasOne or hasMany")]
    UnknownRelationKind { path: String, value: String },

    #[error("invalid filter at {path}: expected object, got {actual}")]
    InvalidFilterType { path: String, actual: String },

    #[error("invalid definitions schema: {message}")]
    InvalidSchema { message: String },

    #[error("model definitions invalid with {} error(s)", errors.len())]
    Invalid { errors: Vec<DefinitionError> },
}

impl RegistryError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            RegistryError::Invalid { .. } => 1,
            _ => 2,
        }
    }
}

/// Errors while reading documents or definitions from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid JSON:API document {path}: {source}")]
    InvalidDocument {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            LoadError::InvalidJson { .. } | LoadError::InvalidDocument { .. } => 2,
            LoadError::Registry(e) => e.exit_code(),
        }
    }
}

/// Single model definition violation with path context.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DefinitionError {
    /// JSON Pointer (RFC 6901) to the offending definition.
    pub path: String,
    /// Human-readable error message.
    pub message: String,
}

impl std::fmt::Display for DefinitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}
