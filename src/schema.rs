//! Model schemas and the registry the deserializer consults.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::model::Model;
use crate::types::ResourceObject;

/// Replaces generic processing for one model type.
pub type CustomDeserializer = Arc<dyn Fn(&ResourceObject) -> Model + Send + Sync>;

/// Declaration of a single model field.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AttributeSpec {
    /// Plain attribute, copied through unchanged.
    #[default]
    Scalar,
    /// Single-valued relationship.
    HasOne { filter: Option<Value> },
    /// Collection-valued relationship.
    HasMany { filter: Option<Value> },
}

impl AttributeSpec {
    pub fn is_relationship(&self) -> bool {
        !matches!(self, AttributeSpec::Scalar)
    }

    /// Partial attribute pattern related items must match.
    pub fn filter(&self) -> Option<&Value> {
        match self {
            AttributeSpec::Scalar => None,
            AttributeSpec::HasOne { filter } | AttributeSpec::HasMany { filter } => {
                filter.as_ref()
            }
        }
    }
}

/// Schema of one model type.
#[derive(Clone, Default)]
pub struct Schema {
    attributes: BTreeMap<String, AttributeSpec>,
    deserializer: Option<CustomDeserializer>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attribute(self, name: impl Into<String>) -> Self {
        self.field(name, AttributeSpec::Scalar)
    }

    pub fn has_one(self, name: impl Into<String>) -> Self {
        self.field(name, AttributeSpec::HasOne { filter: None })
    }

    pub fn has_many(self, name: impl Into<String>) -> Self {
        self.field(name, AttributeSpec::HasMany { filter: None })
    }

    pub fn has_one_filtered(self, name: impl Into<String>, filter: Value) -> Self {
        self.field(
            name,
            AttributeSpec::HasOne {
                filter: Some(filter),
            },
        )
    }

    pub fn has_many_filtered(self, name: impl Into<String>, filter: Value) -> Self {
        self.field(
            name,
            AttributeSpec::HasMany {
                filter: Some(filter),
            },
        )
    }

    pub fn field(mut self, name: impl Into<String>, spec: AttributeSpec) -> Self {
        self.attributes.insert(name.into(), spec);
        self
    }

    pub fn with_deserializer<F>(mut self, deserializer: F) -> Self
    where
        F: Fn(&ResourceObject) -> Model + Send + Sync + 'static,
    {
        self.deserializer = Some(Arc::new(deserializer));
        self
    }

    pub fn attribute_spec(&self, name: &str) -> Option<&AttributeSpec> {
        self.attributes.get(name)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &AttributeSpec)> {
        self.attributes
            .iter()
            .map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn deserializer(&self) -> Option<&CustomDeserializer> {
        self.deserializer.as_ref()
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("attributes", &self.attributes)
            .field("deserializer", &self.deserializer.is_some())
            .finish()
    }
}

/// Lookup of schemas by singular model name.
pub trait SchemaRegistry {
    fn lookup(&self, model: &str) -> Option<&Schema>;
}

impl SchemaRegistry for HashMap<String, Schema> {
    fn lookup(&self, model: &str) -> Option<&Schema> {
        self.get(model)
    }
}

/// In-memory schema registry.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: BTreeMap<String, Schema>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema, replacing any earlier one with the same name.
    pub fn define(&mut self, model: impl Into<String>, schema: Schema) -> &mut Self {
        self.models.insert(model.into(), schema);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>, schema: Schema) -> Self {
        self.define(model, schema);
        self
    }

    pub fn models(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl SchemaRegistry for ModelRegistry {
    fn lookup(&self, model: &str) -> Option<&Schema> {
        self.models.get(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn schema_builder_declares_fields() {
        let schema = Schema::new()
            .attribute("title")
            .has_one("author")
            .has_many_filtered("comments", json!({ "approved": true }));

        assert_eq!(schema.attribute_spec("title"), Some(&AttributeSpec::Scalar));
        assert!(schema.attribute_spec("author").unwrap().is_relationship());
        assert_eq!(
            schema.attribute_spec("comments").unwrap().filter(),
            Some(&json!({ "approved": true }))
        );
        assert!(schema.attribute_spec("body").is_none());
        assert!(schema.deserializer().is_none());
    }

    #[test]
    fn registry_lookup() {
        let registry = ModelRegistry::new()
            .with_model("article", Schema::new().attribute("title"))
            .with_model("person", Schema::new());

        assert!(registry.lookup("article").is_some());
        assert!(registry.lookup("articles").is_none());
        assert_eq!(registry.models().collect::<Vec<_>>(), ["article", "person"]);
    }

    #[test]
    fn debug_hides_deserializer_body() {
        let schema = Schema::new().with_deserializer(|item| Model::new(&item.kind, &item.id));
        let debug = format!("{:?}", schema);
        assert!(debug.contains("deserializer: true"));
    }
}
