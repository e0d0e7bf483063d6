//! Resource and collection deserialization.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::DeserializeCache;
use crate::diagnostic::{Diagnostic, SchemaMismatch};
use crate::error::DeserializeError;
use crate::inflect::{EnglishInflector, Inflector};
use crate::model::{Model, ModelGraph, ModelId, Relation};
use crate::schema::{AttributeSpec, SchemaRegistry};
use crate::types::{DeserializeOptions, Document, PrimaryData, ResourceObject};

/// Primary data of a deserialized document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Primary {
    None,
    One(ModelId),
    Many(Vec<ModelId>),
}

/// Deserializes JSON:API resources into a [`ModelGraph`].
///
/// Each instance owns its own cache, so independent deserializations
/// must use independent instances.
pub struct Deserializer<'a> {
    registry: &'a dyn SchemaRegistry,
    inflector: &'a dyn Inflector,
    pub(crate) cache: DeserializeCache,
    pub(crate) graph: ModelGraph,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Deserializer<'a> {
    pub fn new(registry: &'a dyn SchemaRegistry) -> Self {
        Self {
            registry,
            inflector: &EnglishInflector,
            cache: DeserializeCache::new(),
            graph: ModelGraph::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Use a custom pluralization helper for type-to-model lookup.
    pub fn with_inflector(mut self, inflector: &'a dyn Inflector) -> Self {
        self.inflector = inflector;
        self
    }

    /// Deserialize one resource object.
    ///
    /// Relationships are resolved against `included`. With
    /// `options.clear_cache` set the cache is emptied before returning,
    /// also when the call fails.
    ///
    /// # Errors
    ///
    /// Returns `DeserializeError::SchemaNotFound` if this resource, or any
    /// resource reached through its relationships, has no registered schema.
    pub fn resource(
        &mut self,
        item: &ResourceObject,
        included: &[ResourceObject],
        options: DeserializeOptions,
    ) -> Result<ModelId, DeserializeError> {
        let result = self.resource_inner(item, included, options.use_cache);
        if options.clear_cache {
            self.cache.clear();
        }
        result
    }

    /// Deserialize resource objects in order, forwarding `options` to each.
    pub fn collection(
        &mut self,
        items: &[ResourceObject],
        included: &[ResourceObject],
        options: DeserializeOptions,
    ) -> Result<Vec<ModelId>, DeserializeError> {
        self.collect_resources(items, included, options)
    }

    pub(crate) fn collect_resources<'r>(
        &mut self,
        items: impl IntoIterator<Item = &'r ResourceObject>,
        included: &[ResourceObject],
        options: DeserializeOptions,
    ) -> Result<Vec<ModelId>, DeserializeError> {
        items
            .into_iter()
            .map(|item| self.resource(item, included, options))
            .collect()
    }

    /// Deserialize the primary data of a document.
    ///
    /// `options` are forwarded to [`resource`](Self::resource) or
    /// [`collection`](Self::collection) depending on the shape of `data`.
    pub fn document(
        &mut self,
        document: &Document,
        options: DeserializeOptions,
    ) -> Result<Primary, DeserializeError> {
        match &document.data {
            None => Ok(Primary::None),
            Some(PrimaryData::One(item)) => self
                .resource(item, &document.included, options)
                .map(Primary::One),
            Some(PrimaryData::Many(items)) => self
                .collection(items, &document.included, options)
                .map(Primary::Many),
        }
    }

    pub fn graph(&self) -> &ModelGraph {
        &self.graph
    }

    pub fn cache(&self) -> &DeserializeCache {
        &self.cache
    }

    /// Mismatches recorded so far, in the order they were found.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_parts(self) -> (ModelGraph, Vec<Diagnostic>) {
        (self.graph, self.diagnostics)
    }

    fn resource_inner(
        &mut self,
        item: &ResourceObject,
        included: &[ResourceObject],
        use_cache: bool,
    ) -> Result<ModelId, DeserializeError> {
        if use_cache {
            if let Some(cached) = self.cache.get(&item.kind, &item.id) {
                debug!(model = %item.kind, id = %item.id, "cache hit");
                return Ok(cached);
            }
        }

        let registry = self.registry;
        let model_name = self.inflector.singular(&item.kind);
        let schema = registry
            .lookup(&model_name)
            .ok_or(DeserializeError::SchemaNotFound { model: model_name })?;

        if let Some(custom) = schema.deserializer() {
            return Ok(self.graph.insert(custom(item)));
        }

        let mut model = Model::new(&item.kind, &item.id);
        for (name, value) in &item.attributes {
            if schema.attribute_spec(name).is_none() && name != "id" {
                self.mismatch(SchemaMismatch::UnknownAttribute, item, name);
            } else {
                model.attributes.insert(name.clone(), value.clone());
            }
        }

        // Cached before relationships so cycles resolve to this model.
        let model_id = self.graph.insert(model);
        self.cache.set(&item.kind, &item.id, model_id);

        if let Some(relationships) = &item.relationships {
            for key in relationships.keys() {
                let relation = match schema.attribute_spec(key) {
                    None => {
                        self.mismatch(SchemaMismatch::UnknownRelationship, item, key);
                        continue;
                    }
                    Some(AttributeSpec::Scalar) => {
                        self.mismatch(SchemaMismatch::RelationshipDeclaredAsAttribute, item, key);
                        continue;
                    }
                    Some(AttributeSpec::HasOne { filter }) => self
                        .has_one(filter.as_ref(), item, included, key)
                        .map(Relation::One)?,
                    Some(AttributeSpec::HasMany { filter }) => self
                        .has_many(filter.as_ref(), item, included, key)
                        .map(Relation::Many)?,
                };
                if let Some(model) = self.graph.get_mut(model_id) {
                    model.set_relation(key.clone(), relation);
                }
            }
        }

        if let Some(model) = self.graph.get_mut(model_id) {
            model.meta = present(&item.meta);
            model.links = present(&item.links);
        }

        Ok(model_id)
    }

    fn mismatch(&mut self, mismatch: SchemaMismatch, item: &ResourceObject, field: &str) {
        let diagnostic = Diagnostic::new(mismatch, &item.kind, &item.id, field);
        warn!(
            code = mismatch.code(),
            model = %item.kind,
            id = %item.id,
            "{}",
            diagnostic.message
        );
        self.diagnostics.push(diagnostic);
    }
}

fn present(value: &Option<Value>) -> Option<Value> {
    value.as_ref().filter(|v| !v.is_null()).cloned()
}

/// Result of deserializing a whole document.
#[derive(Debug, Clone)]
pub struct Deserialized {
    pub graph: ModelGraph,
    pub data: Primary,
    pub meta: Option<Value>,
    pub links: Option<Value>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Deserialized {
    /// Deserialize an already parsed document with a fresh [`Deserializer`].
    pub fn from_document(
        registry: &dyn SchemaRegistry,
        document: Document,
        options: DeserializeOptions,
    ) -> Result<Self, DeserializeError> {
        let mut deserializer = Deserializer::new(registry);
        let data = deserializer.document(&document, options)?;
        let (graph, diagnostics) = deserializer.into_parts();

        Ok(Self {
            graph,
            data,
            meta: document.meta,
            links: document.links,
            diagnostics,
        })
    }

    /// Render the primary data as plain JSON.
    pub fn to_json(&self) -> Value {
        match &self.data {
            Primary::None => Value::Null,
            Primary::One(id) => self.graph.to_json(*id),
            Primary::Many(ids) => {
                Value::Array(ids.iter().map(|id| self.graph.to_json(*id)).collect())
            }
        }
    }
}

/// Deserialize a JSON:API document value with a fresh [`Deserializer`].
///
/// # Errors
///
/// Returns `DeserializeError::InvalidDocument` if `document` is not shaped
/// like a JSON:API document, or `DeserializeError::SchemaNotFound` if a
/// resource type has no registered schema.
pub fn deserialize_document(
    registry: &dyn SchemaRegistry,
    document: &Value,
) -> Result<Deserialized, DeserializeError> {
    deserialize_document_with(registry, document, DeserializeOptions::new())
}

/// [`deserialize_document`] with explicit cache options.
///
/// With `use_cache` set and `clear_cache` unset, primary resources that
/// reference each other resolve to shared models.
pub fn deserialize_document_with(
    registry: &dyn SchemaRegistry,
    document: &Value,
    options: DeserializeOptions,
) -> Result<Deserialized, DeserializeError> {
    let document = Document::deserialize(document)
        .map_err(|source| DeserializeError::InvalidDocument { source })?;
    Deserialized::from_document(registry, document, options)
}
