//! Deserialized models and the arena graph that owns them.
//!
//! Relationships point at other models through [`ModelId`] handles, so a
//! graph may be cyclic. Two relationship values refer to the same model
//! instance exactly when their handles are equal.

use std::ops::Index;

use serde_json::{Map, Value};

/// Handle to a model inside a [`ModelGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(usize);

impl ModelId {
    /// Position of the model in its graph, in insertion order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Resolved value of a relationship.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relation {
    One(Option<ModelId>),
    Many(Vec<ModelId>),
}

impl Relation {
    pub fn as_one(&self) -> Option<ModelId> {
        match self {
            Relation::One(id) => *id,
            Relation::Many(_) => None,
        }
    }

    pub fn as_many(&self) -> &[ModelId] {
        match self {
            Relation::Many(ids) => ids,
            Relation::One(_) => &[],
        }
    }
}

/// A plain model built from one resource object.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub id: String,
    pub kind: String,
    pub attributes: Map<String, Value>,
    relationships: Vec<(String, Relation)>,
    pub meta: Option<Value>,
    pub links: Option<Value>,
}

impl Model {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            attributes: Map::new(),
            relationships: Vec::new(),
            meta: None,
            links: None,
        }
    }

    /// Builder-style attribute setter, handy for custom deserializers.
    pub fn with_attribute(mut self, name: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub fn relation(&self, name: &str) -> Option<&Relation> {
        self.relationships
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, relation)| relation)
    }

    /// Relationships in the order they were resolved.
    pub fn relations(&self) -> impl Iterator<Item = (&str, &Relation)> {
        self.relationships
            .iter()
            .map(|(key, relation)| (key.as_str(), relation))
    }

    /// Assign a relationship, replacing any earlier value under `name`.
    pub fn set_relation(&mut self, name: impl Into<String>, relation: Relation) {
        let name = name.into();
        match self.relationships.iter_mut().find(|(key, _)| *key == name) {
            Some((_, slot)) => *slot = relation,
            None => self.relationships.push((name, relation)),
        }
    }
}

/// Arena owning every model produced by a [`Deserializer`](crate::Deserializer).
#[derive(Debug, Clone, Default)]
pub struct ModelGraph {
    nodes: Vec<Model>,
}

impl ModelGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, model: Model) -> ModelId {
        self.nodes.push(model);
        ModelId(self.nodes.len() - 1)
    }

    pub fn get(&self, id: ModelId) -> Option<&Model> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: ModelId) -> Option<&mut Model> {
        self.nodes.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Follow a has-one relationship from `id`.
    pub fn related(&self, id: ModelId, name: &str) -> Option<ModelId> {
        self.get(id)?.relation(name)?.as_one()
    }

    /// Render a model and everything reachable from it as plain JSON.
    ///
    /// A reference back to a model already on the current render path is
    /// written as its `{id, type}` identifier, so cycles terminate.
    pub fn to_json(&self, id: ModelId) -> Value {
        let mut path = Vec::new();
        self.render(id, &mut path)
    }

    fn render(&self, id: ModelId, path: &mut Vec<ModelId>) -> Value {
        let Some(model) = self.get(id) else {
            return Value::Null;
        };

        let mut map = Map::new();
        map.insert("id".to_string(), Value::String(model.id.clone()));
        map.insert("type".to_string(), Value::String(model.kind.clone()));

        if path.contains(&id) {
            return Value::Object(map);
        }
        path.push(id);

        for (name, value) in &model.attributes {
            map.insert(name.clone(), value.clone());
        }

        for (name, relation) in &model.relationships {
            let rendered = match relation {
                Relation::One(Some(target)) => self.render(*target, path),
                Relation::One(None) => Value::Null,
                Relation::Many(targets) => Value::Array(
                    targets
                        .iter()
                        .map(|target| self.render(*target, path))
                        .collect(),
                ),
            };
            map.insert(name.clone(), rendered);
        }

        if let Some(meta) = &model.meta {
            map.insert("meta".to_string(), meta.clone());
        }
        if let Some(links) = &model.links {
            map.insert("links".to_string(), links.clone());
        }

        path.pop();
        Value::Object(map)
    }
}

impl Index<ModelId> for ModelGraph {
    type Output = Model;

    /// # Panics
    ///
    /// Panics if `id` was not issued by this graph.
    fn index(&self, id: ModelId) -> &Model {
        &self.nodes[id.0]
    }
}
