//! Per-call table of models already deserialized, keyed by `(type, id)`.

use std::collections::HashMap;

use crate::model::ModelId;

/// Breaks relationship cycles within one deserialization call tree.
///
/// Owned by a [`Deserializer`](crate::Deserializer); never shared between
/// unrelated calls.
#[derive(Debug, Default)]
pub struct DeserializeCache {
    entries: HashMap<String, HashMap<String, ModelId>>,
}

impl DeserializeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record or overwrite the model for `(kind, id)`.
    pub fn set(&mut self, kind: &str, id: &str, model: ModelId) {
        self.entries
            .entry(kind.to_string())
            .or_default()
            .insert(id.to_string(), model);
    }

    /// Model for `(kind, id)`, or `None` on a miss.
    pub fn get(&self, kind: &str, id: &str) -> Option<ModelId> {
        self.entries.get(kind)?.get(id).copied()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
