//! Relationship resolution against sideloaded `included` resources.

use serde_json::Value;
use tracing::debug;

use crate::deserializer::Deserializer;
use crate::error::DeserializeError;
use crate::filter::matches_attributes;
use crate::model::ModelId;
use crate::types::{DeserializeOptions, Linkage, ResourceIdentifier, ResourceObject};

impl Deserializer<'_> {
    /// Resolve a has-one relationship: a cached model for the linkage
    /// target if there is one, else the first related item.
    pub(crate) fn has_one(
        &mut self,
        filter: Option<&Value>,
        item: &ResourceObject,
        included: &[ResourceObject],
        key: &str,
    ) -> Result<Option<ModelId>, DeserializeError> {
        if item.relationships.is_none() {
            return Ok(None);
        }

        if let Some(Linkage::One(target)) = item.linkage(key) {
            if let Some(cached) = self.cache.get(&target.kind, &target.id) {
                debug!(model = %target.kind, id = %target.id, relationship = key, "has-one from cache");
                return Ok(Some(cached));
            }
        }

        match related_items(filter, item, included, key).first() {
            Some(related) => self
                .resource(related, included, DeserializeOptions::NESTED)
                .map(Some),
            None => Ok(None),
        }
    }

    pub(crate) fn has_many(
        &mut self,
        filter: Option<&Value>,
        item: &ResourceObject,
        included: &[ResourceObject],
        key: &str,
    ) -> Result<Vec<ModelId>, DeserializeError> {
        if item.relationships.is_none() {
            return Ok(Vec::new());
        }

        let related = related_items(filter, item, included, key);
        if related.is_empty() {
            return Ok(Vec::new());
        }
        self.collect_resources(related, included, DeserializeOptions::NESTED)
    }
}

/// Included resources referenced by relationship `key` of `item`.
///
/// Follows linkage order; for each identifier every matching included
/// resource is taken, in `included` order. Missing linkage yields nothing.
pub(crate) fn related_items<'i>(
    filter: Option<&Value>,
    item: &ResourceObject,
    included: &'i [ResourceObject],
    key: &str,
) -> Vec<&'i ResourceObject> {
    let Some(linkage) = item.linkage(key) else {
        return Vec::new();
    };

    linkage
        .identifiers()
        .iter()
        .flat_map(|target| {
            included
                .iter()
                .filter(move |candidate| is_related_item(filter, candidate, target))
        })
        .collect()
}

fn is_related_item(
    filter: Option<&Value>,
    candidate: &ResourceObject,
    target: &ResourceIdentifier,
) -> bool {
    let passes_filter = match filter {
        Some(pattern) => matches_attributes(&candidate.attributes, pattern),
        None => true,
    };
    candidate.id == target.id && candidate.kind == target.kind && passes_filter
}
