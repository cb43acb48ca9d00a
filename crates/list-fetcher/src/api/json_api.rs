//! Minimal JSON:API document support.
//!
//! Kitsu answers with JSON:API documents: primary resources in `data`,
//! related resources in `included`, linked through `relationships`.
//! `Document::flatten` folds each primary resource into a plain JSON object
//! with its attributes and related resources inlined, so it can be
//! deserialized into an ordinary struct.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Top-level JSON:API document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub data: Vec<Resource>,
    #[serde(default)]
    pub included: Vec<Resource>,
    #[serde(default)]
    pub links: Links,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Links {
    pub next: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Resource {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default)]
    pub relationships: HashMap<String, Relationship>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Relationship {
    #[serde(default)]
    pub data: Option<Linkage>,
}

/// Resource linkage: to-one or to-many
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Linkage {
    One(ResourceIdentifier),
    Many(Vec<ResourceIdentifier>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResourceIdentifier {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

type ResourceIndex<'a> = HashMap<(&'a str, &'a str), &'a Resource>;

impl Document {
    /// Flatten every primary resource, inlining related resources found in
    /// `data` or `included`. Unresolvable links become `{id, type}` stubs.
    pub fn flatten(&self) -> Vec<Value> {
        let index: ResourceIndex<'_> = self
            .data
            .iter()
            .chain(self.included.iter())
            .map(|r| ((r.kind.as_str(), r.id.as_str()), r))
            .collect();

        let mut path = Vec::new();
        self.data
            .iter()
            .map(|resource| flatten_resource(resource, &index, &mut path))
            .collect()
    }
}

fn flatten_resource<'a>(
    resource: &'a Resource,
    index: &ResourceIndex<'a>,
    path: &mut Vec<(&'a str, &'a str)>,
) -> Value {
    let mut object = resource.attributes.clone();
    object.insert("id".to_string(), Value::String(resource.id.clone()));
    object.insert("type".to_string(), Value::String(resource.kind.clone()));

    path.push((resource.kind.as_str(), resource.id.as_str()));

    for (name, relationship) in &resource.relationships {
        let value = match &relationship.data {
            None => continue,
            Some(Linkage::One(identifier)) => resolve_identifier(identifier, index, path),
            Some(Linkage::Many(identifiers)) => Value::Array(
                identifiers
                    .iter()
                    .map(|identifier| resolve_identifier(identifier, index, path))
                    .collect(),
            ),
        };
        object.insert(name.clone(), value);
    }

    path.pop();
    Value::Object(object)
}

fn resolve_identifier<'a>(
    identifier: &'a ResourceIdentifier,
    index: &ResourceIndex<'a>,
    path: &mut Vec<(&'a str, &'a str)>,
) -> Value {
    let key = (identifier.kind.as_str(), identifier.id.as_str());

    // Back-references to a resource already being expanded stay as stubs
    match index.get(&key) {
        Some(&resource) if !path.contains(&key) => flatten_resource(resource, index, path),
        _ => {
            let mut stub = Map::new();
            stub.insert("id".to_string(), Value::String(identifier.id.clone()));
            stub.insert("type".to_string(), Value::String(identifier.kind.clone()));
            Value::Object(stub)
        }
    }
}
