//! Edge in the property graph.

use serde::{Deserialize, Serialize};
use super::{GraphId, PropertyMap, Value};

/// Arrow direction of an edge pattern, read left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// `<-[..]-`
    Left,
    /// `-[..]->`
    #[default]
    Right,
    /// `-[..]-`
    Both,
}

/// A directed edge between two vertices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: Option<GraphId>,
    pub label: String,
    pub start_id: GraphId,
    pub end_id: GraphId,
    pub properties: PropertyMap,
}

impl Edge {
    pub fn new(label: impl Into<String>, start_id: GraphId, end_id: GraphId) -> Self {
        Self {
            id: None,
            label: label.into(),
            start_id,
            end_id,
            properties: PropertyMap::new(),
        }
    }

    pub fn with_id(mut self, id: GraphId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key, value);
        self
    }

    pub fn with_properties(mut self, properties: PropertyMap) -> Self {
        self.properties = properties;
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// The "other" end of the edge from the given vertex.
    pub fn other_vertex(&self, from: GraphId) -> Option<GraphId> {
        if from == self.start_id { Some(self.end_id) }
        else if from == self.end_id { Some(self.start_id) }
        else { None }
    }
}
