//! Path — an ordered run of vertices and the edges between them.

use serde::{Deserialize, Serialize};
use super::{Edge, Vertex};

/// A path in the graph: vertex -[edge]-> vertex -[edge]-> vertex ...
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Path {
    /// Vertices along the path. A well-formed path has one more vertex than edges.
    pub vertices: Vec<Vertex>,
    /// Edges connecting consecutive vertices.
    pub edges: Vec<Edge>,
}

impl Path {
    pub fn single(vertex: Vertex) -> Self {
        Self { vertices: vec![vertex], edges: Vec::new() }
    }

    /// Number of edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn start(&self) -> Option<&Vertex> {
        self.vertices.first()
    }

    pub fn end(&self) -> Option<&Vertex> {
        self.vertices.last()
    }

    /// Extend path with an edge and its target vertex.
    pub fn append(&mut self, edge: Edge, vertex: Vertex) {
        self.edges.push(edge);
        self.vertices.push(vertex);
    }
}
