//! Graph reconstruction from graph-query rows.
//!
//! - [`GraphElement`]: explicit node/edge decoding of a column value
//! - [`PropertyGraph`]: directed multigraph keyed by stringified identifiers
//! - [`interpret`]: rows in, [`GraphOutcome`] out

mod element;
mod interpreter;

pub use element::GraphElement;
pub use interpreter::{interpret, GraphOutcome};

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value};

/// Category used when a node carries no labels.
pub const DEFAULT_CATEGORY: &str = "Unknown";

/// Relation label used when an edge carries no labels.
pub const DEFAULT_RELATION: &str = "RELATED";

/// A vertex of the reconstructed graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    /// Stringified identifier.
    pub id: String,
    /// Display label: the `Name` property, else the identifier.
    pub label: String,
    /// First label of the element, else [`DEFAULT_CATEGORY`].
    pub category: String,
    /// Raw properties.
    pub properties: Map<String, Value>,
}

/// A directed edge of the reconstructed graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphEdge {
    /// Stringified identifier; parallel edges keep distinct ids.
    pub id: String,
    /// Source node identifier.
    pub source: String,
    /// Destination node identifier.
    pub target: String,
    /// First label of the element, else [`DEFAULT_RELATION`].
    pub label: String,
    /// Raw properties.
    pub properties: Map<String, Value>,
}

/// Directed multigraph with insertion-ordered nodes and edges.
///
/// Re-adding an id overwrites its attributes in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    node_index: HashMap<String, usize>,
    edge_index: HashMap<String, usize>,
}

impl PropertyGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a decoded element, overwriting any earlier element with the same id
    pub fn add_element(&mut self, element: GraphElement) {
        match element {
            GraphElement::Node {
                id,
                labels,
                properties,
            } => {
                let label = properties
                    .get("Name")
                    .filter(|name| !name.is_null())
                    .map(element::stringify_id)
                    .unwrap_or_else(|| id.clone());
                let category = labels
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

                self.upsert_node(GraphNode {
                    id,
                    label,
                    category,
                    properties,
                });
            }
            GraphElement::Edge {
                id,
                source,
                target,
                labels,
                properties,
            } => {
                let label = labels
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| DEFAULT_RELATION.to_string());

                self.ensure_node(&source);
                self.ensure_node(&target);
                self.upsert_edge(GraphEdge {
                    id,
                    source,
                    target,
                    label,
                    properties,
                });
            }
        }
    }

    fn upsert_node(&mut self, node: GraphNode) {
        match self.node_index.get(&node.id) {
            Some(&idx) => self.nodes[idx] = node,
            None => {
                self.node_index.insert(node.id.clone(), self.nodes.len());
                self.nodes.push(node);
            }
        }
    }

    /// Add a bare endpoint for an edge whose node never appeared.
    /// A later explicit node replaces it in place.
    fn ensure_node(&mut self, id: &str) {
        if self.node_index.contains_key(id) {
            return;
        }
        self.upsert_node(GraphNode {
            id: id.to_string(),
            label: id.to_string(),
            category: DEFAULT_CATEGORY.to_string(),
            properties: Map::new(),
        });
    }

    fn upsert_edge(&mut self, edge: GraphEdge) {
        match self.edge_index.get(&edge.id) {
            Some(&idx) => self.edges[idx] = edge,
            None => {
                self.edge_index.insert(edge.id.clone(), self.edges.len());
                self.edges.push(edge);
            }
        }
    }

    /// Nodes in first-seen order
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// Edges in first-seen order
    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// Look up a node by identifier
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.node_index.get(id).map(|&idx| &self.nodes[idx])
    }

    /// Look up an edge by identifier
    pub fn edge(&self, id: &str) -> Option<&GraphEdge> {
        self.edge_index.get(id).map(|&idx| &self.edges[idx])
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}
