//! Flow-graph data shapes.
//!
//! These types carry no behavior beyond construction helpers. Geometry is
//! derived from them by [`crate::layout`].

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a node within one flow graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create a node id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a node represents in the control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum NodeKind {
    /// Entry point
    Start,
    /// Exit point
    End,
    /// Branch on a condition
    Decision,
    /// Any other step
    #[default]
    Process,
}

impl NodeKind {
    /// Parse a kind name, case-insensitively. Unknown names are `Process`.
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "start" => NodeKind::Start,
            "end" => NodeKind::End,
            "decision" => NodeKind::Decision,
            _ => NodeKind::Process,
        }
    }
}

impl From<String> for NodeKind {
    fn from(name: String) -> Self {
        NodeKind::parse(&name)
    }
}

/// Explicit pixel position of a node's center.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A node of an abstract flow graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowNode {
    pub id: NodeId,
    pub label: String,
    #[serde(rename = "type", alias = "kind", default)]
    pub kind: NodeKind,
    /// When absent the layout engine computes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl FlowNode {
    /// Create a node without an explicit position.
    pub fn new(id: impl Into<NodeId>, label: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            position: None,
        }
    }

    /// Pin the node at an explicit position.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Some(Position::new(x, y));
        self
    }
}

/// A directed edge between two nodes, referenced by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowEdge {
    pub from: NodeId,
    pub to: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl FlowEdge {
    /// Create an unlabelled edge.
    pub fn new(from: impl Into<NodeId>, to: impl Into<NodeId>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            label: None,
        }
    }

    /// Attach a label drawn at the edge midpoint.
    pub fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Nodes and edges of one diagram.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FlowGraph {
    pub nodes: Vec<FlowNode>,
    #[serde(default)]
    pub edges: Vec<FlowEdge>,
}

impl FlowGraph {
    pub fn new(nodes: Vec<FlowNode>, edges: Vec<FlowEdge>) -> Self {
        Self { nodes, edges }
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&FlowNode> {
        self.nodes.iter().find(|n| n.id.as_str() == id)
    }

    /// Check whether a node with this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Lay this graph out with the default configuration.
    pub fn layout(&self) -> crate::Layout {
        crate::layout(&self.nodes, &self.edges)
    }
}
