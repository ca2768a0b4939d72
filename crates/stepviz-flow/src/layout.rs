//! Straight-chain layout of flow graphs.
//!
//! The layout is a pure function of its input: the same nodes and edges
//! always produce the same geometry, and nothing is cached or mutated.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Shape};
use crate::graph::{FlowEdge, FlowNode, NodeId, NodeKind};

/// Geometry constants for the layout pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Width of every node box
    pub node_width: f64,
    /// Height of every node box
    pub node_height: f64,
    /// X of the column used for nodes without an explicit position
    pub center_x: f64,
    /// Y of the first chained node
    pub base_offset: f64,
    /// Distance between consecutive chained nodes
    pub vertical_spacing: f64,
    /// Fixed canvas width
    pub canvas_width: f64,
    /// Canvas height never drops below this
    pub min_height: f64,
    /// Extra height below the last node slot
    pub height_margin: f64,
    /// Edge labels are raised this far above the edge midpoint
    pub label_offset: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 150.0,
            node_height: 60.0,
            center_x: 200.0,
            base_offset: 50.0,
            vertical_spacing: 100.0,
            canvas_width: 600.0,
            min_height: 400.0,
            height_margin: 100.0,
            label_offset: 5.0,
        }
    }
}

/// A node with resolved geometry. `x`/`y` is the center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedNode {
    pub id: NodeId,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub shape: Shape,
}

impl PositionedNode {
    /// Bottom-center anchor, where outgoing edges start.
    pub fn bottom(&self) -> Point {
        Point::new(self.x, self.y + self.height / 2.0)
    }

    /// Top-center anchor, where incoming edges end.
    pub fn top(&self) -> Point {
        Point::new(self.x, self.y - self.height / 2.0)
    }
}

/// Text drawn next to an edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeLabel {
    pub text: String,
    pub at: Point,
}

/// An edge whose endpoints have been resolved to canvas points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderableEdge {
    pub from: NodeId,
    pub to: NodeId,
    pub start: Point,
    pub end: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<EdgeLabel>,
}

/// Result of a layout pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<RenderableEdge>,
    pub width: f64,
    pub height: f64,
}

impl Layout {
    /// Look up a positioned node by id.
    pub fn node(&self, id: &str) -> Option<&PositionedNode> {
        self.nodes.iter().find(|n| n.id.as_str() == id)
    }
}

/// Lay out nodes and edges with the default configuration.
pub fn layout(nodes: &[FlowNode], edges: &[FlowEdge]) -> Layout {
    LayoutConfig::default().layout(nodes, edges)
}

impl LayoutConfig {
    /// Lay out nodes and edges.
    ///
    /// With no edges, consecutive nodes are chained top to bottom and the
    /// last node gets no outgoing edge. Supplied edges whose `from` or `to`
    /// id is unknown are dropped.
    pub fn layout(&self, nodes: &[FlowNode], edges: &[FlowEdge]) -> Layout {
        let positioned: Vec<PositionedNode> = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| self.place(index, node))
            .collect();

        let edges = if edges.is_empty() {
            positioned
                .windows(2)
                .map(|pair| self.connect(&pair[0], &pair[1], None))
                .collect()
        } else {
            // First node wins when ids repeat.
            let mut by_id: HashMap<&str, &PositionedNode> = HashMap::with_capacity(positioned.len());
            for node in &positioned {
                by_id.entry(node.id.as_str()).or_insert(node);
            }

            edges
                .iter()
                .filter_map(|edge| {
                    let from = by_id.get(edge.from.as_str())?;
                    let to = by_id.get(edge.to.as_str())?;
                    Some(self.connect(from, to, edge.label.as_deref()))
                })
                .collect()
        };

        let height = self
            .min_height
            .max(positioned.len() as f64 * self.vertical_spacing + self.height_margin);

        Layout {
            nodes: positioned,
            edges,
            width: self.canvas_width,
            height,
        }
    }

    fn place(&self, index: usize, node: &FlowNode) -> PositionedNode {
        let (x, y) = match node.position {
            Some(pos) => (pos.x, pos.y),
            None => (
                self.center_x,
                self.base_offset + index as f64 * self.vertical_spacing,
            ),
        };

        PositionedNode {
            id: node.id.clone(),
            label: node.label.clone(),
            kind: node.kind,
            x,
            y,
            width: self.node_width,
            height: self.node_height,
            shape: Shape::for_kind(node.kind, Point::new(x, y), self.node_width, self.node_height),
        }
    }

    fn connect(
        &self,
        from: &PositionedNode,
        to: &PositionedNode,
        label: Option<&str>,
    ) -> RenderableEdge {
        let start = from.bottom();
        let end = to.top();
        let label = label.map(|text| {
            let mid = start.midpoint(end);
            EdgeLabel {
                text: text.to_owned(),
                at: Point::new(mid.x, mid.y - self.label_offset),
            }
        });

        RenderableEdge {
            from: from.id.clone(),
            to: to.id.clone(),
            start,
            end,
            label,
        }
    }
}
