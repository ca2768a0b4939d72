//! Stepviz Flow Graphs
//!
//! Abstract flow-graph descriptions of an algorithm's control structure and
//! the layout pass that turns them into positioned diagram geometry.
//!
//! # Layout Rules
//!
//! The layout engine is deliberately small. It supports two cases only:
//! - Nodes carrying an explicit position are placed verbatim
//! - Nodes without one are stacked in a single top-to-bottom column,
//!   ordered by their position in the input
//!
//! There is no cycle handling and no crossing minimization. Edges that
//! reference unknown node ids are dropped, never reported as errors.
//!
//! # Usage
//!
//! ```
//! use stepviz_flow::{layout, FlowEdge, FlowNode, NodeKind};
//!
//! let nodes = vec![
//!     FlowNode::new("start", "Start", NodeKind::Start),
//!     FlowNode::new("work", "Do work", NodeKind::Process),
//!     FlowNode::new("end", "End", NodeKind::End),
//! ];
//! let edges: Vec<FlowEdge> = Vec::new();
//!
//! let diagram = layout(&nodes, &edges);
//! assert_eq!(diagram.nodes.len(), 3);
//! assert_eq!(diagram.edges.len(), 2); // auto-chained
//! ```

mod geometry;
mod graph;
mod layout;

pub use geometry::{Point, Shape};
pub use graph::{FlowEdge, FlowGraph, FlowNode, NodeId, NodeKind, Position};
pub use layout::{layout, EdgeLabel, Layout, LayoutConfig, PositionedNode, RenderableEdge};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_lays_out_through_default_config() {
        let graph = FlowGraph::new(
            vec![
                FlowNode::new("a", "A", NodeKind::Start),
                FlowNode::new("b", "B", NodeKind::End),
            ],
            vec![FlowEdge::new("a", "b")],
        );

        let diagram = graph.layout();
        assert_eq!(diagram, layout(&graph.nodes, &graph.edges));
        assert_eq!(diagram.width, LayoutConfig::default().canvas_width);
    }
}
