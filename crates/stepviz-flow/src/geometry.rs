//! Pixel geometry handed to diagram renderers.

use serde::{Deserialize, Serialize};

use crate::graph::NodeKind;

/// A point in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Midpoint of the segment between two points.
    pub fn midpoint(self, other: Self) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }
}

/// Outline drawn for a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum Shape {
    /// Start and end nodes
    Ellipse { cx: f64, cy: f64, rx: f64, ry: f64 },
    /// Decision nodes; points are top, right, bottom, left
    Diamond { points: [Point; 4] },
    /// Everything else; `x`/`y` is the top-left corner
    Rectangle {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}

impl Shape {
    /// Build the outline for a node of `kind` centered at `center`.
    pub fn for_kind(kind: NodeKind, center: Point, width: f64, height: f64) -> Self {
        let (hw, hh) = (width / 2.0, height / 2.0);
        match kind {
            NodeKind::Start | NodeKind::End => Shape::Ellipse {
                cx: center.x,
                cy: center.y,
                rx: hw,
                ry: hh,
            },
            NodeKind::Decision => Shape::Diamond {
                points: [
                    Point::new(center.x, center.y - hh),
                    Point::new(center.x + hw, center.y),
                    Point::new(center.x, center.y + hh),
                    Point::new(center.x - hw, center.y),
                ],
            },
            NodeKind::Process => Shape::Rectangle {
                x: center.x - hw,
                y: center.y - hh,
                width,
                height,
            },
        }
    }
}
