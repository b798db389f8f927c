//! Data structures for layout computation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::LayoutError;

/// Placement strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Fixed-width rows in discovery order; ignores relations.
    #[default]
    #[serde(alias = "flowchart")]
    Grid,
    /// Layered drawing that follows relation direction.
    #[serde(alias = "traditional")]
    Hierarchical,
}

impl FromStr for LayoutMode {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grid" | "flowchart" => Ok(Self::Grid),
            "hierarchical" | "traditional" => Ok(Self::Hierarchical),
            _ => Err(LayoutError::UnknownMode(s.to_string())),
        }
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid => f.write_str("grid"),
            Self::Hierarchical => f.write_str("hierarchical"),
        }
    }
}

/// Axis along which hierarchical layers advance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RankDirection {
    #[default]
    #[serde(rename = "tb")]
    TopBottom,
    #[serde(rename = "lr")]
    LeftRight,
}

impl FromStr for RankDirection {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tb" | "td" => Ok(Self::TopBottom),
            "lr" => Ok(Self::LeftRight),
            _ => Err(LayoutError::UnknownDirection(s.to_string())),
        }
    }
}

impl RankDirection {
    /// Face an edge leaves from when it travels to a higher rank.
    pub fn trailing_side(self) -> Side {
        match self {
            Self::TopBottom => Side::Bottom,
            Self::LeftRight => Side::Right,
        }
    }

    /// Face an edge enters through when it arrives from a lower rank.
    pub fn leading_side(self) -> Side {
        match self {
            Self::TopBottom => Side::Top,
            Self::LeftRight => Side::Left,
        }
    }

    /// Face used for self-referencing loops, perpendicular to rank flow.
    pub fn loop_side(self) -> Side {
        match self {
            Self::TopBottom => Side::Right,
            Self::LeftRight => Side::Bottom,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Face of a node box an edge attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }
}

/// What a renderer shows inside a node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeData {
    pub label: String,
    pub fields: Vec<String>,
}

/// A positioned node. `position` is the top-left corner of its box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutNode {
    pub id: String,
    pub position: Point,
    pub width: f64,
    pub height: f64,
    /// Layer index in hierarchical mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<usize>,
    pub data: NodeData,
}

impl LayoutNode {
    pub fn center(&self) -> Point {
        Point::new(
            self.position.x + self.width / 2.0,
            self.position.y + self.height / 2.0,
        )
    }

    /// Midpoint of one face, shifted along the face by `offset`.
    pub fn anchor(&self, side: Side, offset: f64) -> Point {
        let c = self.center();
        match side {
            Side::Top => Point::new(c.x + offset, self.position.y),
            Side::Bottom => Point::new(c.x + offset, self.position.y + self.height),
            Side::Left => Point::new(self.position.x, c.y + offset),
            Side::Right => Point::new(self.position.x + self.width, c.y + offset),
        }
    }

    /// Length of a face.
    pub fn side_length(&self, side: Side) -> f64 {
        if side.is_horizontal() {
            self.width
        } else {
            self.height
        }
    }
}

/// An edge with routing metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: String,
    pub source_side: Side,
    pub target_side: Side,
    /// Path points (start, bends, end)
    pub waypoints: Vec<Point>,
    pub self_ref: bool,
}

/// The complete layout result.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
    pub width: f64,
    pub height: f64,
}

impl Layout {
    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// Side choice and intermediate points for one edge, before anchors are
/// distributed.
#[derive(Debug, Clone)]
pub struct EdgePlan {
    pub source_side: Side,
    pub target_side: Side,
    /// Points the path must pass through between the two anchors.
    pub via: Vec<Point>,
}
