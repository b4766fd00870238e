//! Node/edge graph types.
//!
//! Field names follow the synthesis wire format: a node's parent is
//! serialized as `parent`, an edge's endpoints as `source` and `target`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A node in a synthesized graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Identifier, unique within a graph.
    pub id: String,

    /// Short display label.
    pub label: String,

    /// Direct parent in the topic hierarchy (None for roots).
    ///
    /// Advisory metadata only: connectivity comes from edges.
    #[serde(rename = "parent", default)]
    pub parent_id: Option<String>,
}

impl GraphNode {
    /// Create a root node.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            parent_id: None,
        }
    }

    /// Set the parent id.
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Whether this node declares itself a root.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// A directed edge, source to target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Id of the parent-side node.
    #[serde(rename = "source")]
    pub source_id: String,

    /// Id of the child-side node.
    #[serde(rename = "target")]
    pub target_id: String,
}

impl GraphEdge {
    /// Create a new edge.
    pub fn new(source_id: impl Into<String>, target_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
        }
    }

    /// Whether the edge starts and ends on the same node.
    pub fn is_self_loop(&self) -> bool {
        self.source_id == self.target_id
    }
}

/// The unvalidated output of one synthesis call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl CandidateGraph {
    /// Create a graph from its parts.
    pub fn new(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        Self { nodes, edges }
    }

    /// Whether the graph has no nodes and no edges.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// Primary flow direction of a layered drawing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Top to bottom.
    #[default]
    #[serde(alias = "TB", alias = "vertical")]
    Down,

    /// Left to right.
    #[serde(alias = "LR", alias = "horizontal")]
    Across,
}

impl Direction {
    /// Side of a node box where incoming edges terminate.
    pub fn target_anchor(self) -> AnchorSide {
        match self {
            Self::Down => AnchorSide::Top,
            Self::Across => AnchorSide::Left,
        }
    }

    /// Side of a node box where outgoing edges originate.
    pub fn source_anchor(self) -> AnchorSide {
        match self {
            Self::Down => AnchorSide::Bottom,
            Self::Across => AnchorSide::Right,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Down => "down",
            Self::Across => "across",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "down" | "tb" | "vertical" => Ok(Self::Down),
            "across" | "lr" | "horizontal" => Ok(Self::Across),
            other => Err(format!("unknown direction: {other}")),
        }
    }
}

/// Side of a node's bounding box used as an edge endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorSide {
    Top,
    Bottom,
    Left,
    Right,
}

/// A node with its computed box and anchors.
///
/// `x` and `y` are the top-left corner of the box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    #[serde(flatten)]
    pub node: GraphNode,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub source_anchor_side: AnchorSide,
    pub target_anchor_side: AnchorSide,
}

impl LayoutNode {
    pub fn id(&self) -> &str {
        &self.node.id
    }

    /// Centre point of the box.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether two boxes share any interior area.
    pub fn overlaps(&self, other: &LayoutNode) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

/// The positioned graph handed to the display layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LaidOutGraph {
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<GraphEdge>,
}

impl LaidOutGraph {
    /// Look up a positioned node by id.
    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.node.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}
