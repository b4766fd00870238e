//! Layout configuration.

use docgraph_core::Direction;
use serde::{Deserialize, Serialize};

/// Geometry and effort settings for [`layout`](crate::layout).
///
/// Every field has its own default, so a partial TOML or JSON table only
/// overrides what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Flow direction of ranks.
    pub direction: Direction,

    /// Box width of every node.
    pub node_width: f64,

    /// Box height of every node.
    pub node_height: f64,

    /// Gap between neighbouring boxes in one rank.
    pub node_spacing: f64,

    /// Gap between consecutive ranks.
    pub rank_spacing: f64,

    /// Upper bound on crossing-reduction passes.
    pub max_order_passes: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            direction: Direction::Down,
            node_width: 172.0,
            node_height: 50.0,
            node_spacing: 50.0,
            rank_spacing: 70.0,
            max_order_passes: 24,
        }
    }
}

impl LayoutConfig {
    /// Set the flow direction.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Set the node box size.
    pub fn with_node_size(mut self, width: f64, height: f64) -> Self {
        self.node_width = width;
        self.node_height = height;
        self
    }

    /// Set the in-rank and between-rank gaps.
    pub fn with_spacing(mut self, node_spacing: f64, rank_spacing: f64) -> Self {
        self.node_spacing = node_spacing;
        self.rank_spacing = rank_spacing;
        self
    }

    /// Node extent along the flow axis.
    pub(crate) fn flow_extent(&self) -> f64 {
        match self.direction {
            Direction::Down => self.node_height,
            Direction::Across => self.node_width,
        }
    }

    /// Node extent across the flow axis.
    pub(crate) fn cross_extent(&self) -> f64 {
        match self.direction {
            Direction::Down => self.node_width,
            Direction::Across => self.node_height,
        }
    }
}
