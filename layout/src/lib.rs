//! # Layered layout
//!
//! Computes a top-to-bottom (or left-to-right) layered layout for a
//! directed graph of fixed-size boxes.
//!
//! ```text
//! ┌──────────────┐   ┌──────────┐   ┌──────────────┐   ┌─────────────┐
//! │ registration │──►│ ranking  │──►│ ordering     │──►│ coordinates │
//! │ dedup ids,   │   │ break    │   │ barycenter   │   │ centre each │
//! │ drop dangling│   │ cycles,  │   │ sweeps, keep │   │ rank, set   │
//! │ edges        │   │ layer    │   │ best order   │   │ anchors     │
//! └──────────────┘   └──────────┘   └──────────────┘   └─────────────┘
//! ```
//!
//! Layout is pure: the same input and configuration always produce the same
//! coordinates, and edges are passed through untouched.

pub mod config;
mod graph;
mod order;
mod position;
mod rank;

use docgraph_core::{GraphEdge, GraphNode, LaidOutGraph};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use config::LayoutConfig;

use graph::LayoutGraph;

/// Counters describing one layout run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutStats {
    /// Distinct nodes placed.
    pub nodes: usize,
    /// Ranks used.
    pub ranks: usize,
    /// Most nodes in any one rank.
    pub max_rank_width: usize,
    /// Remaining crossings between adjacent ranks.
    pub crossings: usize,
    /// Crossing-reduction passes run.
    pub passes: usize,
    /// Edges reversed to break cycles.
    pub reversed_edges: usize,
    /// Edges ignored because an endpoint is unknown.
    pub dangling_edges: usize,
}

/// Lay out `nodes` and `edges`.
pub fn layout(nodes: &[GraphNode], edges: &[GraphEdge], config: &LayoutConfig) -> LaidOutGraph {
    layout_with_stats(nodes, edges, config).0
}

/// Lay out `nodes` and `edges`, also returning run counters.
pub fn layout_with_stats(
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    config: &LayoutConfig,
) -> (LaidOutGraph, LayoutStats) {
    let graph = LayoutGraph::register(nodes, edges);
    if graph.len() == 0 {
        return (
            LaidOutGraph {
                nodes: Vec::new(),
                edges: edges.to_vec(),
            },
            LayoutStats {
                dangling_edges: graph.dangling,
                ..LayoutStats::default()
            },
        );
    }

    let ranking = rank::assign_ranks(&graph);
    let order = order::reduce_crossings(
        ranking.buckets(),
        &ranking.ranks,
        &ranking.edges,
        config.max_order_passes,
    );
    let placed = position::assign_positions(&graph.nodes, &order.ranks, config);

    let stats = LayoutStats {
        nodes: graph.len(),
        ranks: order.ranks.len(),
        max_rank_width: order.ranks.iter().map(Vec::len).max().unwrap_or(0),
        crossings: order.crossings,
        passes: order.passes,
        reversed_edges: ranking.reversed,
        dangling_edges: graph.dangling,
    };
    debug!(
        nodes = stats.nodes,
        ranks = stats.ranks,
        crossings = stats.crossings,
        passes = stats.passes,
        "Layout complete"
    );

    (
        LaidOutGraph {
            nodes: placed,
            edges: edges.to_vec(),
        },
        stats,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_input() {
        let (graph, stats) = layout_with_stats(&[], &[], &LayoutConfig::default());
        assert!(graph.is_empty());
        assert_eq!(stats, LayoutStats::default());
    }

    #[test]
    fn test_edges_without_nodes_pass_through() {
        let edges = vec![GraphEdge::new("a", "b")];
        let (graph, stats) = layout_with_stats(&[], &edges, &LayoutConfig::default());
        assert!(graph.nodes.is_empty());
        assert_eq!(graph.edges, edges);
        assert_eq!(stats.dangling_edges, 1);
    }

    #[test]
    fn test_stats() {
        let nodes = vec![
            GraphNode::new("r", "Root"),
            GraphNode::new("a", "A"),
            GraphNode::new("b", "B"),
        ];
        let edges = vec![GraphEdge::new("r", "a"), GraphEdge::new("r", "b")];
        let (_, stats) = layout_with_stats(&nodes, &edges, &LayoutConfig::default());

        assert_eq!(stats.nodes, 3);
        assert_eq!(stats.ranks, 2);
        assert_eq!(stats.max_rank_width, 2);
        assert_eq!(stats.crossings, 0);
    }
}
