//! Coordinate and anchor assignment.

use docgraph_core::{Direction, GraphNode, LayoutNode};

use crate::config::LayoutConfig;

/// Place every node of `order` and return them in node-index order.
///
/// Rank `r` is centred at `r * (flow extent + rank_spacing)` on the flow
/// axis. Within a rank, node `i` is centred at
/// `i * (cross extent + node_spacing)`, shifted so each rank is centred
/// against the widest one. Boxes are then offset by half their size so
/// `(x, y)` is the top-left corner.
pub(crate) fn assign_positions(
    nodes: &[GraphNode],
    order: &[Vec<usize>],
    config: &LayoutConfig,
) -> Vec<LayoutNode> {
    let rank_step = config.flow_extent() + config.rank_spacing;
    let cross_step = config.cross_extent() + config.node_spacing;
    let widest = order.iter().map(Vec::len).max().unwrap_or(0);
    let widest_span = span(widest, cross_step);

    let mut centres = vec![(0.0_f64, 0.0_f64); nodes.len()];
    for (rank, members) in order.iter().enumerate() {
        let flow = rank as f64 * rank_step;
        let shift = (widest_span - span(members.len(), cross_step)) / 2.0;
        for (i, &node) in members.iter().enumerate() {
            let cross = i as f64 * cross_step + shift;
            centres[node] = match config.direction {
                Direction::Down => (cross, flow),
                Direction::Across => (flow, cross),
            };
        }
    }

    let width = config.node_width;
    let height = config.node_height;
    nodes
        .iter()
        .zip(centres)
        .map(|(node, (cx, cy))| LayoutNode {
            node: node.clone(),
            x: cx - width / 2.0,
            y: cy - height / 2.0,
            width,
            height,
            source_anchor_side: config.direction.source_anchor(),
            target_anchor_side: config.direction.target_anchor(),
        })
        .collect()
}

/// Distance between the first and last centre of a rank of `count` nodes.
fn span(count: usize, step: f64) -> f64 {
    count.saturating_sub(1) as f64 * step
}
