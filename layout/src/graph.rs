//! Registration of nodes and edges into an index-based graph.

use docgraph_core::{GraphEdge, GraphNode};
use indexmap::{IndexMap, IndexSet};
use tracing::debug;

/// Index-based view of the input used by every layout phase.
///
/// Node indices follow first-seen order. Adjacency lists are sorted and
/// free of self-loops and parallel duplicates.
#[derive(Debug, Default)]
pub(crate) struct LayoutGraph {
    /// First occurrence of every distinct node id.
    pub nodes: Vec<GraphNode>,
    /// Distinct directed pairs `(source, target)` in first-seen order.
    pub edges: Vec<(usize, usize)>,
    /// Input edges dropped because an endpoint is unknown.
    pub dangling: usize,
}

impl LayoutGraph {
    /// Register `nodes` and `edges`.
    pub fn register(nodes: &[GraphNode], edges: &[GraphEdge]) -> Self {
        let mut index: IndexMap<&str, usize> = IndexMap::with_capacity(nodes.len());
        let mut kept = Vec::with_capacity(nodes.len());

        for node in nodes {
            if index.contains_key(node.id.as_str()) {
                debug!("Duplicate node id {} collapsed into first occurrence", node.id);
                continue;
            }
            index.insert(node.id.as_str(), kept.len());
            kept.push(node.clone());
        }

        let mut pairs: IndexSet<(usize, usize)> = IndexSet::with_capacity(edges.len());
        let mut dangling = 0;

        for edge in edges {
            let source = index.get(edge.source_id.as_str()).copied();
            let target = index.get(edge.target_id.as_str()).copied();
            match (source, target) {
                (Some(u), Some(v)) if u != v => {
                    pairs.insert((u, v));
                }
                (Some(_), Some(_)) => {
                    debug!("Self-loop on {} ignored for ranking", edge.source_id);
                }
                _ => {
                    debug!(
                        "Edge {} -> {} references an unknown node; ignored",
                        edge.source_id, edge.target_id
                    );
                    dangling += 1;
                }
            }
        }

        Self {
            nodes: kept,
            edges: pairs.into_iter().collect(),
            dangling,
        }
    }

    /// Number of distinct nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Sorted successor lists for `edges`.
    pub fn successors(n: usize, edges: &[(usize, usize)]) -> Vec<Vec<usize>> {
        let mut succ = vec![Vec::new(); n];
        for &(u, v) in edges {
            succ[u].push(v);
        }
        for list in &mut succ {
            list.sort_unstable();
            list.dedup();
        }
        succ
    }

    /// Sorted predecessor lists for `edges`.
    pub fn predecessors(n: usize, edges: &[(usize, usize)]) -> Vec<Vec<usize>> {
        let mut pred = vec![Vec::new(); n];
        for &(u, v) in edges {
            pred[v].push(u);
        }
        for list in &mut pred {
            list.sort_unstable();
            list.dedup();
        }
        pred
    }
}
