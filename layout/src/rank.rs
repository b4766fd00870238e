//! Rank assignment.
//!
//! Cycles are broken by reversing DFS back edges, then ranks come from a
//! longest-path layering that is tightened towards successors.

use std::collections::{BTreeSet, VecDeque};

use indexmap::IndexSet;

use crate::graph::LayoutGraph;

/// Ranks plus the acyclic edge set they were computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Ranking {
    /// Rank of every node; the smallest rank is always 0.
    pub ranks: Vec<usize>,
    /// Edges with back edges reversed; every pair strictly increases rank.
    pub edges: Vec<(usize, usize)>,
    /// Number of edges reversed to break cycles.
    pub reversed: usize,
}

impl Ranking {
    /// Number of ranks in use.
    pub fn rank_count(&self) -> usize {
        self.ranks.iter().max().map_or(0, |max| max + 1)
    }

    /// Node indices grouped by rank, each group in index order.
    pub fn buckets(&self) -> Vec<Vec<usize>> {
        let mut buckets = vec![Vec::new(); self.rank_count()];
        for (node, &rank) in self.ranks.iter().enumerate() {
            buckets[rank].push(node);
        }
        buckets
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    New,
    Active,
    Done,
}

/// Rank the nodes of `graph`.
pub(crate) fn assign_ranks(graph: &LayoutGraph) -> Ranking {
    let n = graph.len();
    let (edges, reversed) = break_cycles(n, &graph.edges);

    let succ = LayoutGraph::successors(n, &edges);
    let pred = LayoutGraph::predecessors(n, &edges);

    let mut in_degree: Vec<usize> = pred.iter().map(Vec::len).collect();
    let mut queue: VecDeque<usize> = (0..n).filter(|&v| in_degree[v] == 0).collect();
    let mut order = Vec::with_capacity(n);
    let mut ranks = vec![0usize; n];

    while let Some(u) = queue.pop_front() {
        order.push(u);
        for &v in &succ[u] {
            ranks[v] = ranks[v].max(ranks[u] + 1);
            in_degree[v] -= 1;
            if in_degree[v] == 0 {
                queue.push_back(v);
            }
        }
    }

    // Pull every node down to just above its nearest successor. Walking in
    // reverse topological order means successors are already final.
    for &u in order.iter().rev() {
        if let Some(nearest) = succ[u].iter().map(|&v| ranks[v]).min() {
            ranks[u] = nearest - 1;
        }
    }

    let floor = ranks.iter().copied().min().unwrap_or(0);
    for rank in &mut ranks {
        *rank -= floor;
    }

    Ranking {
        ranks,
        edges,
        reversed,
    }
}

/// Reverse every DFS back edge so the edge set becomes acyclic.
///
/// DFS roots and successor visits follow index order, so the same input
/// always reverses the same edges.
fn break_cycles(n: usize, edges: &[(usize, usize)]) -> (Vec<(usize, usize)>, usize) {
    let succ = LayoutGraph::successors(n, edges);
    let mut state = vec![Visit::New; n];
    let mut back: BTreeSet<(usize, usize)> = BTreeSet::new();

    for start in 0..n {
        if state[start] != Visit::New {
            continue;
        }
        state[start] = Visit::Active;
        let mut stack = vec![(start, 0usize)];

        while let Some(frame) = stack.last_mut() {
            let (u, next) = *frame;
            match succ[u].get(next) {
                Some(&v) => {
                    frame.1 += 1;
                    match state[v] {
                        Visit::New => {
                            state[v] = Visit::Active;
                            stack.push((v, 0));
                        }
                        Visit::Active => {
                            back.insert((u, v));
                        }
                        Visit::Done => {}
                    }
                }
                None => {
                    state[u] = Visit::Done;
                    stack.pop();
                }
            }
        }
    }

    let acyclic: IndexSet<(usize, usize)> = edges
        .iter()
        .map(|&(u, v)| if back.contains(&(u, v)) { (v, u) } else { (u, v) })
        .collect();

    (acyclic.into_iter().collect(), back.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use docgraph_core::{GraphEdge, GraphNode};
    use pretty_assertions::assert_eq;

    fn graph(ids: &[&str], edges: &[(&str, &str)]) -> LayoutGraph {
        let nodes: Vec<GraphNode> = ids.iter().map(|id| GraphNode::new(*id, *id)).collect();
        let edges: Vec<GraphEdge> = edges.iter().map(|(s, t)| GraphEdge::new(*s, *t)).collect();
        LayoutGraph::register(&nodes, &edges)
    }

    #[test]
    fn test_tree_ranks_by_depth() {
        let g = graph(
            &["root", "a", "b", "a1"],
            &[("root", "a"), ("root", "b"), ("a", "a1")],
        );
        let ranking = assign_ranks(&g);
        assert_eq!(ranking.ranks, vec![0, 1, 1, 2]);
        assert_eq!(ranking.reversed, 0);
    }

    #[test]
    fn test_longest_path_wins() {
        // root -> x -> y, root -> y: y sits below x.
        let g = graph(&["root", "x", "y"], &[("root", "x"), ("x", "y"), ("root", "y")]);
        assert_eq!(assign_ranks(&g).ranks, vec![0, 1, 2]);
    }

    #[test]
    fn test_tightening_pulls_late_source_down() {
        // s only feeds the deep node d, so it sits right above it.
        let g = graph(
            &["r", "m", "d", "s"],
            &[("r", "m"), ("m", "d"), ("s", "d")],
        );
        assert_eq!(assign_ranks(&g).ranks, vec![0, 1, 2, 1]);
    }

    #[test]
    fn test_isolated_nodes_rank_zero() {
        let g = graph(&["a", "b", "c"], &[("a", "b")]);
        assert_eq!(assign_ranks(&g).ranks, vec![0, 1, 0]);
    }

    #[test]
    fn test_cycle_is_broken() {
        let g = graph(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "a")]);
        let ranking = assign_ranks(&g);

        assert_eq!(ranking.reversed, 1);
        assert_eq!(ranking.ranks, vec![0, 1, 2]);
        for &(u, v) in &ranking.edges {
            assert!(ranking.ranks[v] > ranking.ranks[u]);
        }
    }

    #[test]
    fn test_two_cycle_collapses_to_one_edge() {
        let g = graph(&["a", "b"], &[("a", "b"), ("b", "a")]);
        let ranking = assign_ranks(&g);
        assert_eq!(ranking.edges, vec![(0, 1)]);
        assert_eq!(ranking.ranks, vec![0, 1]);
    }

    #[test]
    fn test_buckets() {
        let g = graph(&["r", "a", "b"], &[("r", "a"), ("r", "b")]);
        let ranking = assign_ranks(&g);
        assert_eq!(ranking.buckets(), vec![vec![0], vec![1, 2]]);
        assert_eq!(ranking.rank_count(), 2);
    }

    #[test]
    fn test_empty_graph() {
        let ranking = assign_ranks(&LayoutGraph::default());
        assert!(ranking.ranks.is_empty());
        assert_eq!(ranking.rank_count(), 0);
    }
}
