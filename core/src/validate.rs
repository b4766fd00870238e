//! Acceptance checks for synthesized graphs.
//!
//! Decoding already guarantees the `nodes` / `edges` shape. What remains is
//! structural: do edges point at real nodes, is the graph acyclic, is there a
//! single root. The default policy accepts all of these; the strict policy
//! rejects them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ValidationError};
use crate::graph::CandidateGraph;

/// How strictly a candidate graph is checked before layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationPolicy {
    /// Accept any decoded graph.
    #[default]
    Permissive,

    /// Reject dangling edges, cycles and anything but a single root.
    Strict,
}

/// Structural facts about a candidate graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Distinct node ids.
    pub unique_nodes: usize,

    /// Node entries that repeat an earlier id.
    pub duplicate_ids: usize,

    /// Edges with at least one endpoint missing from `nodes`.
    pub dangling_edges: usize,

    /// Distinct nodes with no incoming edge.
    pub roots: usize,

    /// A node on a directed cycle, if any.
    pub cycle_through: Option<String>,
}

impl ValidationReport {
    pub fn has_cycle(&self) -> bool {
        self.cycle_through.is_some()
    }
}

/// Applies a [`ValidationPolicy`] to candidate graphs.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphValidator {
    policy: ValidationPolicy,
}

impl GraphValidator {
    pub fn new(policy: ValidationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ValidationPolicy {
        self.policy
    }

    /// Accept or reject a candidate graph, returning it unchanged on success.
    pub fn validate(&self, graph: CandidateGraph) -> Result<CandidateGraph> {
        let report = self.inspect(&graph);
        debug!(
            nodes = report.unique_nodes,
            duplicates = report.duplicate_ids,
            dangling = report.dangling_edges,
            roots = report.roots,
            cyclic = report.has_cycle(),
            "Inspected candidate graph"
        );

        if self.policy == ValidationPolicy::Permissive {
            return Ok(graph);
        }

        if let Some(edge) = dangling_edges(&graph).next() {
            return Err(ValidationError::DanglingEdge {
                source_id: edge.0.to_string(),
                target_id: edge.1.to_string(),
            });
        }
        if let Some(node) = report.cycle_through {
            return Err(ValidationError::Cycle(node));
        }
        if report.unique_nodes > 0 && report.roots != 1 {
            return Err(ValidationError::RootCount(report.roots));
        }

        Ok(graph)
    }

    /// Collect structural facts without accepting or rejecting.
    pub fn inspect(&self, graph: &CandidateGraph) -> ValidationReport {
        let mut index: IndexMap<&str, usize> = IndexMap::new();
        for node in &graph.nodes {
            let next = index.len();
            index.entry(node.id.as_str()).or_insert(next);
        }
        let n = index.len();

        let mut in_degree = vec![0usize; n];
        let mut successors: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut dangling = 0;
        for edge in &graph.edges {
            match (
                index.get(edge.source_id.as_str()),
                index.get(edge.target_id.as_str()),
            ) {
                (Some(&s), Some(&t)) => {
                    successors[s].push(t);
                    in_degree[t] += 1;
                }
                _ => dangling += 1,
            }
        }

        let roots = in_degree.iter().filter(|&&d| d == 0).count();

        // Kahn: whatever cannot be drained sits on or behind a cycle.
        let mut remaining = in_degree;
        let mut queue: Vec<usize> = (0..n).filter(|&v| remaining[v] == 0).collect();
        let mut head = 0;
        while head < queue.len() {
            let u = queue[head];
            head += 1;
            for &v in &successors[u] {
                remaining[v] -= 1;
                if remaining[v] == 0 {
                    queue.push(v);
                }
            }
        }
        let cycle_through = (queue.len() < n)
            .then(|| (0..n).find(|&v| remaining[v] > 0))
            .flatten()
            .and_then(|v| index.get_index(v))
            .map(|(id, _)| (*id).to_string());

        ValidationReport {
            unique_nodes: n,
            duplicate_ids: graph.nodes.len() - n,
            dangling_edges: dangling,
            roots,
            cycle_through,
        }
    }
}

fn dangling_edges(graph: &CandidateGraph) -> impl Iterator<Item = (&str, &str)> {
    graph
        .edges
        .iter()
        .filter(|e| {
            !graph.nodes.iter().any(|n| n.id == e.source_id)
                || !graph.nodes.iter().any(|n| n.id == e.target_id)
        })
        .map(|e| (e.source_id.as_str(), e.target_id.as_str()))
}
