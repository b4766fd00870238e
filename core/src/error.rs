//! Error types for graph acceptance checks.

use thiserror::Error;

/// Result type alias for validation operations.
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Reasons a candidate graph is rejected under the strict policy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// An edge names a node id that is not present in `nodes`.
    #[error("edge {source_id} -> {target_id} references an unknown node")]
    DanglingEdge {
        source_id: String,
        target_id: String,
    },

    /// The edges contain a directed cycle.
    #[error("graph contains a cycle through node {0}")]
    Cycle(String),

    /// A non-empty graph must have exactly one root.
    #[error("expected exactly one root, found {0}")]
    RootCount(usize),
}
