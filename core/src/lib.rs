//! # docgraph core
//!
//! Shared vocabulary for the document-to-graph pipeline:
//!
//! - **Graph model**: `GraphNode`, `GraphEdge`, `CandidateGraph` and their
//!   laid-out counterparts `LayoutNode` / `LaidOutGraph`
//! - **Conversation context**: prior chat turns fed to synthesis
//! - **Validation**: acceptance checks applied to a synthesized graph
//!
//! ## Data flow
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  files ──► text ──► CandidateGraph ──► GraphValidator           │
//! │                                             │                   │
//! │                                             ▼                   │
//! │                 display ◄── LaidOutGraph ◄── layout             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod conversation;
pub mod error;
pub mod graph;
pub mod validate;

pub use conversation::{ConversationTurn, Role};
pub use error::{Result, ValidationError};
pub use graph::{
    AnchorSide, CandidateGraph, Direction, GraphEdge, GraphNode, LaidOutGraph, LayoutNode,
};
pub use validate::{GraphValidator, ValidationPolicy, ValidationReport};
