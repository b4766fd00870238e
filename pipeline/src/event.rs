//! Discrete pipeline events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::FailureReason;
use crate::state::GenerationState;

/// One thing that happened during a generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineEvent {
    /// Run the event belongs to.
    pub run_id: Uuid,

    /// When the event was emitted.
    pub timestamp: DateTime<Utc>,

    /// What happened.
    #[serde(flatten)]
    pub kind: EventKind,
}

impl PipelineEvent {
    /// Create an event stamped now.
    pub fn new(run_id: Uuid, kind: EventKind) -> Self {
        Self {
            run_id,
            timestamp: Utc::now(),
            kind,
        }
    }
}

/// Kinds of [`PipelineEvent`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EventKind {
    /// A run began.
    Started { files: usize },

    /// The published state changed.
    StateChanged { state: GenerationState },

    /// All documents were extracted.
    ExtractionComplete { documents: usize, truncated: usize },

    /// The model returned a candidate graph.
    SynthesisComplete { nodes: usize, edges: usize },

    /// The graph was laid out.
    LayoutComplete { nodes: usize, ranks: usize },

    /// The run failed.
    Failed {
        reason: FailureReason,
        message: String,
    },

    /// The display was reset to idle.
    Reset,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_event_json_shape() {
        let event = PipelineEvent::new(
            Uuid::nil(),
            EventKind::SynthesisComplete { nodes: 4, edges: 3 },
        );
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["event"], "synthesis_complete");
        assert_eq!(json["nodes"], 4);
        assert_eq!(json["run_id"], "00000000-0000-0000-0000-000000000000");
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_state_changed_nests_state() {
        let event = PipelineEvent::new(
            Uuid::nil(),
            EventKind::StateChanged {
                state: GenerationState::LayingOut,
            },
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["state"]["state"], "laying_out");
    }
}
