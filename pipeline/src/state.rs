//! Generation state and the value published to observers.

use std::fmt;

use docgraph_core::{ConversationTurn, LaidOutGraph};
use docgraph_extract::{Document, ExtractedText};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::FailureReason;

/// Where a generation currently is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GenerationState {
    #[default]
    Idle,
    Extracting,
    Synthesizing,
    LayingOut,
    Ready,
    Failed {
        reason: FailureReason,
    },
}

impl GenerationState {
    /// Whether a run is in progress.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Extracting | Self::Synthesizing | Self::LayingOut)
    }

    /// Whether the run has finished, successfully or not.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Ready | Self::Failed { .. })
    }

    /// Whether moving from `self` to `next` is legal.
    ///
    /// `Idle -> Extracting -> Synthesizing -> LayingOut -> Ready`, any active
    /// state may fail, and finished states return to `Idle`.
    pub fn can_transition_to(&self, next: &GenerationState) -> bool {
        match (self, next) {
            (Self::Idle, Self::Extracting)
            | (Self::Extracting, Self::Synthesizing)
            | (Self::Synthesizing, Self::LayingOut)
            | (Self::LayingOut, Self::Ready) => true,
            (from, Self::Failed { .. }) => from.is_active(),
            (from, Self::Idle) => from.is_terminal(),
            _ => false,
        }
    }

    /// Stable lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Extracting => "extracting",
            Self::Synthesizing => "synthesizing",
            Self::LayingOut => "laying_out",
            Self::Ready => "ready",
            Self::Failed { .. } => "failed",
        }
    }
}

impl fmt::Display for GenerationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Input to one generation.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    /// Uploaded files, in display order.
    pub files: Vec<Document>,

    /// The user's original question.
    pub question: Option<String>,

    /// Prior conversation, oldest first.
    pub history: Vec<ConversationTurn>,

    /// An answer to map instead of only the documents.
    pub answer: Option<String>,
}

impl GenerationRequest {
    /// A request over `files` with no conversation context.
    pub fn new(files: Vec<Document>) -> Self {
        Self {
            files,
            ..Self::default()
        }
    }

    /// Set the original question.
    pub fn with_question(mut self, question: impl Into<String>) -> Self {
        self.question = Some(question.into());
        self
    }

    /// Set the prior conversation.
    pub fn with_history(mut self, history: Vec<ConversationTurn>) -> Self {
        self.history = history;
        self
    }

    /// Set the answer to map.
    pub fn with_answer(mut self, answer: impl Into<String>) -> Self {
        self.answer = Some(answer.into());
        self
    }
}

/// The observable outcome of the latest generation, replaced as a whole on
/// every change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Run that produced this value; `None` while idle.
    pub run_id: Option<Uuid>,

    /// Current state.
    #[serde(flatten)]
    pub state: GenerationState,

    /// Laid-out graph, present only when `Ready`.
    pub graph: Option<LaidOutGraph>,

    /// Extracted documents of the run, once extraction finished.
    pub documents: Vec<ExtractedText>,
}

impl GenerationResult {
    /// The idle value.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Copy of `self` moved to `state`.
    pub(crate) fn with_state(&self, state: GenerationState) -> Self {
        Self {
            state,
            ..self.clone()
        }
    }
}
