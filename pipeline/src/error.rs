//! Error types for the generation pipeline.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors returned to callers of the orchestrator.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A generation is already running.
    #[error("a generation is already in progress")]
    Busy,

    /// The generation ran and failed; the state holds the same reason.
    #[error("{0}")]
    Failed(FailureReason),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The model client could not be constructed.
    #[error("model client error: {0}")]
    Model(#[from] docgraph_synth::SynthError),
}

/// Errors loading [`PipelineConfig`](crate::PipelineConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for the configuration shape.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Why a generation ended in `Failed`.
///
/// [`Display`](fmt::Display) gives the one message meant for end users;
/// [`FailureReason::detail`] keeps the underlying cause for logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    /// The request carried no files.
    NoInput,

    /// The model credential is missing, malformed or rejected.
    Credential { detail: String },

    /// The configured model does not support schema-constrained output.
    UnsupportedModel { detail: String },

    /// The model answered without a usable graph.
    NoGraph,

    /// The strict validator rejected the graph.
    Rejected { detail: String },

    /// Anything else, including a panicked or cancelled task.
    Unexpected { detail: String },
}

impl FailureReason {
    /// Underlying cause, when there is one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::NoInput | Self::NoGraph => None,
            Self::Credential { detail }
            | Self::UnsupportedModel { detail }
            | Self::Rejected { detail }
            | Self::Unexpected { detail } => Some(detail),
        }
    }

    pub(crate) fn unexpected(detail: impl fmt::Display) -> Self {
        Self::Unexpected {
            detail: detail.to_string(),
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::NoInput => "Select at least one document to generate a mind map.",
            Self::Credential { .. } => {
                "The model API key is missing or invalid. Check your configuration and try again."
            }
            Self::UnsupportedModel { .. } => {
                "The configured model does not support structured JSON output. Choose a model that does and try again."
            }
            Self::NoGraph => "The model returned an empty or malformed mind map. Please try again.",
            Self::Rejected { .. } => {
                "The generated mind map did not pass validation. Please try again."
            }
            Self::Unexpected { .. } => {
                "Something went wrong while generating the mind map. Please try again."
            }
        };
        f.write_str(message)
    }
}
