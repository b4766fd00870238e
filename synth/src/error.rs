//! Error types for graph synthesis.

use thiserror::Error;

/// Result type alias for synthesis operations.
pub type Result<T> = std::result::Result<T, SynthError>;

/// Errors that can occur while calling the model.
#[derive(Error, Debug)]
pub enum SynthError {
    /// No credential was configured.
    #[error("model credential is not configured")]
    MissingCredential,

    /// The credential is malformed or was rejected by the provider.
    #[error("model credential is invalid: {0}")]
    InvalidCredential(String),

    /// The provider does not support schema-constrained output.
    #[error("model does not support structured response format: {0}")]
    UnsupportedResponseFormat(String),

    /// Any other non-success reply from the provider.
    #[error("API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    /// The reply envelope carried no usable completion.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

impl SynthError {
    /// Whether the error concerns credential configuration.
    pub fn is_credential(&self) -> bool {
        matches!(self, Self::MissingCredential | Self::InvalidCredential(_))
    }
}

/// Why a model reply could not be decoded into a candidate graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The reply is not JSON.
    #[error("response is not valid JSON: {0}")]
    NotJson(String),

    /// The reply is JSON but not an object.
    #[error("response is not a JSON object")]
    NotAnObject,

    /// A required top-level field is absent or null.
    #[error("response is missing the `{0}` field")]
    MissingField(&'static str),

    /// A top-level field is present but not an array.
    #[error("response field `{0}` is not an array")]
    NotAnArray(&'static str),

    /// A node entry does not match the node shape.
    #[error("node {index} is malformed: {reason}")]
    MalformedNode { index: usize, reason: String },

    /// An edge entry does not match the edge shape.
    #[error("edge {index} is malformed: {reason}")]
    MalformedEdge { index: usize, reason: String },
}

impl DecodeError {
    /// Short stable tag for logs.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::NotJson(_) => "not_json",
            Self::NotAnObject => "not_an_object",
            Self::MissingField(_) => "missing_field",
            Self::NotAnArray(_) => "not_an_array",
            Self::MalformedNode { .. } => "malformed_node",
            Self::MalformedEdge { .. } => "malformed_edge",
        }
    }
}
