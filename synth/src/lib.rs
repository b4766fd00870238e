//! # Graph synthesis
//!
//! Sends extracted document text (plus optional conversation context) to a
//! generative model under a fixed output schema, and decodes the reply into
//! a [`CandidateGraph`](docgraph_core::CandidateGraph).
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  SynthesisRequest ──► build_prompt ──► GraphModel ──► raw JSON  │
//! │                                            │              │     │
//! │                       graph_response_schema┘              ▼     │
//! │                                              decode_candidate   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The model is untrusted: anything that does not decode into the schema
//! shape is reported as "no graph", never as an empty graph.

pub mod config;
pub mod decode;
pub mod error;
pub mod prompt;
pub mod provider;
pub mod schema;
pub mod synthesizer;

pub use config::ModelConfig;
pub use decode::decode_candidate;
pub use error::{DecodeError, Result, SynthError};
pub use prompt::{SynthesisRequest, build_prompt};
pub use provider::{CompletionRequest, GraphModel, OpenAiChatModel};
pub use schema::graph_response_schema;
pub use synthesizer::{Synthesizer, check_credential};
