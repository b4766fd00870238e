//! # Generation pipeline
//!
//! Drives one document-to-graph generation through its phases and
//! publishes progress.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                            Orchestrator                              │
//! │                                                                      │
//! │  Idle ──► Extracting ──► Synthesizing ──► LayingOut ──► Ready        │
//! │              │                │               │                      │
//! │              └────────────────┴───────────────┴──────► Failed        │
//! │                                                                      │
//! │  ContentExtractor     Synthesizer (spawned)   GraphValidator, layout │
//! └──────────────────────────────────────────────────────────────────────┘
//!        │ watch: Arc<GenerationResult>        │ broadcast: PipelineEvent
//!        ▼                                     ▼
//!     display                              progress log
//! ```
//!
//! Only one generation runs at a time. `reset` returns a finished run to
//! `Idle`; a run still in flight is detached and never published again.

pub mod config;
pub mod error;
pub mod event;
pub mod orchestrator;
pub mod state;

pub use config::PipelineConfig;
pub use error::{ConfigError, FailureReason, PipelineError, Result};
pub use event::{EventKind, PipelineEvent};
pub use orchestrator::Orchestrator;
pub use state::{GenerationRequest, GenerationResult, GenerationState};
