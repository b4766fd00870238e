//! The synthesis entry point.

use std::sync::Arc;

use docgraph_core::CandidateGraph;
use tracing::{debug, info, warn};

use crate::config::ModelConfig;
use crate::decode::decode_candidate;
use crate::error::{Result, SynthError};
use crate::prompt::{SynthesisRequest, build_prompt};
use crate::provider::{CompletionRequest, GraphModel, OpenAiChatModel};
use crate::schema::graph_response_schema;

/// Check a credential's shape before it is sent anywhere.
///
/// Absent or blank credentials are missing; embedded whitespace or control
/// characters make one invalid.
pub fn check_credential(credential: Option<&str>) -> Result<&str> {
    let credential = credential
        .filter(|c| !c.trim().is_empty())
        .ok_or(SynthError::MissingCredential)?;

    if credential
        .chars()
        .any(|c| c.is_whitespace() || c.is_control())
    {
        return Err(SynthError::InvalidCredential(
            "credential contains whitespace or control characters".to_string(),
        ));
    }

    Ok(credential)
}

/// Turns prompts into candidate graphs through a [`GraphModel`].
#[derive(Clone)]
pub struct Synthesizer {
    model: Arc<dyn GraphModel>,
}

impl Synthesizer {
    /// Create a synthesizer over any model.
    pub fn new(model: Arc<dyn GraphModel>) -> Self {
        Self { model }
    }

    /// Create a synthesizer backed by an OpenAI-compatible endpoint.
    pub fn openai(config: ModelConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(OpenAiChatModel::new(config)?)))
    }

    /// Name of the underlying model provider.
    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Ask the model for a graph.
    ///
    /// Returns `Ok(None)` when the model answered but the reply is not a
    /// usable graph. Credential problems are reported before any network
    /// traffic.
    pub async fn synthesize(
        &self,
        credential: Option<&str>,
        prompt: &str,
    ) -> Result<Option<CandidateGraph>> {
        let credential = check_credential(credential)?;
        let schema = graph_response_schema();

        let raw = match self
            .model
            .complete(CompletionRequest {
                credential,
                prompt,
                schema: &schema,
            })
            .await
        {
            Ok(raw) => raw,
            Err(SynthError::InvalidResponse(reason)) => {
                warn!("Model {} returned no usable completion: {reason}", self.model.name());
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        match decode_candidate(&raw) {
            Ok(graph) => {
                info!(
                    "Synthesized candidate graph with {} nodes and {} edges",
                    graph.nodes.len(),
                    graph.edges.len()
                );
                Ok(Some(graph))
            }
            Err(e) => {
                warn!("Discarding model reply ({}): {e}", e.tag());
                debug!("Undecodable reply: {raw}");
                Ok(None)
            }
        }
    }

    /// Build the prompt for `request` and synthesize.
    pub async fn synthesize_request(
        &self,
        credential: Option<&str>,
        request: &SynthesisRequest,
    ) -> Result<Option<CandidateGraph>> {
        let prompt = build_prompt(request);
        self.synthesize(credential, &prompt).await
    }
}
