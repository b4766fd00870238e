//! The generation orchestrator.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use docgraph_core::GraphValidator;
use docgraph_extract::ContentExtractor;
use docgraph_layout::layout_with_stats;
use docgraph_synth::{SynthError, SynthesisRequest, Synthesizer, build_prompt, check_credential};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::PipelineConfig;
use crate::error::{FailureReason, PipelineError, Result};
use crate::event::{EventKind, PipelineEvent};
use crate::state::{GenerationRequest, GenerationResult, GenerationState};

const EVENT_CAPACITY: usize = 64;

/// Runs one generation at a time and publishes its progress.
///
/// State is published as a whole [`GenerationResult`] over a watch channel;
/// discrete progress goes out as [`PipelineEvent`]s on a broadcast channel.
pub struct Orchestrator {
    config: PipelineConfig,
    extractor: ContentExtractor,
    synthesizer: Synthesizer,
    validator: GraphValidator,
    busy: AtomicBool,
    /// Bumped by every reset; runs started under an older epoch are detached.
    epoch: AtomicU64,
    state: watch::Sender<Arc<GenerationResult>>,
    events: broadcast::Sender<PipelineEvent>,
}

/// Identity of one in-flight generation.
struct Run {
    id: Uuid,
    epoch: u64,
}

/// Releases the busy flag when a generation ends, however it ends.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Orchestrator {
    /// Create an orchestrator talking to the configured model endpoint.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let synthesizer = Synthesizer::openai(config.model.clone())?;
        Ok(Self::with_synthesizer(config, synthesizer))
    }

    /// Create an orchestrator around an existing synthesizer.
    pub fn with_synthesizer(config: PipelineConfig, synthesizer: Synthesizer) -> Self {
        let (state, _) = watch::channel(Arc::new(GenerationResult::idle()));
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            extractor: ContentExtractor::new(config.extract.clone()),
            validator: GraphValidator::new(config.validation),
            config,
            synthesizer,
            busy: AtomicBool::new(false),
            epoch: AtomicU64::new(0),
            state,
            events,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The latest published result.
    pub fn current(&self) -> Arc<GenerationResult> {
        self.state.borrow().clone()
    }

    /// Watch the published result.
    pub fn subscribe_state(&self) -> watch::Receiver<Arc<GenerationResult>> {
        self.state.subscribe()
    }

    /// Receive discrete pipeline events.
    pub fn subscribe(&self) -> broadcast::Receiver<PipelineEvent> {
        self.events.subscribe()
    }

    /// Whether a generation is running (including a detached one).
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Run one generation.
    ///
    /// Returns [`PipelineError::Busy`] without touching state when another
    /// generation is running. A failed run is published as
    /// `Failed(reason)` and returned as [`PipelineError::Failed`].
    pub async fn generate(&self, request: GenerationRequest) -> Result<Arc<GenerationResult>> {
        let _guard = self.claim()?;
        let run = Run {
            id: Uuid::new_v4(),
            epoch: self.epoch.load(Ordering::Acquire),
        };
        info!(run_id = %run.id, files = request.files.len(), "Starting generation");
        self.emit(
            &run,
            EventKind::Started {
                files: request.files.len(),
            },
        );

        let mut result = GenerationResult {
            run_id: Some(run.id),
            ..GenerationResult::idle()
        };

        match self.execute(&run, &mut result, request).await {
            Ok(published) => {
                info!(run_id = %run.id, "Generation ready");
                Ok(published)
            }
            Err(reason) => {
                warn!(
                    run_id = %run.id,
                    detail = reason.detail().unwrap_or_default(),
                    "Generation failed: {reason}"
                );
                self.advance(
                    &run,
                    &mut result,
                    GenerationState::Failed {
                        reason: reason.clone(),
                    },
                );
                self.emit(
                    &run,
                    EventKind::Failed {
                        message: reason.to_string(),
                        reason: reason.clone(),
                    },
                );
                Err(PipelineError::Failed(reason))
            }
        }
    }

    /// Return to `Idle`, discarding the held graph.
    ///
    /// A generation still in flight keeps running, but nothing it does
    /// afterwards is published.
    pub fn reset(&self) {
        let mut previous = None;
        self.state.send_modify(|current| {
            self.epoch.fetch_add(1, Ordering::AcqRel);
            previous = current.run_id;
            *current = Arc::new(GenerationResult::idle());
        });
        info!("Display reset");
        let _ = self.events.send(PipelineEvent::new(
            previous.unwrap_or_else(Uuid::nil),
            EventKind::Reset,
        ));
    }

    fn claim(&self) -> Result<BusyGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| PipelineError::Busy)?;
        Ok(BusyGuard(&self.busy))
    }

    async fn execute(
        &self,
        run: &Run,
        result: &mut GenerationResult,
        request: GenerationRequest,
    ) -> std::result::Result<Arc<GenerationResult>, FailureReason> {
        self.advance(run, result, GenerationState::Extracting);

        if request.files.is_empty() {
            return Err(FailureReason::NoInput);
        }
        let credential = check_credential(self.config.api_key.as_deref())
            .map_err(synthesis_failure)?
            .to_string();

        let GenerationRequest {
            files,
            question,
            history,
            answer,
        } = request;

        let documents = self.extractor.extract_all(files).await;
        self.emit(
            run,
            EventKind::ExtractionComplete {
                documents: documents.len(),
                truncated: documents.iter().filter(|d| d.truncated).count(),
            },
        );
        result.documents = documents;

        self.advance(run, result, GenerationState::Synthesizing);
        let prompt = build_prompt(&SynthesisRequest {
            question,
            history,
            answer,
            documents: result.documents.clone(),
        });
        let synthesizer = self.synthesizer.clone();
        let task =
            tokio::spawn(async move { synthesizer.synthesize(Some(&credential), &prompt).await });

        let candidate = match task.await {
            Ok(Ok(Some(graph))) => graph,
            Ok(Ok(None)) => return Err(FailureReason::NoGraph),
            Ok(Err(e)) => return Err(synthesis_failure(e)),
            Err(e) => {
                return Err(FailureReason::unexpected(format!(
                    "synthesis task did not complete: {e}"
                )));
            }
        };
        self.emit(
            run,
            EventKind::SynthesisComplete {
                nodes: candidate.nodes.len(),
                edges: candidate.edges.len(),
            },
        );

        let graph = self
            .validator
            .validate(candidate)
            .map_err(|e| FailureReason::Rejected {
                detail: e.to_string(),
            })?;

        self.advance(run, result, GenerationState::LayingOut);
        let (laid_out, stats) = layout_with_stats(&graph.nodes, &graph.edges, &self.config.layout);
        self.emit(
            run,
            EventKind::LayoutComplete {
                nodes: stats.nodes,
                ranks: stats.ranks,
            },
        );
        result.graph = Some(laid_out);

        Ok(self.advance(run, result, GenerationState::Ready))
    }

    /// Move `result` to `next` and publish it unless the run was detached.
    ///
    /// Returns the snapshot handed to watchers.
    fn advance(
        &self,
        run: &Run,
        result: &mut GenerationResult,
        next: GenerationState,
    ) -> Arc<GenerationResult> {
        if !result.state.can_transition_to(&next) {
            warn!(run_id = %run.id, "Unexpected transition {} -> {next}", result.state);
        }
        result.state = next;

        let snapshot = Arc::new(result.clone());
        let published = self.state.send_if_modified(|current| {
            if self.epoch.load(Ordering::Acquire) != run.epoch {
                return false;
            }
            *current = Arc::clone(&snapshot);
            true
        });

        if published {
            debug!(run_id = %run.id, state = %result.state, "State changed");
            self.emit(
                run,
                EventKind::StateChanged {
                    state: result.state.clone(),
                },
            );
        } else {
            debug!(run_id = %run.id, state = %result.state, "Detached run; state not published");
        }
        snapshot
    }

    fn emit(&self, run: &Run, kind: EventKind) {
        if self.epoch.load(Ordering::Acquire) != run.epoch {
            return;
        }
        // No subscribers is not an error.
        let _ = self.events.send(PipelineEvent::new(run.id, kind));
    }
}

fn synthesis_failure(error: SynthError) -> FailureReason {
    if error.is_credential() {
        FailureReason::Credential {
            detail: error.to_string(),
        }
    } else if matches!(error, SynthError::UnsupportedResponseFormat(_)) {
        FailureReason::UnsupportedModel {
            detail: error.to_string(),
        }
    } else {
        FailureReason::unexpected(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use docgraph_extract::{Document, document::MIME_TEXT};
    use docgraph_synth::{CompletionRequest, GraphModel};
    use pretty_assertions::assert_eq;

    struct FixedModel(&'static str);

    #[async_trait]
    impl GraphModel for FixedModel {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn complete(&self, _request: CompletionRequest<'_>) -> docgraph_synth::Result<String> {
            Ok(self.0.to_string())
        }
    }

    fn orchestrator(reply: &'static str) -> Orchestrator {
        Orchestrator::with_synthesizer(
            PipelineConfig::default().with_api_key("sk-test"),
            Synthesizer::new(Arc::new(FixedModel(reply))),
        )
    }

    fn text_file() -> Document {
        Document::new("notes.txt", MIME_TEXT, b"Ownership and borrowing".to_vec())
    }

    #[tokio::test]
    async fn test_ready_holds_graph() {
        let orchestrator = orchestrator(
            r#"{"nodes": [{"id": "r", "label": "Root", "parent": null}], "edges": []}"#,
        );
        let result = orchestrator
            .generate(GenerationRequest::new(vec![text_file()]))
            .await
            .unwrap();

        assert_eq!(result.state, GenerationState::Ready);
        assert_eq!(result.graph.as_ref().map(|g| g.nodes.len()), Some(1));
        assert_eq!(orchestrator.current().state, GenerationState::Ready);
        assert!(!orchestrator.is_busy());
    }

    #[tokio::test]
    async fn test_no_input_fails() {
        let orchestrator = orchestrator("{}");
        let err = orchestrator
            .generate(GenerationRequest::default())
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Failed(FailureReason::NoInput)));
        assert_eq!(
            orchestrator.current().state,
            GenerationState::Failed {
                reason: FailureReason::NoInput
            }
        );
    }

    #[tokio::test]
    async fn test_undecodable_reply_fails_without_graph() {
        let orchestrator = orchestrator("not a graph");
        let err = orchestrator
            .generate(GenerationRequest::new(vec![text_file()]))
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Failed(FailureReason::NoGraph)));
        assert!(orchestrator.current().graph.is_none());
    }

    #[tokio::test]
    async fn test_reset_returns_to_idle() {
        let orchestrator = orchestrator(r#"{"nodes": [], "edges": []}"#);
        orchestrator
            .generate(GenerationRequest::new(vec![text_file()]))
            .await
            .unwrap();

        orchestrator.reset();
        let current = orchestrator.current();
        assert_eq!(current.state, GenerationState::Idle);
        assert!(current.graph.is_none());
        assert_eq!(current.run_id, None);
    }

    #[test]
    fn test_synthesis_failure_mapping() {
        assert!(matches!(
            synthesis_failure(SynthError::MissingCredential),
            FailureReason::Credential { .. }
        ));
        assert!(matches!(
            synthesis_failure(SynthError::UnsupportedResponseFormat("x".to_string())),
            FailureReason::UnsupportedModel { .. }
        ));
        assert!(matches!(
            synthesis_failure(SynthError::Api {
                status: 500,
                message: "down".to_string()
            }),
            FailureReason::Unexpected { .. }
        ));
    }
}
