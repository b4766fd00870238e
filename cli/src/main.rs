//! `docgraph`: turn documents into a laid-out knowledge graph.
//!
//! ```text
//! docgraph notes.pdf summary.docx --question "How does borrowing work?" \
//!     --direction across --output graph.json --events
//! ```
//!
//! The graph is printed as JSON on stdout (or written to `--output`); logs
//! and `--events` lines go to stderr.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use docgraph_core::{ConversationTurn, Direction, ValidationPolicy};
use docgraph_extract::Document;
use docgraph_pipeline::{
    GenerationRequest, Orchestrator, PipelineConfig, PipelineError, PipelineEvent,
};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "docgraph")]
#[command(about = "Generate a laid-out knowledge graph from documents")]
#[command(version)]
struct Cli {
    /// Documents to map (PDF, Word .docx or plain text)
    files: Vec<PathBuf>,

    /// The question the graph should answer
    #[arg(short, long)]
    question: Option<String>,

    /// File holding an answer to map as the primary source
    #[arg(long)]
    answer_file: Option<PathBuf>,

    /// JSON array of prior turns: [{"role": "user", "content": "..."}]
    #[arg(long)]
    history_file: Option<PathBuf>,

    /// Layout direction (overrides the configuration file)
    #[arg(short, long, value_enum)]
    direction: Option<DirectionArg>,

    /// Configuration file (defaults to the platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the graph here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print pipeline events as JSON lines on stderr
    #[arg(long)]
    events: bool,

    /// Reject dangling edges, cycles and graphs without a single root
    #[arg(long)]
    strict: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DirectionArg {
    Down,
    Across,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Down => Direction::Down,
            DirectionArg::Across => Direction::Across,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = build_config(&cli)?;
    let request = build_request(&cli)?;

    let orchestrator = Orchestrator::new(config)?;
    let event_log = cli.events.then(|| spawn_event_log(orchestrator.subscribe()));

    let outcome = orchestrator.generate(request).await;

    // Dropping the orchestrator closes the event channel so the log drains.
    drop(orchestrator);
    if let Some(handle) = event_log
        && let Err(e) = handle.await
    {
        warn!("Event log task failed: {e}");
    }

    let result = match outcome {
        Ok(result) => result,
        Err(PipelineError::Failed(reason)) => {
            if let Some(detail) = reason.detail() {
                debug!("Failure detail: {detail}");
            }
            anyhow::bail!("{reason}");
        }
        Err(e) => return Err(e.into()),
    };

    let graph = result
        .graph
        .as_ref()
        .context("generation finished without a graph")?;
    let json = serde_json::to_string_pretty(graph)?;

    match &cli.output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{json}"),
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(cli: &Cli) -> Result<PipelineConfig> {
    let mut config = PipelineConfig::load(cli.config.as_deref())?;
    if let Some(direction) = cli.direction {
        config.layout.direction = direction.into();
    }
    if cli.strict {
        config.validation = ValidationPolicy::Strict;
    }
    Ok(config)
}

fn build_request(cli: &Cli) -> Result<GenerationRequest> {
    let files = cli
        .files
        .iter()
        .map(|path| {
            Document::from_path(path).with_context(|| format!("failed to read {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut request = GenerationRequest::new(files);
    if let Some(question) = &cli.question {
        request = request.with_question(question.clone());
    }
    if let Some(path) = &cli.answer_file {
        request = request.with_answer(read_text(path)?);
    }
    if let Some(path) = &cli.history_file {
        let history: Vec<ConversationTurn> = serde_json::from_str(&read_text(path)?)
            .with_context(|| format!("{} is not a JSON array of turns", path.display()))?;
        request = request.with_history(history);
    }
    Ok(request)
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn spawn_event_log(mut events: broadcast::Receiver<PipelineEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(line) => eprintln!("{line}"),
                    Err(e) => warn!("Failed to serialize event: {e}"),
                },
                Err(RecvError::Lagged(skipped)) => warn!("Event log skipped {skipped} events"),
                Err(RecvError::Closed) => break,
            }
        }
    })
}
