mod components;

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flowcore_engine::run_default;
use flowcore_model::PipelineModel;
use flowcore_registry::ComponentRegistry;
use flowcore_types::ValueBag;
use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// flowcore - a dataflow execution engine for component-based pipelines
#[derive(Parser)]
#[command(name = "flowcore")]
#[command(version, about, long_about = None)]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Validate and run a pipeline, streaming events to stdout as
  /// newline-delimited JSON.
  Run {
    /// Path to the pipeline JSON file.
    pipeline_file: PathBuf,

    /// Path to a JSON file of injected inputs. Reads stdin if omitted.
    #[arg(long)]
    injected: Option<PathBuf>,
  },
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let cli = Cli::parse();

  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async {
    match cli.command {
      Commands::Run { pipeline_file, injected } => run_pipeline(pipeline_file, injected).await,
    }
  })
}

async fn run_pipeline(pipeline_file: PathBuf, injected_file: Option<PathBuf>) -> Result<()> {
  let pipeline_json = tokio::fs::read_to_string(&pipeline_file)
    .await
    .with_context(|| format!("failed to read pipeline file: {}", pipeline_file.display()))?;

  let registry = ComponentRegistry::new();
  components::register_official_components(&registry).context("failed to register official components")?;

  let model = PipelineModel::from_json_str(&pipeline_json, &registry)
    .with_context(|| format!("pipeline in {} failed validation", pipeline_file.display()))?;

  let injected = read_injected_inputs(injected_file).await?;

  let (mut events, handle) = run_default(Arc::new(model), Arc::new(registry), injected, CancellationToken::new());

  while let Some(event) = events.next().await {
    println!("{}", serde_json::to_string(&event)?);
  }

  handle.await.context("execution task panicked")?.context("pipeline run failed")?;
  Ok(())
}

async fn read_injected_inputs(path: Option<PathBuf>) -> Result<ValueBag> {
  let content = match path {
    Some(path) => tokio::fs::read_to_string(&path)
      .await
      .with_context(|| format!("failed to read injected-inputs file: {}", path.display()))?,
    None => read_stdin_if_piped()?,
  };

  if content.trim().is_empty() {
    Ok(ValueBag::new())
  } else {
    serde_json::from_str(&content).context("failed to parse injected inputs as a JSON object of Values")
  }
}

fn read_stdin_if_piped() -> Result<String> {
  if io::stdin().is_terminal() {
    return Ok(String::new());
  }
  let mut input = String::new();
  io::stdin().read_to_string(&mut input).context("failed to read injected inputs from stdin")?;
  Ok(input)
}
