use anyhow::{bail, Context, Result};
use artiscore_rs::{
  llm::openai::{LlmClient, LlmSettings},
  pipeline::{Evaluator, DEFAULT_CONCURRENCY},
  render::render_report,
  server::{run_server, EMPTY_PROFILE_MESSAGE},
  telemetry::init_tracing,
  CategorizedRecord, DimensionKey,
};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::sync::Arc;
use tracing::Level;

#[derive(Parser)]
#[command(name="artiscore", version, about="Score artist profiles on Reach, Magnitude and Impact")]
struct Cli {
  #[command(subcommand)]
  cmd: Cmd,
  #[arg(long, env="OPENAI_API_KEY", hide_env_values=true)] api_key: Option<String>,
  /// OpenAI-compatible API base, e.g. http://localhost:8000/v1
  #[arg(long, env="OPENAI_BASE_URL")] base_url: Option<String>,
  /// Model for every agent (default gpt-4o-mini)
  #[arg(long)] model: Option<String>,
  /// Sampling temperature for every agent (default 0.7)
  #[arg(long)] temperature: Option<f32>,
  #[arg(long)] timeout_secs: Option<u64>,
  /// Dimensions evaluated in parallel
  #[arg(long, default_value_t=DEFAULT_CONCURRENCY)] concurrency: usize,
  #[arg(long)] json_logs: bool,
}

#[derive(Subcommand)]
enum Cmd {
  /// End-to-end: extract -> score for all three dimensions
  Evaluate { #[arg(long)] input_file: Option<String>, #[arg(long)] json: bool },
  /// Run one dimension's extractor and print the categorized record
  Extract { #[arg(long)] dimension: DimensionKey, #[arg(long)] input_file: Option<String> },
  /// Score a categorized record (JSON) for one dimension
  Score { #[arg(long)] dimension: DimensionKey, #[arg(long)] input_file: Option<String> },
  /// Serve POST /evaluate
  Serve { #[arg(long, default_value="127.0.0.1:8080")] addr: String },
}

fn read_input(path: Option<&str>) -> Result<String> {
  match path {
    Some(p) => std::fs::read_to_string(p).with_context(|| format!("reading {p}")),
    None => {
      let mut buf = String::new();
      std::io::stdin().read_to_string(&mut buf).context("reading stdin")?;
      Ok(buf)
    }
  }
}

fn read_profile(path: Option<&str>) -> Result<String> {
  let text = read_input(path)?;
  if text.trim().is_empty() { bail!(EMPTY_PROFILE_MESSAGE); }
  Ok(text)
}

#[tokio::main]
async fn main() -> Result<()> {
  dotenvy::dotenv().ok();
  let cli = Cli::parse();
  init_tracing(cli.json_logs, Level::INFO);

  if cli.api_key.is_none() {
    tracing::warn!("OPENAI_API_KEY is not set; oracle calls will fail to authenticate");
  }
  let settings = LlmSettings { api_key: cli.api_key, base_url: cli.base_url, timeout_secs: cli.timeout_secs };
  let llm = LlmClient::new(settings)?;
  let evaluator = Evaluator::with_overrides(Arc::new(llm), cli.model.as_deref(), cli.temperature)
    .with_concurrency(cli.concurrency);

  match cli.cmd {
    Cmd::Evaluate { input_file, json } => {
      let profile = read_profile(input_file.as_deref())?;
      let report = evaluator.evaluate(&profile).await?;
      if json { println!("{}", serde_json::to_string_pretty(&report)?); }
      else { print!("{}", render_report(&report)?); }
    }
    Cmd::Extract { dimension, input_file } => {
      let profile = read_profile(input_file.as_deref())?;
      let record = evaluator.agents(dimension).extractor.run(&profile).await?;
      println!("{}", serde_json::to_string_pretty(&record)?);
    }
    Cmd::Score { dimension, input_file } => {
      let record: CategorizedRecord = serde_json::from_str(&read_input(input_file.as_deref())?)
        .context("input must be a JSON object")?;
      let score = evaluator.agents(dimension).scorer.run(&record).await?;
      println!("{}", serde_json::to_string_pretty(&score)?);
    }
    Cmd::Serve { addr } => run_server(evaluator, &addr).await?,
  }
  Ok(())
}
