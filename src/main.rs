use std::path::PathBuf;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use triage_agent::{build_triage_graph, TriageNode, TriageState};
use triage_core::config::AppConfig;
use triage_llm::apply_env_credentials;

#[derive(Parser)]
#[command(
    name = "triage",
    version,
    about = "Classify a user message by intent, sentiment, and PII presence"
)]
struct Cli {
    /// Path to an optional TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Query to classify (defaults to the configured sample query)
    query: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real environment variables still apply.
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("triage=info,warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if apply_env_credentials(&mut config.model) {
        debug!(provider = %config.model.provider, "API key taken from environment");
    }

    let triage = TriageNode::from_config(config.model)?;
    let graph = build_triage_graph(triage)?;

    let state = TriageState::new(cli.query.unwrap_or(config.run.user_query));
    let final_state = graph.invoke(state).await?;

    println!("{}", serde_json::to_string(&final_state)?);
    Ok(())
}
