//! Market analyst demo: stock, weather, and news tools behind an
//! LLM-planned step sequence.
//!
//! Requires `OPENAI_API_KEY` (or an explicit `--base-url` pointing at any
//! OpenAI-compatible endpoint, e.g. Groq).

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use step_adapters::{LlmPlanner, LlmSynthesizer, OpenAiChatModel, OpenAiConfig};
use step_engine::PlanRunner;
use step_toolkit::{NewsFeedTool, StockPriceTool, WeatherTool};
use step_tools::ToolRegistry;

#[derive(Parser, Debug)]
#[command(about = "Answer market questions with planned tool usage")]
struct Args {
    /// Question to answer.
    #[arg(
        default_value = "Provide me insights on Apple stock for the past 10 days \
                         and tell me whether the coverage in the news supports a \
                         BUY or a SELL."
    )]
    question: String,

    /// Model identifier passed to the provider.
    #[arg(long, default_value = "gpt-4o-mini")]
    model: String,

    /// OpenAI-compatible base URL (e.g. https://api.groq.com/openai/).
    #[arg(long)]
    base_url: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = 60)]
    timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .init();

    let args = Args::parse();

    let mut config = OpenAiConfig::from_env(&args.model)
        .with_timeout(Duration::from_secs(args.timeout))
        .with_default_temperature(0.1);
    if let Some(base_url) = &args.base_url {
        config = config.with_base_url(base_url)?;
    }
    let model = Arc::new(OpenAiChatModel::new(config)?);

    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(StockPriceTool::new()?))?;
    registry.register(Arc::new(WeatherTool::new()?))?;
    registry.register(Arc::new(NewsFeedTool::new()?))?;
    info!(tools = registry.len(), "registry assembled");

    let runner = PlanRunner::new(
        Arc::new(registry),
        Arc::new(LlmPlanner::new(model.clone())),
        Arc::new(LlmSynthesizer::new(model)),
    );

    info!(question = %args.question, "processing question");
    let answer = runner.answer(&args.question).await?;

    println!("{answer}");
    Ok(())
}
