//! GEOS-Agent - LLM assistant for the GEOS / GEOSX simulation stack
//!
//! Main entry point: runs one agent loop for a single instruction.

use std::sync::Arc;

use clap::Parser;
use geos_agent::{Agent, Config, OpenAiClient, RunLogger, ToolRegistry, Workspace};

/// GEOS-Agent - LLM assistant for the GEOS / GEOSX simulation stack
#[derive(Parser, Debug)]
#[command(name = "geos-agent")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The instruction to give the agent
    #[arg(required = true)]
    instruction: Vec<String>,

    /// Workspace directory the agent operates in
    #[arg(long, short = 'w', default_value = ".")]
    workspace: String,

    /// JSONL run log path (disabled when omitted)
    #[arg(long, short = 'l')]
    log: Option<String>,

    /// Model identifier override
    #[arg(long, short = 'm')]
    model: Option<String>,

    /// Maximum model calls per run
    #[arg(long)]
    max_steps: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Build configuration
    let mut config = Config::load();

    // Apply CLI overrides
    if let Some(ref model) = args.model {
        config.agent.model = model.clone();
    }
    if let Some(max_steps) = args.max_steps {
        config.agent.max_steps = max_steps;
    }

    let workspace = Workspace::open(&args.workspace)?;
    let client = Arc::new(OpenAiClient::from_config(&config)?);
    let registry = ToolRegistry::with_default_tools(&workspace);
    let logger = match args.log {
        Some(path) => RunLogger::to_file(path),
        None => RunLogger::disabled(),
    };

    let instruction = args.instruction.join(" ");
    println!("Workspace: {}", workspace.root().display());
    println!("Instruction: {}", instruction);
    println!();

    let agent = Agent::new(config.agent, client, registry, logger);
    let answer = agent.run(&instruction).await?;
    println!("{}", answer);

    Ok(())
}
