//! GEOS-Agent - LLM assistant for the GEOS / GEOSX simulation stack
//!
//! A single-agent tool-calling loop over an OpenAI-compatible chat endpoint,
//! plus a miner that turns GEOS documentation examples into structured
//! ground-truth records.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, and error handling
//! - **LLM**: Chat provider abstraction with an OpenAI-compatible client
//! - **Tools**: Workspace-rooted tools the model can invoke
//! - **Agent**: Conversation state, run logging, and the orchestrator loop
//! - **Miner**: Documentation example extraction
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use geos_agent::{Agent, Config, OpenAiClient, RunLogger, ToolRegistry, Workspace};
//!
//! #[tokio::main]
//! async fn main() -> geos_agent::Result<()> {
//!     let config = Config::load();
//!     let workspace = Workspace::open("./workspace")?;
//!     let client = Arc::new(OpenAiClient::from_config(&config)?);
//!     let registry = ToolRegistry::with_default_tools(&workspace);
//!     let agent = Agent::new(config.agent, client, registry, RunLogger::disabled());
//!
//!     let answer = agent.run("List the files in the workspace.").await?;
//!     println!("{}", answer);
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod core;
pub mod llm;
pub mod miner;
pub mod tools;

// Re-export commonly used items
pub use agent::{Agent, RunLogger};
pub use core::{AgentError, Config, Message, Result, ToolCall, ToolOutcome};
pub use llm::{ChatProvider, ChatReply, OpenAiClient};
pub use tools::{ToolRegistry, Workspace};
