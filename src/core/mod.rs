//! Core module - shared types, configuration, and error handling

pub mod config;
pub mod error;
pub mod types;

pub use config::{AgentSettings, ApiConfig, Config, API_KEY_VAR};
pub use error::{AgentError, Result};
pub use types::{
    FunctionCall, FunctionDefinition, Message, ToolCall, ToolDefinition, ToolError, ToolErrorKind,
    ToolOutcome,
};
