//! Agent module - conversation state, run logging, and the orchestrator loop

pub mod conversation;
pub mod logger;
pub mod orchestrator;

pub use conversation::Conversation;
pub use logger::{LogEvent, RunLogger};
pub use orchestrator::{Agent, DEFAULT_SYSTEM_PROMPT};
