//! LLM module - chat provider abstraction and the OpenAI-compatible client

pub mod openai;
pub mod traits;

pub use openai::OpenAiClient;
pub use traits::{ChatOptions, ChatProvider, ChatReply, TokenUsage};
