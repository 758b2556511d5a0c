//! Chat provider trait for abstracting the model endpoint
//!
//! One blocking request per turn: the whole conversation plus the tool
//! definitions go out, one reply comes back. No retry, no streaming. The
//! seam exists so tests can drive the agent loop with a scripted provider.

use async_trait::async_trait;

use crate::core::{Message, Result, ToolCall, ToolDefinition};

/// Reply from a chat provider
#[derive(Debug, Clone)]
pub struct ChatReply {
    /// Text content of the reply (empty when the model returned none)
    pub content: String,
    /// Tool calls the model wants executed, in request order
    pub tool_calls: Vec<ToolCall>,
    /// Token usage information, when reported
    pub usage: Option<TokenUsage>,
    /// Model that generated the reply
    pub model: String,
}

/// Token usage information
#[derive(Debug, Clone, Default)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Sampling options sent with every request
#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    /// Temperature for sampling
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
}

/// Trait for chat completion providers
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send the conversation and tool definitions, get one reply back
    async fn chat_with_tools(
        &self,
        model: &str,
        messages: &[Message],
        tools: &[ToolDefinition],
        options: &ChatOptions,
    ) -> Result<ChatReply>;

    /// Get the provider name
    fn name(&self) -> &str;
}
