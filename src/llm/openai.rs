//! OpenAI-compatible chat completions client
//!
//! Async HTTP client for any endpoint speaking the chat completions wire
//! protocol with function calling. Marshals the conversation and tool specs
//! into one request and unmarshals one reply; failures here propagate to the
//! caller (the loop defines no recovery for a dead model endpoint).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::{AgentError, Config, Message, Result, ToolCall, ToolDefinition};
use crate::llm::traits::{ChatOptions, ChatProvider, ChatReply, TokenUsage};

/// Chat completions API client
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

/// Chat completions request body
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    tools: &'a [ToolDefinition],
    tool_choice: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// Chat completions response body
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    model: String,
    #[serde(default)]
    usage: Option<UsageBlock>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

/// Assistant message inside a choice
#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Debug, Deserialize)]
struct UsageBlock {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

impl OpenAiClient {
    /// Create a client from configuration; the API key comes from the environment
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = Config::api_key()?;
        Ok(Self::new(
            &config.api.base_url,
            api_key,
            config.api.timeout_secs,
        ))
    }

    /// Create a client with explicit endpoint settings
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Convert a response into a ChatReply
    fn to_chat_reply(response: ChatResponse) -> Result<ChatReply> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::api("Response contained no choices"))?;

        let usage = response.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(ChatReply {
            content: choice.message.content.unwrap_or_default(),
            tool_calls: choice.message.tool_calls.unwrap_or_default(),
            usage,
            model: response.model,
        })
    }
}

#[async_trait]
impl ChatProvider for OpenAiClient {
    async fn chat_with_tools(
        &self,
        model: &str,
        messages: &[Message],
        tools: &[ToolDefinition],
        options: &ChatOptions,
    ) -> Result<ChatReply> {
        let request = ChatRequest {
            model,
            messages,
            tools,
            tool_choice: "auto",
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    AgentError::api(format!(
                        "Cannot connect to chat endpoint at {}",
                        self.base_url
                    ))
                } else {
                    AgentError::from(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AgentError::api(format!(
                "Chat API error ({}): {}",
                status, error_text
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| AgentError::api(format!("Failed to parse response: {}", e)))?;

        Self::to_chat_reply(chat_response)
    }

    fn name(&self) -> &str {
        "openai"
    }
}
