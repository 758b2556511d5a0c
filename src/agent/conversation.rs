//! Conversation history for a single agent run
//!
//! Each run owns a fresh history seeded with the system prompt and the user
//! input. Runs never see each other's messages.

use crate::core::{Message, ToolCall};

/// Ordered message history sent to the model on every step
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Start a run: exactly [system, user]
    pub fn begin(system_prompt: impl Into<String>, user_input: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system_prompt), Message::user(user_input)],
        }
    }

    /// Append the model's reply, keeping any tool calls it made
    pub fn push_assistant(&mut self, content: impl Into<String>, tool_calls: Vec<ToolCall>) {
        self.messages
            .push(Message::assistant_with_tools(content, tool_calls));
    }

    /// Append a tool result answering a specific call
    pub fn push_tool(&mut self, tool_call_id: impl Into<String>, content: impl Into<String>) {
        self.messages.push(Message::tool(tool_call_id, content));
    }

    /// The full history, in order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Content of the most recent assistant message, if any
    pub fn last_assistant_content(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == "assistant")
            .map(|m| m.content.as_str())
    }
}
