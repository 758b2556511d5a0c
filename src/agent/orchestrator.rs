//! Agent orchestrator - the bounded tool-calling loop
//!
//! One `run` handles one high-level user instruction. The loop alternates
//! model calls and tool dispatch until the model answers without tool calls
//! or the step budget runs out. Model-call failures are hard failures; tool
//! failures are values the model gets to read and react to.

use std::sync::Arc;

use serde_json::Value;

use crate::agent::conversation::Conversation;
use crate::agent::logger::{content_preview, result_preview, LogEvent, RunLogger};
use crate::core::{AgentSettings, Result, ToolCall, ToolErrorKind, ToolOutcome};
use crate::llm::{ChatOptions, ChatProvider};
use crate::tools::ToolRegistry;

/// Default instructions sent as the system message on every run
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are GEOS-Agent, an expert assistant for the GEOS / GEOSX software.
- You can inspect and edit files in the workspace.
- You can run shell commands and short Python snippets.
- For now, GEOS itself and documentation search are partially stubbed; \
if a tool response says it's a stub, explain what *should* happen and \
suggest concrete next steps.
- Prefer small, incremental changes to files rather than massive rewrites.
- Always explain what you are doing and why, especially before running \
any shell commands.
- Treat all paths as relative to the workspace root unless explicitly \
told otherwise.";

/// Drives the conversation with the model and dispatches its tool calls
pub struct Agent {
    settings: AgentSettings,
    system_prompt: String,
    client: Arc<dyn ChatProvider>,
    registry: ToolRegistry,
    logger: RunLogger,
}

impl Agent {
    pub fn new(
        settings: AgentSettings,
        client: Arc<dyn ChatProvider>,
        registry: ToolRegistry,
        logger: RunLogger,
    ) -> Self {
        Self {
            settings,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            client,
            registry,
            logger,
        }
    }

    /// Replace the default system prompt
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Run the loop for a single user instruction
    ///
    /// Returns the model's final answer. When the step budget is exhausted
    /// the most recent assistant content is returned instead of an error.
    pub async fn run(&self, user_input: &str) -> Result<String> {
        let mut conversation = Conversation::begin(&self.system_prompt, user_input);
        self.logger.log(&LogEvent::UserInput {
            content: user_input.to_string(),
        });

        let definitions = self.registry.definitions();
        let options = ChatOptions {
            temperature: Some(self.settings.temperature),
            max_tokens: Some(self.settings.max_tokens),
        };

        for step in 1..=self.settings.max_steps {
            self.logger.log(&LogEvent::StepStart { step });

            let reply = self
                .client
                .chat_with_tools(
                    &self.settings.model,
                    conversation.messages(),
                    &definitions,
                    &options,
                )
                .await?;

            conversation.push_assistant(&reply.content, reply.tool_calls.clone());
            self.logger.log(&LogEvent::ModelReply {
                step,
                content_preview: content_preview(&reply.content),
                tools_requested: reply
                    .tool_calls
                    .iter()
                    .map(|tc| tc.function.name.clone())
                    .collect(),
            });

            if reply.tool_calls.is_empty() {
                self.logger.log(&LogEvent::RunComplete {
                    step,
                    outcome: "no_tool_calls".to_string(),
                });
                return Ok(reply.content);
            }

            for call in &reply.tool_calls {
                let content = self.dispatch_tool_call(call).await;
                conversation.push_tool(&call.id, content);
            }
        }

        self.logger.log(&LogEvent::MaxStepsReached {
            max_steps: self.settings.max_steps,
        });
        Ok(conversation
            .last_assistant_content()
            .unwrap_or_default()
            .to_string())
    }

    /// Run one tool call and render its outcome as tool-message content
    async fn dispatch_tool_call(&self, call: &ToolCall) -> String {
        let name = call.function.name.as_str();
        let raw = if call.function.arguments.is_empty() {
            "{}"
        } else {
            call.function.arguments.as_str()
        };

        let args = match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                let error = format!("Tool arguments must be a JSON object, got: {}", other);
                self.logger.log(&LogEvent::ToolArgsParseError {
                    tool: name.to_string(),
                    error: error.clone(),
                    raw: raw.to_string(),
                });
                return ToolOutcome::error_with(
                    ToolErrorKind::InvalidArguments,
                    error,
                    serde_json::json!({"raw": raw}),
                )
                .into_content();
            }
            Err(e) => {
                let error = format!("Failed to parse tool arguments: {}", e);
                self.logger.log(&LogEvent::ToolArgsParseError {
                    tool: name.to_string(),
                    error: e.to_string(),
                    raw: raw.to_string(),
                });
                return ToolOutcome::error_with(
                    ToolErrorKind::InvalidArguments,
                    error,
                    serde_json::json!({"raw": raw}),
                )
                .into_content();
            }
        };

        let outcome = self.registry.dispatch(name, &args).await;
        let args_value = Value::Object(args);
        let failure_event = match &outcome {
            ToolOutcome::Error(err) if err.kind == ToolErrorKind::UnknownTool => {
                Some(LogEvent::ToolUnknown {
                    tool: name.to_string(),
                    args: args_value.clone(),
                })
            }
            ToolOutcome::Error(err) => Some(LogEvent::ToolRunError {
                tool: name.to_string(),
                args: args_value.clone(),
                error: err.message.clone(),
            }),
            _ => None,
        };

        let content = outcome.into_content();
        match failure_event {
            Some(event) => self.logger.log(&event),
            None => self.logger.log(&LogEvent::ToolRunOk {
                tool: name.to_string(),
                args: args_value,
                result_preview: result_preview(&content),
            }),
        }
        content
    }
}
