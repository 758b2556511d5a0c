//! End-to-end tests of the agent loop against a scripted chat provider.
//!
//! The provider replays canned replies and records every request it gets, so
//! the tests can check both the final answer and the exact message history
//! the model saw on each step.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use geos_agent::core::{AgentSettings, Result, ToolCall, ToolDefinition};
use geos_agent::llm::{ChatOptions, ChatProvider, ChatReply};
use geos_agent::{Agent, AgentError, Message, RunLogger, ToolRegistry, Workspace};

/// Replays a fixed script of replies and captures incoming requests
struct ScriptedProvider {
    script: Mutex<VecDeque<ChatReply>>,
    requests: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedProvider {
    fn new(replies: Vec<ChatReply>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatProvider for ScriptedProvider {
    async fn chat_with_tools(
        &self,
        _model: &str,
        messages: &[Message],
        _tools: &[ToolDefinition],
        _options: &ChatOptions,
    ) -> Result<ChatReply> {
        self.requests.lock().unwrap().push(messages.to_vec());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AgentError::api("Script exhausted"))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

fn reply(content: &str, tool_calls: Vec<ToolCall>) -> ChatReply {
    ChatReply {
        content: content.to_string(),
        tool_calls,
        usage: None,
        model: "scripted".to_string(),
    }
}

fn settings(max_steps: usize) -> AgentSettings {
    AgentSettings {
        model: "scripted".to_string(),
        temperature: 0.0,
        max_tokens: 256,
        max_steps,
    }
}

fn agent_in(
    dir: &tempfile::TempDir,
    provider: Arc<ScriptedProvider>,
    max_steps: usize,
) -> Agent {
    let workspace = Workspace::open(dir.path()).unwrap();
    let registry = ToolRegistry::with_default_tools(&workspace);
    Agent::new(settings(max_steps), provider, registry, RunLogger::disabled())
}

#[tokio::test]
async fn answer_without_tool_calls_is_returned_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let provider = ScriptedProvider::new(vec![reply("Just an answer.", vec![])]);
    let agent = agent_in(&dir, provider.clone(), 10);

    let answer = agent.run("say something").await.unwrap();
    assert_eq!(answer, "Just an answer.");

    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    let roles: Vec<&str> = requests[0].iter().map(|m| m.role.as_str()).collect();
    assert_eq!(roles, ["system", "user"]);
    assert_eq!(requests[0][1].content, "say something");
}

#[tokio::test]
async fn tool_results_are_fed_back_in_call_order() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("note.txt"), "hello").unwrap();

    let provider = ScriptedProvider::new(vec![
        reply(
            "",
            vec![
                ToolCall::function("call_a", "read_file", r#"{"path":"note.txt"}"#),
                ToolCall::function("call_b", "no_such_tool", "{}"),
            ],
        ),
        reply("All done.", vec![]),
    ]);
    let agent = agent_in(&dir, provider.clone(), 10);

    let answer = agent.run("read the note").await.unwrap();
    assert_eq!(answer, "All done.");

    let requests = provider.requests();
    assert_eq!(requests.len(), 2);

    // Second request: system, user, assistant (with both calls), tool x2.
    let second = &requests[1];
    let roles: Vec<&str> = second.iter().map(|m| m.role.as_str()).collect();
    assert_eq!(roles, ["system", "user", "assistant", "tool", "tool"]);

    let assistant = &second[2];
    let calls = assistant.tool_calls.as_ref().unwrap();
    assert_eq!(calls.len(), 2);

    // One tool message per call, same order, matching ids.
    assert_eq!(second[3].tool_call_id.as_deref(), Some("call_a"));
    assert_eq!(second[4].tool_call_id.as_deref(), Some("call_b"));

    let ok: Value = serde_json::from_str(&second[3].content).unwrap();
    assert_eq!(ok["content"], "hello");

    let err: Value = serde_json::from_str(&second[4].content).unwrap();
    assert_eq!(err["kind"], "unknown_tool");
    assert!(err["error"].as_str().unwrap().contains("no_such_tool"));
}

#[tokio::test]
async fn malformed_arguments_become_error_content() {
    let dir = tempfile::tempdir().unwrap();
    let provider = ScriptedProvider::new(vec![
        reply(
            "",
            vec![ToolCall::function("call_1", "read_file", "{not json")],
        ),
        reply("Recovered.", vec![]),
    ]);
    let agent = agent_in(&dir, provider.clone(), 10);

    let answer = agent.run("go").await.unwrap();
    assert_eq!(answer, "Recovered.");

    let second = &provider.requests()[1];
    let err: Value = serde_json::from_str(&second[3].content).unwrap();
    assert_eq!(err["kind"], "invalid_arguments");
    assert_eq!(err["raw"], "{not json");
}

#[tokio::test]
async fn stub_tool_result_carries_marker() {
    let dir = tempfile::tempdir().unwrap();
    let provider = ScriptedProvider::new(vec![
        reply(
            "",
            vec![ToolCall::function(
                "call_1",
                "search_geos_docs",
                r#"{"query":"wellbore"}"#,
            )],
        ),
        reply("Noted the stub.", vec![]),
    ]);
    let agent = agent_in(&dir, provider.clone(), 10);

    agent.run("search the docs").await.unwrap();

    let second = &provider.requests()[1];
    let result: Value = serde_json::from_str(&second[3].content).unwrap();
    assert_eq!(result["not_implemented"], true);
    assert_eq!(result["query"], "wellbore");
}

#[tokio::test]
async fn step_budget_returns_last_assistant_content() {
    let dir = tempfile::tempdir().unwrap();
    let keep_going =
        || reply("still working", vec![ToolCall::function("c", "list_dir", "{}")]);
    let provider = ScriptedProvider::new(vec![keep_going(), keep_going(), keep_going()]);
    let agent = agent_in(&dir, provider.clone(), 3);

    let answer = agent.run("loop forever").await.unwrap();
    assert_eq!(answer, "still working");
    assert_eq!(provider.requests().len(), 3);
}

#[tokio::test]
async fn model_failure_propagates() {
    let dir = tempfile::tempdir().unwrap();
    // Empty script: the first model call fails.
    let provider = ScriptedProvider::new(vec![]);
    let agent = agent_in(&dir, provider, 10);

    let result = agent.run("anything").await;
    assert!(result.is_err());
}
