//! Shared types used across GEOS-Agent modules
//!
//! Contains the chat message structures, tool call/definition wire shapes,
//! and the typed tool outcome fed back to the model.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A message in a conversation
///
/// Serializes to the chat completions wire shape: optional fields are omitted
/// so assistant/tool messages look exactly like what the API expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender (system, user, assistant, tool)
    pub role: String,
    /// Content of the message (empty string when the model returned none)
    pub content: String,
    /// Tool calls attached to an assistant message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    /// Identifier of the call a tool message answers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    /// Create a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Create a new assistant message without tool calls
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Create an assistant message carrying tool calls
    pub fn assistant_with_tools(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
            tool_calls: if tool_calls.is_empty() {
                None
            } else {
                Some(tool_calls)
            },
            tool_call_id: None,
        }
    }

    /// Create a tool message answering the given call id
    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: "tool".to_string(),
            content: content.into(),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.into()),
        }
    }
}

/// A tool call requested by the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Opaque call identifier assigned by the API
    pub id: String,
    /// Call type (always "function")
    #[serde(rename = "type")]
    pub call_type: String,
    /// Function name and raw arguments
    pub function: FunctionCall,
}

/// Function payload within a tool call
///
/// `arguments` is kept as the raw text the model produced; it is expected to
/// parse as a JSON object but that is not guaranteed, so parsing happens at
/// dispatch time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String,
}

impl ToolCall {
    /// Create a new function tool call
    pub fn function(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            call_type: "function".to_string(),
            function: FunctionCall {
                name: name.into(),
                arguments: arguments.into(),
            },
        }
    }
}

/// Definition of a tool advertised to the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Type of tool (always "function" for now)
    #[serde(rename = "type")]
    pub tool_type: String,
    /// Function details
    pub function: FunctionDefinition,
}

/// Function definition within a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDefinition {
    /// Name of the function
    pub name: String,
    /// Description of what the function does
    pub description: String,
    /// JSON Schema for the parameters
    pub parameters: Value,
}

impl ToolDefinition {
    /// Create a new function tool definition
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
    ) -> Self {
        Self {
            tool_type: "function".to_string(),
            function: FunctionDefinition {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }
}

/// Enumerable failure kinds at the tool dispatch boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolErrorKind {
    /// Arguments failed to parse as JSON or failed schema validation
    InvalidArguments,
    /// Tool name not present in the registry
    UnknownTool,
    /// Resolved path escapes the workspace root
    WorkspaceBoundary,
    /// Subprocess exceeded its allotted time
    Timeout,
    /// Any failure raised by the tool's own logic
    Execution,
}

/// A structured tool failure, carried as data rather than an error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolError {
    pub kind: ToolErrorKind,
    pub message: String,
    /// Extra context merged into the serialized payload (e.g. raw argument
    /// text, the parsed args, partial subprocess output)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

/// Result of running (or failing to run) a tool
///
/// Every variant renders to conversational content for the model; the loop
/// never turns a tool failure into a crate error.
#[derive(Debug, Clone)]
pub enum ToolOutcome {
    /// Tool ran and produced a payload
    Success(Value),
    /// Capability is a stub; payload echoes the request plus a warning
    NotImplemented(Value),
    /// Tool could not run or failed while running
    Error(ToolError),
}

impl ToolOutcome {
    /// Create a successful outcome
    pub fn success(payload: Value) -> Self {
        Self::Success(payload)
    }

    /// Create a not-implemented outcome for a stub tool
    pub fn not_implemented(payload: Value) -> Self {
        Self::NotImplemented(payload)
    }

    /// Create an error outcome
    pub fn error(kind: ToolErrorKind, message: impl Into<String>) -> Self {
        Self::Error(ToolError {
            kind,
            message: message.into(),
            detail: None,
        })
    }

    /// Create an error outcome with extra context
    pub fn error_with(kind: ToolErrorKind, message: impl Into<String>, detail: Value) -> Self {
        Self::Error(ToolError {
            kind,
            message: message.into(),
            detail: Some(detail),
        })
    }

    /// Whether this outcome is a failure
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Render the JSON text fed back to the model as the tool message content
    pub fn into_content(self) -> String {
        match self {
            Self::Success(payload) => payload.to_string(),
            Self::NotImplemented(payload) => {
                let mut obj = match payload {
                    Value::Object(map) => map,
                    other => {
                        let mut map = serde_json::Map::new();
                        map.insert("result".to_string(), other);
                        map
                    }
                };
                obj.insert("not_implemented".to_string(), Value::Bool(true));
                Value::Object(obj).to_string()
            }
            Self::Error(err) => {
                let mut obj = serde_json::Map::new();
                obj.insert("error".to_string(), Value::String(err.message));
                obj.insert("kind".to_string(), json!(err.kind));
                if let Some(Value::Object(extra)) = err.detail {
                    for (k, v) in extra {
                        obj.entry(k).or_insert(v);
                    }
                }
                Value::Object(obj).to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_serialization_omits_empty_options() {
        let msg = Message::user("hi");
        let v = serde_json::to_value(&msg).unwrap();
        assert_eq!(v["role"], "user");
        assert!(v.get("tool_calls").is_none());
        assert!(v.get("tool_call_id").is_none());
    }

    #[test]
    fn test_tool_message_carries_call_id() {
        let msg = Message::tool("call_1", "{}");
        let v = serde_json::to_value(&msg).unwrap();
        assert_eq!(v["tool_call_id"], "call_1");
        assert_eq!(v["role"], "tool");
    }

    #[test]
    fn test_tool_call_wire_shape() {
        let call = ToolCall::function("call_9", "read_file", r#"{"path":"a.txt"}"#);
        let v = serde_json::to_value(&call).unwrap();
        assert_eq!(v["type"], "function");
        assert_eq!(v["function"]["name"], "read_file");
        // Arguments stay a raw string on the wire
        assert!(v["function"]["arguments"].is_string());
    }

    #[test]
    fn test_error_outcome_content() {
        let outcome = ToolOutcome::error_with(
            ToolErrorKind::InvalidArguments,
            "Failed to parse tool arguments",
            json!({"raw": "{not json"}),
        );
        let content: Value = serde_json::from_str(&outcome.into_content()).unwrap();
        assert_eq!(content["error"], "Failed to parse tool arguments");
        assert_eq!(content["kind"], "invalid_arguments");
        assert_eq!(content["raw"], "{not json");
    }

    #[test]
    fn test_not_implemented_marker() {
        let outcome = ToolOutcome::not_implemented(json!({"query": "pvt", "warning": "stub"}));
        let content: Value = serde_json::from_str(&outcome.into_content()).unwrap();
        assert_eq!(content["not_implemented"], true);
        assert_eq!(content["query"], "pvt");
    }
}
