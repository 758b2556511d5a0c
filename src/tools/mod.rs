//! Tools module - the capabilities the model can invoke
//!
//! Every tool implements the same contract: a name, a description shown to
//! the model, a JSON-schema parameter object, and an async `run` that always
//! returns a [`ToolOutcome`] value. Tools never return crate errors; failures
//! must stay visible to the model as conversational content.

pub mod file;
pub mod registry;
pub mod shell;
pub mod stubs;
pub mod workspace;

use async_trait::async_trait;
use serde_json::Value;

use crate::core::{ToolDefinition, ToolOutcome};

pub use registry::ToolRegistry;
pub use workspace::Workspace;

/// Named arguments passed to a tool after JSON parsing
pub type JsonMap = serde_json::Map<String, Value>;

/// Base contract for tools
///
/// A tool must not assume its arguments were schema-validated: the registry
/// pre-checks required fields and primitive types, but each tool re-checks
/// the constraints it relies on (path containment above all) and reports
/// violations as outcome values.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name, unique within a registry
    fn name(&self) -> &str;

    /// Description shown to the model
    fn description(&self) -> &str;

    /// JSON Schema for the parameters
    fn parameters(&self) -> Value;

    /// Execute the tool with named arguments
    async fn run(&self, args: &JsonMap) -> ToolOutcome;

    /// Wire-shape definition advertised to the model
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(self.name(), self.description(), self.parameters())
    }
}

/// Get a string argument by key
pub(crate) fn arg_str<'a>(args: &'a JsonMap, key: &str) -> Option<&'a str> {
    args.get(key).and_then(|v| v.as_str())
}

/// Get a boolean argument by key
pub(crate) fn arg_bool(args: &JsonMap, key: &str) -> Option<bool> {
    args.get(key).and_then(|v| v.as_bool())
}

/// Get a numeric argument by key
pub(crate) fn arg_f64(args: &JsonMap, key: &str) -> Option<f64> {
    args.get(key).and_then(|v| v.as_f64())
}

/// Get an unsigned integer argument by key
pub(crate) fn arg_u64(args: &JsonMap, key: &str) -> Option<u64> {
    args.get(key).and_then(|v| v.as_u64())
}

/// Validate named arguments against a tool's declared JSON schema
///
/// Checks that every `required` property is present and that provided values
/// match the declared primitive type. Extra keys are tolerated. Returns a
/// human-readable description of the first violation.
pub fn validate_args(schema: &Value, args: &JsonMap) -> Result<(), String> {
    if let Some(required) = schema.get("required").and_then(|v| v.as_array()) {
        for name in required.iter().filter_map(|v| v.as_str()) {
            if !args.contains_key(name) {
                return Err(format!("Missing required argument: {}", name));
            }
        }
    }

    let properties = match schema.get("properties").and_then(|v| v.as_object()) {
        Some(p) => p,
        None => return Ok(()),
    };

    for (name, value) in args {
        let declared = match properties.get(name).and_then(|p| p.get("type")) {
            Some(t) => t,
            None => continue,
        };
        let expected = declared.as_str().unwrap_or_default();
        let ok = match expected {
            "string" => value.is_string(),
            "integer" => value.is_i64() || value.is_u64(),
            "number" => value.is_number(),
            "boolean" => value.is_boolean(),
            "object" => value.is_object(),
            "array" => value.is_array(),
            _ => true,
        };
        if !ok {
            return Err(format!(
                "Argument '{}' should be of type {}, got: {}",
                name, expected, value
            ));
        }
    }

    Ok(())
}
