//! Stub tools - advertised capabilities that are not wired up yet
//!
//! These keep the tool surface stable while the underlying integrations land.
//! Each returns a `NotImplemented` outcome carrying a warning the model can
//! relay, so a run degrades gracefully instead of erroring out.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::core::ToolOutcome;
use crate::tools::{arg_str, JsonMap, Tool};

/// Stub for launching a GEOS simulation
pub struct RunGeosTool;

#[async_trait]
impl Tool for RunGeosTool {
    fn name(&self) -> &str {
        "run_geos"
    }

    fn description(&self) -> &str {
        "Run a GEOS simulation on an input XML file in the workspace. \
         Currently stubbed: reports the request without launching a solver."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "input_path": {
                    "type": "string",
                    "description": "Path to the GEOS input XML file, relative to the workspace root."
                },
                "extra_args": {
                    "type": "string",
                    "description": "Extra command-line arguments to pass to GEOS.",
                    "default": ""
                }
            },
            "required": ["input_path"]
        })
    }

    async fn run(&self, args: &JsonMap) -> ToolOutcome {
        let input_path = arg_str(args, "input_path").unwrap_or_default();
        let extra_args = arg_str(args, "extra_args").unwrap_or("");
        ToolOutcome::not_implemented(json!({
            "input_path": input_path,
            "extra_args": extra_args,
            "warning": "run_geos is currently stubbed; GEOS is not yet wired up.",
        }))
    }
}

/// Stub for searching the GEOS documentation
pub struct SearchGeosDocsTool;

#[async_trait]
impl Tool for SearchGeosDocsTool {
    fn name(&self) -> &str {
        "search_geos_docs"
    }

    fn description(&self) -> &str {
        "Search the GEOS documentation for a topic. Not yet implemented."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "What to look for in the GEOS documentation."
                }
            },
            "required": ["query"]
        })
    }

    async fn run(&self, args: &JsonMap) -> ToolOutcome {
        let query = arg_str(args, "query").unwrap_or_default();
        ToolOutcome::not_implemented(json!({
            "query": query,
            "warning": "search_geos_docs is not yet implemented. Please browse docs manually for now.",
        }))
    }
}

/// Stub for general web search
pub struct SearchWebTool;

#[async_trait]
impl Tool for SearchWebTool {
    fn name(&self) -> &str {
        "search_web"
    }

    fn description(&self) -> &str {
        "Search the web for information. Not yet implemented in this environment."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query."
                }
            },
            "required": ["query"]
        })
    }

    async fn run(&self, args: &JsonMap) -> ToolOutcome {
        let query = arg_str(args, "query").unwrap_or_default();
        ToolOutcome::not_implemented(json!({
            "query": query,
            "warning": "search_web is not yet implemented in this environment.",
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(v: Value) -> JsonMap {
        v.as_object().unwrap().clone()
    }

    #[tokio::test]
    async fn test_run_geos_reports_stub_with_marker() {
        let outcome = RunGeosTool
            .run(&args(json!({"input_path": "decks/main.xml"})))
            .await;
        assert!(!outcome.is_error());
        let content: Value = serde_json::from_str(&outcome.into_content()).unwrap();
        assert_eq!(content["not_implemented"], true);
        assert_eq!(content["input_path"], "decks/main.xml");
        assert_eq!(content["extra_args"], "");
        assert!(content["warning"].as_str().unwrap().contains("stubbed"));
    }

    #[tokio::test]
    async fn test_search_stubs_echo_query() {
        for tool in [&SearchGeosDocsTool as &dyn Tool, &SearchWebTool as &dyn Tool] {
            let outcome = tool.run(&args(json!({"query": "wellbore"}))).await;
            let content: Value = serde_json::from_str(&outcome.into_content()).unwrap();
            assert_eq!(content["not_implemented"], true);
            assert_eq!(content["query"], "wellbore");
            assert!(content["warning"].as_str().unwrap().contains("not yet implemented"));
        }
    }
}
