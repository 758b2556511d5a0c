//! Tool registry - fixed set of tools and pre-dispatch validation

use std::collections::HashMap;
use std::sync::Arc;

use crate::core::{ToolDefinition, ToolErrorKind, ToolOutcome};
use crate::tools::file::{ReadFileTool, WriteFileTool};
use crate::tools::shell::{ListDirTool, RunPythonTool, RunShellTool};
use crate::tools::stubs::{RunGeosTool, SearchGeosDocsTool, SearchWebTool};
use crate::tools::{validate_args, JsonMap, Tool, Workspace};

/// Holds the tools exposed to the model for one agent
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Build the standard tool set rooted at a workspace
    pub fn with_default_tools(workspace: &Workspace) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(ListDirTool::new(workspace.clone())));
        registry.register(Arc::new(ReadFileTool::new(workspace.clone())));
        registry.register(Arc::new(WriteFileTool::new(workspace.clone())));
        registry.register(Arc::new(RunShellTool::new(workspace.clone())));
        registry.register(Arc::new(RunPythonTool::new(workspace.clone())));
        registry.register(Arc::new(RunGeosTool));
        registry.register(Arc::new(SearchGeosDocsTool));
        registry.register(Arc::new(SearchWebTool));
        registry
    }

    /// Register a tool; a duplicate name replaces the earlier entry in lookups
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.push(tool);
        self.index.insert(name, self.tools.len() - 1);
    }

    /// Look up a tool by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether no tools are registered
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Wire-shape definitions for all tools, in registration order
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    /// Validate arguments against the tool's schema, then run it
    ///
    /// An unknown name or a schema violation becomes an outcome value, never
    /// a crate error.
    pub async fn dispatch(&self, name: &str, args: &JsonMap) -> ToolOutcome {
        let tool = match self.get(name) {
            Some(t) => t,
            None => {
                return ToolOutcome::error(
                    ToolErrorKind::UnknownTool,
                    format!("Unknown tool: {}", name),
                )
            }
        };

        if let Err(violation) = validate_args(&tool.parameters(), args) {
            return ToolOutcome::error(ToolErrorKind::InvalidArguments, violation);
        }

        tool.run(args).await
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn args(v: Value) -> JsonMap {
        v.as_object().unwrap().clone()
    }

    fn registry() -> (tempfile::TempDir, ToolRegistry) {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::open(dir.path()).unwrap();
        (dir, ToolRegistry::with_default_tools(&ws))
    }

    #[test]
    fn test_default_tool_set() {
        let (_dir, registry) = registry();
        assert_eq!(registry.len(), 8);
        for name in [
            "list_dir",
            "read_file",
            "write_file",
            "run_shell",
            "run_python_code",
            "run_geos",
            "search_geos_docs",
            "search_web",
        ] {
            assert!(registry.get(name).is_some(), "missing tool {}", name);
        }
    }

    #[test]
    fn test_definitions_match_registration_order() {
        let (_dir, registry) = registry();
        let defs = registry.definitions();
        assert_eq!(defs.len(), 8);
        assert_eq!(defs[0].function.name, "list_dir");
        assert_eq!(defs[0].tool_type, "function");
    }

    #[tokio::test]
    async fn test_dispatch_unknown_tool() {
        let (_dir, registry) = registry();
        let outcome = registry.dispatch("no_such_tool", &args(json!({}))).await;
        match outcome {
            ToolOutcome::Error(err) => {
                assert_eq!(err.kind, ToolErrorKind::UnknownTool);
                assert!(err.message.contains("no_such_tool"));
            }
            other => panic!("expected unknown-tool error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_dispatch_rejects_schema_violation_before_run() {
        let (_dir, registry) = registry();
        let outcome = registry
            .dispatch("read_file", &args(json!({"path": 7})))
            .await;
        match outcome {
            ToolOutcome::Error(err) => {
                assert_eq!(err.kind, ToolErrorKind::InvalidArguments);
            }
            other => panic!("expected invalid-arguments error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_dispatch_runs_valid_call() {
        let (dir, registry) = registry();
        std::fs::write(dir.path().join("hello.txt"), "hi").unwrap();
        let outcome = registry
            .dispatch("read_file", &args(json!({"path": "hello.txt"})))
            .await;
        assert!(!outcome.is_error());
        let content: Value = serde_json::from_str(&outcome.into_content()).unwrap();
        assert_eq!(content["content"], "hi");
    }
}
