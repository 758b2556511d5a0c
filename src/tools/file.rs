//! File tools - read and write inside the workspace

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::io::AsyncWriteExt;

use crate::core::{ToolErrorKind, ToolOutcome};
use crate::tools::{arg_bool, arg_str, arg_u64, JsonMap, Tool, Workspace};

/// Default cap on the number of characters returned by `read_file`
const DEFAULT_MAX_CHARS: u64 = 4000;

/// Marker appended when file content is cut at the cap
const TRUNCATION_MARKER: &str = "\n...[truncated]...";

/// Tool for reading text files from the workspace
pub struct ReadFileTool {
    workspace: Workspace,
}

impl ReadFileTool {
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }
}

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read the contents of a text file from the workspace. \
         Use this to inspect input files, configs, logs, etc."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Path to the file, relative to the workspace root."
                },
                "max_chars": {
                    "type": "integer",
                    "description": "Maximum number of characters to return. \
                                    Use a smaller limit if the file might be very large.",
                    "default": DEFAULT_MAX_CHARS
                }
            },
            "required": ["path"]
        })
    }

    async fn run(&self, args: &JsonMap) -> ToolOutcome {
        let path = match arg_str(args, "path") {
            Some(p) => p,
            None => {
                return ToolOutcome::error(
                    ToolErrorKind::InvalidArguments,
                    "Missing required argument: path",
                )
            }
        };
        let max_chars = arg_u64(args, "max_chars").unwrap_or(DEFAULT_MAX_CHARS) as usize;

        let abs_path = match self.workspace.resolve(path) {
            Some(p) => p,
            None => {
                return ToolOutcome::error(
                    ToolErrorKind::WorkspaceBoundary,
                    "Attempted to read outside of workspace.",
                )
            }
        };

        if !abs_path.exists() {
            return ToolOutcome::error(
                ToolErrorKind::Execution,
                format!("File does not exist: {}", path),
            );
        }

        match tokio::fs::read(&abs_path).await {
            Ok(bytes) => {
                let text = String::from_utf8_lossy(&bytes);
                let truncated = text.chars().count() > max_chars;
                let content = if truncated {
                    let mut cut: String = text.chars().take(max_chars).collect();
                    cut.push_str(TRUNCATION_MARKER);
                    cut
                } else {
                    text.into_owned()
                };
                ToolOutcome::success(json!({
                    "path": path,
                    "content": content,
                    "truncated": truncated,
                }))
            }
            Err(e) => ToolOutcome::error(
                ToolErrorKind::Execution,
                format!("Failed to read file {}: {}", path, e),
            ),
        }
    }
}

/// Tool for writing (or appending) text files in the workspace
pub struct WriteFileTool {
    workspace: Workspace,
}

impl WriteFileTool {
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }
}

#[async_trait]
impl Tool for WriteFileTool {
    fn name(&self) -> &str {
        "write_file"
    }

    fn description(&self) -> &str {
        "Write text to a file in the workspace. \
         Use this to create or modify GEOS input files, scripts, or configs."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Path to the file, relative to the workspace root."
                },
                "content": {
                    "type": "string",
                    "description": "The full file content to write."
                },
                "overwrite": {
                    "type": "boolean",
                    "description": "If true, overwrite the file completely. \
                                    If false and the file exists, append to the end.",
                    "default": true
                }
            },
            "required": ["path", "content"]
        })
    }

    async fn run(&self, args: &JsonMap) -> ToolOutcome {
        let path = match arg_str(args, "path") {
            Some(p) => p,
            None => {
                return ToolOutcome::error(
                    ToolErrorKind::InvalidArguments,
                    "Missing required argument: path",
                )
            }
        };
        let content = match arg_str(args, "content") {
            Some(c) => c,
            None => {
                return ToolOutcome::error(
                    ToolErrorKind::InvalidArguments,
                    "Missing required argument: content",
                )
            }
        };
        let overwrite = arg_bool(args, "overwrite").unwrap_or(true);

        let abs_path = match self.workspace.resolve(path) {
            Some(p) => p,
            None => {
                return ToolOutcome::error(
                    ToolErrorKind::WorkspaceBoundary,
                    "Attempted to write outside of workspace.",
                )
            }
        };

        if let Some(parent) = abs_path.parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                return ToolOutcome::error(
                    ToolErrorKind::Execution,
                    format!("Failed to create parent directories for {}: {}", path, e),
                );
            }
        }

        // Create-or-append toggle: not a merge. A missing file is always created.
        let append = !overwrite && abs_path.exists();
        let mode = if append { "append" } else { "write" };

        let result = if append {
            match tokio::fs::OpenOptions::new()
                .append(true)
                .open(&abs_path)
                .await
            {
                Ok(mut f) => f.write_all(content.as_bytes()).await,
                Err(e) => Err(e),
            }
        } else {
            tokio::fs::write(&abs_path, content).await
        };

        match result {
            Ok(()) => ToolOutcome::success(json!({
                "path": path,
                "status": "ok",
                "mode": mode,
                "message": format!("Wrote {} chars to {}", content.chars().count(), path),
            })),
            Err(e) => ToolOutcome::error(
                ToolErrorKind::Execution,
                format!("Failed to write file {}: {}", path, e),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(v: Value) -> JsonMap {
        v.as_object().unwrap().clone()
    }

    fn workspace() -> (tempfile::TempDir, Workspace) {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::open(dir.path()).unwrap();
        (dir, ws)
    }

    #[tokio::test]
    async fn test_read_outside_workspace_is_boundary_error() {
        let (_dir, ws) = workspace();
        let tool = ReadFileTool::new(ws);
        let outcome = tool.run(&args(json!({"path": "../../etc/passwd"}))).await;
        match outcome {
            ToolOutcome::Error(err) => {
                assert_eq!(err.kind, ToolErrorKind::WorkspaceBoundary);
            }
            other => panic!("expected boundary error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let (_dir, ws) = workspace();
        let tool = ReadFileTool::new(ws);
        let outcome = tool.run(&args(json!({"path": "nope.txt"}))).await;
        assert!(outcome.is_error());
        let content: Value = serde_json::from_str(&outcome.into_content()).unwrap();
        assert!(content["error"]
            .as_str()
            .unwrap()
            .contains("File does not exist"));
    }

    #[tokio::test]
    async fn test_read_truncates_at_cap() {
        let (dir, ws) = workspace();
        std::fs::write(dir.path().join("big.txt"), "x".repeat(100)).unwrap();
        let tool = ReadFileTool::new(ws);
        let outcome = tool
            .run(&args(json!({"path": "big.txt", "max_chars": 10})))
            .await;
        let content: Value = serde_json::from_str(&outcome.into_content()).unwrap();
        assert_eq!(content["truncated"], true);
        let text = content["content"].as_str().unwrap();
        assert!(text.starts_with("xxxxxxxxxx"));
        assert!(text.ends_with("...[truncated]..."));
    }

    #[tokio::test]
    async fn test_write_creates_file_and_parents() {
        let (dir, ws) = workspace();
        let tool = WriteFileTool::new(ws);
        let outcome = tool
            .run(&args(json!({"path": "sub/deep/new.txt", "content": "hello"})))
            .await;
        assert!(!outcome.is_error());
        let written = std::fs::read_to_string(dir.path().join("sub/deep/new.txt")).unwrap();
        assert_eq!(written, "hello");
    }

    #[tokio::test]
    async fn test_write_without_overwrite_appends() {
        let (dir, ws) = workspace();
        std::fs::write(dir.path().join("log.txt"), "first").unwrap();
        let tool = WriteFileTool::new(ws);
        let outcome = tool
            .run(&args(
                json!({"path": "log.txt", "content": "+more", "overwrite": false}),
            ))
            .await;
        let content: Value = serde_json::from_str(&outcome.into_content()).unwrap();
        assert_eq!(content["mode"], "append");
        let written = std::fs::read_to_string(dir.path().join("log.txt")).unwrap();
        assert_eq!(written, "first+more");
    }

    #[tokio::test]
    async fn test_write_without_overwrite_creates_missing_file() {
        let (dir, ws) = workspace();
        let tool = WriteFileTool::new(ws);
        let outcome = tool
            .run(&args(
                json!({"path": "fresh.txt", "content": "body", "overwrite": false}),
            ))
            .await;
        let content: Value = serde_json::from_str(&outcome.into_content()).unwrap();
        assert_eq!(content["mode"], "write");
        assert_eq!(
            std::fs::read_to_string(dir.path().join("fresh.txt")).unwrap(),
            "body"
        );
    }

    #[tokio::test]
    async fn test_write_outside_workspace_is_boundary_error() {
        let (_dir, ws) = workspace();
        let tool = WriteFileTool::new(ws);
        let outcome = tool
            .run(&args(json!({"path": "../evil.txt", "content": "x"})))
            .await;
        match outcome {
            ToolOutcome::Error(err) => {
                assert_eq!(err.kind, ToolErrorKind::WorkspaceBoundary);
            }
            other => panic!("expected boundary error, got {:?}", other),
        }
    }
}
