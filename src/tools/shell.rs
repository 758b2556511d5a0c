//! Shell tools - directory listing and subprocess execution
//!
//! Subprocesses run as children rooted at the workspace directory. Commands
//! are tokenized with shell-word rules (quotes respected); there is no shell
//! in between, so pipes and redirection are not interpreted. Output capture
//! keeps the last [`OUTPUT_TAIL_CHARS`] characters of each stream.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::io::Write;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::process::Command;

use crate::core::{ToolErrorKind, ToolOutcome};
use crate::tools::{arg_f64, arg_str, JsonMap, Tool, Workspace};

/// Characters of stdout/stderr kept in tool payloads
const OUTPUT_TAIL_CHARS: usize = 4000;

/// Default timeout for `run_shell`
const DEFAULT_SHELL_TIMEOUT_SEC: f64 = 60.0;

/// Default timeout for `run_python_code`
const DEFAULT_PYTHON_TIMEOUT_SEC: f64 = 30.0;

/// Tool for listing workspace directories
pub struct ListDirTool {
    workspace: Workspace,
}

impl ListDirTool {
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }
}

#[async_trait]
impl Tool for ListDirTool {
    fn name(&self) -> &str {
        "list_dir"
    }

    fn description(&self) -> &str {
        "List files and directories inside a folder in the workspace. \
         Use this to discover available examples, inputs, and outputs."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Directory path, relative to the workspace root. \
                                    Use '.' for the workspace root.",
                    "default": "."
                }
            },
            "required": []
        })
    }

    async fn run(&self, args: &JsonMap) -> ToolOutcome {
        let path = arg_str(args, "path").unwrap_or(".");

        let abs_dir = match self.workspace.resolve(path) {
            Some(p) => p,
            None => {
                return ToolOutcome::error(
                    ToolErrorKind::WorkspaceBoundary,
                    "Attempted to list outside of workspace.",
                )
            }
        };

        if !abs_dir.exists() {
            return ToolOutcome::error(
                ToolErrorKind::Execution,
                format!("Directory does not exist: {}", path),
            );
        }
        if !abs_dir.is_dir() {
            return ToolOutcome::error(
                ToolErrorKind::Execution,
                format!("Not a directory: {}", path),
            );
        }

        let mut entries = Vec::new();
        let mut reader = match tokio::fs::read_dir(&abs_dir).await {
            Ok(r) => r,
            Err(e) => {
                return ToolOutcome::error(
                    ToolErrorKind::Execution,
                    format!("Failed to list directory {}: {}", path, e),
                )
            }
        };
        while let Ok(Some(entry)) = reader.next_entry().await {
            let is_dir = entry
                .file_type()
                .await
                .map(|t| t.is_dir())
                .unwrap_or(false);
            let size_bytes = if is_dir {
                Value::Null
            } else {
                match entry.metadata().await {
                    Ok(meta) => json!(meta.len()),
                    Err(_) => Value::Null,
                }
            };
            entries.push(json!({
                "name": entry.file_name().to_string_lossy(),
                "is_dir": is_dir,
                "size_bytes": size_bytes,
            }));
        }
        entries.sort_by(|a, b| {
            a["name"]
                .as_str()
                .unwrap_or_default()
                .cmp(b["name"].as_str().unwrap_or_default())
        });

        ToolOutcome::success(json!({"path": path, "entries": entries}))
    }
}

/// Captured subprocess result
struct Capture {
    returncode: i32,
    stdout: String,
    stderr: String,
    timed_out: bool,
}

/// Keep the last `limit` characters of a stream
fn tail_chars(text: &str, limit: usize) -> String {
    let count = text.chars().count();
    if count <= limit {
        text.to_string()
    } else {
        text.chars().skip(count - limit).collect()
    }
}

/// Ceiling on any tool-supplied timeout (one day)
const MAX_TIMEOUT_SEC: f64 = 86_400.0;

/// Clamp a model-supplied timeout into something `Duration` accepts
fn clamp_timeout(timeout_sec: f64, default: f64) -> f64 {
    if timeout_sec.is_finite() {
        timeout_sec.clamp(0.0, MAX_TIMEOUT_SEC)
    } else {
        default
    }
}

/// Spawn a child process and wait for it with a deadline
///
/// On timeout the child is killed and whatever output the pipes produced so
/// far is returned alongside the timeout flag. Launch failures surface as
/// `Err` for the calling tool to fold into an outcome.
async fn run_with_timeout(
    program: &str,
    args: &[String],
    cwd: &Path,
    timeout_sec: f64,
) -> std::io::Result<Capture> {
    let mut child = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()?;

    let mut stdout_pipe = child.stdout.take();
    let mut stderr_pipe = child.stderr.take();
    let stdout_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        if let Some(ref mut pipe) = stdout_pipe {
            let _ = pipe.read_to_end(&mut buf).await;
        }
        buf
    });
    let stderr_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        if let Some(ref mut pipe) = stderr_pipe {
            let _ = pipe.read_to_end(&mut buf).await;
        }
        buf
    });

    let deadline = Duration::from_secs_f64(timeout_sec);
    let (returncode, timed_out) =
        match tokio::time::timeout(deadline, child.wait()).await {
            Ok(status) => (status?.code().unwrap_or(-1), false),
            Err(_) => {
                // Deadline hit: reclaim control, report partial output.
                let _ = child.kill().await;
                let _ = child.wait().await;
                (-1, true)
            }
        };

    let stdout_bytes = stdout_task.await.unwrap_or_default();
    let stderr_bytes = stderr_task.await.unwrap_or_default();

    Ok(Capture {
        returncode,
        stdout: tail_chars(&String::from_utf8_lossy(&stdout_bytes), OUTPUT_TAIL_CHARS),
        stderr: tail_chars(&String::from_utf8_lossy(&stderr_bytes), OUTPUT_TAIL_CHARS),
        timed_out,
    })
}

/// Tool for running a shell command in the workspace
pub struct RunShellTool {
    workspace: Workspace,
}

impl RunShellTool {
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }
}

#[async_trait]
impl Tool for RunShellTool {
    fn name(&self) -> &str {
        "run_shell"
    }

    fn description(&self) -> &str {
        "Run a shell command in the workspace. \
         Use this to execute Python scripts, compile code, or run GEOS commands \
         once they are wired up. Be careful: commands can modify files."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "description": "The shell command to run. Example: 'python3 script.py --help'"
                },
                "timeout_sec": {
                    "type": "number",
                    "description": "Maximum seconds to allow the command to run.",
                    "default": DEFAULT_SHELL_TIMEOUT_SEC
                }
            },
            "required": ["command"]
        })
    }

    async fn run(&self, args: &JsonMap) -> ToolOutcome {
        let command = match arg_str(args, "command") {
            Some(c) => c,
            None => {
                return ToolOutcome::error(
                    ToolErrorKind::InvalidArguments,
                    "Missing required argument: command",
                )
            }
        };
        let timeout_sec = clamp_timeout(
            arg_f64(args, "timeout_sec").unwrap_or(DEFAULT_SHELL_TIMEOUT_SEC),
            DEFAULT_SHELL_TIMEOUT_SEC,
        );

        let tokens = match shell_words::split(command) {
            Ok(t) => t,
            Err(e) => {
                return ToolOutcome::error_with(
                    ToolErrorKind::Execution,
                    format!("Failed to parse command: {}", e),
                    json!({"command": command}),
                )
            }
        };
        let (program, rest) = match tokens.split_first() {
            Some(split) => split,
            None => {
                return ToolOutcome::error_with(
                    ToolErrorKind::Execution,
                    "Empty command",
                    json!({"command": command}),
                )
            }
        };

        match run_with_timeout(program, rest, self.workspace.root(), timeout_sec).await {
            Ok(capture) if capture.timed_out => ToolOutcome::error_with(
                ToolErrorKind::Timeout,
                format!("Command timed out after {} seconds", timeout_sec),
                json!({
                    "command": command,
                    "stdout": capture.stdout,
                    "stderr": capture.stderr,
                }),
            ),
            Ok(capture) => ToolOutcome::success(json!({
                "command": command,
                "returncode": capture.returncode,
                "stdout": capture.stdout,
                "stderr": capture.stderr,
            })),
            Err(e) => ToolOutcome::error_with(
                ToolErrorKind::Execution,
                format!("Failed to run command: {}", e),
                json!({"command": command}),
            ),
        }
    }
}

/// Tool for executing a short Python snippet in a subprocess
///
/// The snippet is written to a uniquely named file inside the workspace and
/// deliberately left there afterwards so runs stay inspectable.
pub struct RunPythonTool {
    workspace: Workspace,
}

impl RunPythonTool {
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }
}

#[async_trait]
impl Tool for RunPythonTool {
    fn name(&self) -> &str {
        "run_python_code"
    }

    fn description(&self) -> &str {
        "Execute a short Python snippet in a subprocess. \
         Use this for small utilities or sanity checks. \
         Prefer 'run_shell' with 'python3 script.py' for larger scripts."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "code": {
                    "type": "string",
                    "description": "Python code to execute. The result will include stdout and stderr."
                },
                "timeout_sec": {
                    "type": "number",
                    "description": "Maximum seconds to allow the code to run.",
                    "default": DEFAULT_PYTHON_TIMEOUT_SEC
                }
            },
            "required": ["code"]
        })
    }

    async fn run(&self, args: &JsonMap) -> ToolOutcome {
        let code = match arg_str(args, "code") {
            Some(c) => c,
            None => {
                return ToolOutcome::error(
                    ToolErrorKind::InvalidArguments,
                    "Missing required argument: code",
                )
            }
        };
        let timeout_sec = clamp_timeout(
            arg_f64(args, "timeout_sec").unwrap_or(DEFAULT_PYTHON_TIMEOUT_SEC),
            DEFAULT_PYTHON_TIMEOUT_SEC,
        );

        let script_path = match self.write_snippet(code) {
            Ok(p) => p,
            Err(e) => {
                return ToolOutcome::error(
                    ToolErrorKind::Execution,
                    format!("Failed to stage Python snippet: {}", e),
                )
            }
        };
        let rel_path = self.workspace.relative(&script_path);

        let script_arg = vec![script_path.to_string_lossy().into_owned()];
        match run_with_timeout("python3", &script_arg, self.workspace.root(), timeout_sec).await {
            Ok(capture) if capture.timed_out => ToolOutcome::error_with(
                ToolErrorKind::Timeout,
                format!("Python execution timed out after {} seconds", timeout_sec),
                json!({
                    "script_path": rel_path,
                    "stdout": capture.stdout,
                    "stderr": capture.stderr,
                }),
            ),
            Ok(capture) => ToolOutcome::success(json!({
                "script_path": rel_path,
                "returncode": capture.returncode,
                "stdout": capture.stdout,
                "stderr": capture.stderr,
            })),
            Err(e) => ToolOutcome::error_with(
                ToolErrorKind::Execution,
                format!("Failed to execute Python code: {}", e),
                json!({"script_path": rel_path}),
            ),
        }
    }
}

impl RunPythonTool {
    /// Write the snippet to a uniquely named, persistent file in the workspace
    fn write_snippet(&self, code: &str) -> std::io::Result<std::path::PathBuf> {
        let mut file = tempfile::Builder::new()
            .prefix("snippet-")
            .suffix(".py")
            .tempfile_in(self.workspace.root())?;
        file.write_all(code.as_bytes())?;
        // keep() disarms deletion: the snippet stays on disk for inspection.
        let (_, path) = file.keep().map_err(|e| e.error)?;
        Ok(path)
    }
}
