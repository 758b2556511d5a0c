//! JSONL run log
//!
//! One JSON object per line, appended as the run progresses. Logging is
//! best-effort: a failed write never disturbs the run, so every sink error is
//! swallowed here.

use serde::Serialize;
use serde_json::Value;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Cap on assistant content stored per log line
const CONTENT_PREVIEW_CHARS: usize = 200;

/// Cap on tool result text stored per log line
const RESULT_PREVIEW_CHARS: usize = 500;

/// Events recorded during an agent run
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LogEvent {
    UserInput {
        content: String,
    },
    StepStart {
        step: usize,
    },
    ModelReply {
        step: usize,
        content_preview: String,
        tools_requested: Vec<String>,
    },
    ToolArgsParseError {
        tool: String,
        error: String,
        raw: String,
    },
    ToolUnknown {
        tool: String,
        args: Value,
    },
    ToolRunOk {
        tool: String,
        args: Value,
        result_preview: String,
    },
    ToolRunError {
        tool: String,
        args: Value,
        error: String,
    },
    RunComplete {
        step: usize,
        outcome: String,
    },
    MaxStepsReached {
        max_steps: usize,
    },
}

/// Appends run events to a JSONL file, when one is configured
#[derive(Debug, Clone, Default)]
pub struct RunLogger {
    path: Option<PathBuf>,
}

impl RunLogger {
    /// Logger writing to the given file
    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Logger that discards everything
    pub fn disabled() -> Self {
        Self { path: None }
    }

    /// Where events go, if anywhere
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Append one event; failures are dropped silently
    pub fn log(&self, event: &LogEvent) {
        let path = match &self.path {
            Some(p) => p,
            None => return,
        };
        let line = match serde_json::to_string(event) {
            Ok(l) => l,
            Err(_) => return,
        };
        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
            let _ = writeln!(file, "{}", line);
        }
    }
}

/// Cut text to the first `limit` characters
pub(crate) fn preview(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        text.chars().take(limit).collect()
    }
}

/// Preview sized for assistant content
pub(crate) fn content_preview(text: &str) -> String {
    preview(text, CONTENT_PREVIEW_CHARS)
}

/// Preview sized for tool results
pub(crate) fn result_preview(text: &str) -> String {
    preview(text, RESULT_PREVIEW_CHARS)
}
