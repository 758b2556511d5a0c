//! Documentation miner - extract ground-truth records from GEOS example docs
//!
//! Walks the Sphinx tree for `Example.rst` files under the basic and advanced
//! example directories and parses each into a structured record: prompt
//! context, input decks, run commands, and expected outputs. The parsing is
//! heuristic, keyed on the exact section headers the GEOS docs use.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use walkdir::WalkDir;

use crate::core::{AgentError, Result};

/// Structured representation of one documentation example
///
/// Serialized to JSON for the evaluation harness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExampleRecord {
    /// e.g. "basic/multiphaseFlow"
    pub example_id: String,
    /// First non-empty line of the document
    pub title: String,
    /// "basic" or "advanced"
    pub category: String,
    /// Path of the .rst file relative to the repo root
    pub rst_path: String,

    /// Natural-language text to use as prompt context
    pub context: String,
    pub objectives: String,
    pub description: String,

    /// XML decks and any other required inputs
    pub input_files: Vec<String>,
    /// Tables, meshes, helper scripts
    pub aux_files: Vec<String>,
    /// Canonical geosx / MPI commands
    pub run_commands: Vec<String>,
    /// Python plotting scripts or similar
    pub postprocess_commands: Vec<String>,
    /// Files or glob patterns named in results sections
    pub expected_outputs: Vec<String>,
}

/// Headers recognized as section boundaries, matched against whole lines
const SECTION_HEADERS: &[&str] = &[
    "Context",
    "Objective",
    "Objectives",
    "Input file",
    "Input files",
    "Running GEOS",
    "Running TriaxialDriver",
    "Running",
    "Inspecting results",
    "Results",
];

/// Section names whose file paths count as expected outputs
const OUTPUT_SECTION_HINTS: &[&str] = &["inspecting results", "results"];

static FILE_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?:\.\./)*inputFiles/[^\s`]+",
        r"|src/docs/sphinx/[^\s`]+",
        r"|GEOSDATA[^\s`]*",
        r"|[A-Za-z0-9_.\-/]+\.xml",
        r"|[A-Za-z0-9_.\-/]+\.py",
        r"|[A-Za-z0-9_.\-/]+\.txt",
        r"|[A-Za-z0-9_.\-/]+\.vtu",
        r"|[A-Za-z0-9_.\-/]+\.vtk",
        r"|[A-Za-z0-9_.\-/]+\.csv",
        r"|[A-Za-z0-9_.\-/]+\.h5",
        r"|[A-Za-z0-9_.\-/]+\.xdmf",
        r"|[A-Za-z0-9_.\-/]+\.xmf",
    ))
    .unwrap()
});

static RUN_CMD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^\s*(?:",
        r"(?:mpirun|mpiexec)[^\n]*geosx[^\n]*",
        r"|(?:\$\s*)?(?:\S*/)?geosx[^\n]*-i[^\n]*",
        r"|python\s+[^\n]*\.py[^\n]*",
        r")",
    ))
    .unwrap()
});

/// Headers found in a document, as (name, line index) in line order
fn find_section_indices(lines: &[&str]) -> Vec<(&'static str, usize)> {
    let mut found: Vec<(&'static str, usize)> = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        let stripped = line.trim();
        if let Some(&header) = SECTION_HEADERS.iter().find(|&&h| h == stripped) {
            if !found.iter().any(|(name, _)| *name == header) {
                found.push((header, i));
            }
        }
    }
    found
}

/// Body of a section, from the line after its header to `end` (exclusive)
fn slice_section(lines: &[&str], start_idx: usize, end_idx: Option<usize>) -> String {
    let end = end_idx.unwrap_or(lines.len());
    let from = (start_idx + 1).min(end);
    lines[from..end].join("\n").trim().to_string()
}

/// First header line index strictly after `idx`
fn next_header_after(headers: &[(&'static str, usize)], idx: usize) -> Option<usize> {
    headers
        .iter()
        .map(|&(_, i)| i)
        .filter(|&i| i > idx)
        .min()
}

fn header_index(headers: &[(&'static str, usize)], name: &str) -> Option<usize> {
    headers
        .iter()
        .find(|(h, _)| *h == name)
        .map(|&(_, i)| i)
}

/// All recognized file paths in the text, deduplicated in order of appearance
fn extract_paths(text: &str) -> Vec<String> {
    let mut unique = Vec::new();
    for m in FILE_PATH_RE.find_iter(text) {
        let path = m.as_str().to_string();
        if !unique.contains(&path) {
            unique.push(path);
        }
    }
    unique
}

/// Command lines in the text, with any leading `$` prompt stripped
fn extract_run_commands(text: &str) -> Vec<String> {
    let mut cmds = Vec::new();
    for line in text.lines() {
        if RUN_CMD_RE.is_match(line) {
            let cmd = line.trim().trim_start_matches('$').trim().to_string();
            if !cmd.is_empty() && !cmds.contains(&cmd) {
                cmds.push(cmd);
            }
        }
    }
    cmds
}

/// Parse one Example.rst-like file into a record
pub fn parse_example(rst_path: &Path, category: &str, repo_root: &Path) -> Result<ExampleRecord> {
    let text = std::fs::read_to_string(rst_path)?;
    let lines: Vec<&str> = text.lines().collect();
    let headers = find_section_indices(&lines);

    let title = lines
        .iter()
        .find(|l| !l.trim().is_empty())
        .map(|l| l.trim().to_string())
        .unwrap_or_default();

    let section_body = |idx: usize| slice_section(&lines, idx, next_header_after(&headers, idx));

    let context = header_index(&headers, "Context")
        .map(section_body)
        .unwrap_or_default();

    let objectives = header_index(&headers, "Objective")
        .or_else(|| header_index(&headers, "Objectives"))
        .map(section_body)
        .unwrap_or_default();

    // Description runs from "Context" down to the input-file section when
    // one exists, otherwise to the end of the document.
    let description = match header_index(&headers, "Context") {
        Some(start) => {
            let end = header_index(&headers, "Input file")
                .or_else(|| header_index(&headers, "Input files"));
            slice_section(&lines, start, end)
        }
        None => String::new(),
    };

    // Input files: prefer paths inside the input section, fall back to the
    // whole document when the section names none.
    let mut input_files = Vec::new();
    let input_idx = header_index(&headers, "Input file")
        .or_else(|| header_index(&headers, "Input files"));
    if let Some(idx) = input_idx {
        input_files = extract_paths(&section_body(idx));
    }
    if input_files.is_empty() {
        input_files = extract_paths(&text);
    }

    // Run commands route by section: geosx launches under a "Running" header
    // are run commands, anything else there and python lines under results
    // headers are postprocessing.
    let mut run_commands: Vec<String> = Vec::new();
    let mut postprocess_commands: Vec<String> = Vec::new();
    for &(name, idx) in &headers {
        let lower = name.to_lowercase();
        let cmds = extract_run_commands(&section_body(idx));
        if lower.contains("running") {
            for c in cmds {
                if c.contains("geosx") && !run_commands.contains(&c) {
                    run_commands.push(c);
                } else if !postprocess_commands.contains(&c) {
                    postprocess_commands.push(c);
                }
            }
        } else if lower.contains("inspect") || lower.contains("results") {
            for c in cmds {
                if c.contains("python") && !postprocess_commands.contains(&c) {
                    postprocess_commands.push(c);
                }
            }
        }
    }
    if run_commands.is_empty() && postprocess_commands.is_empty() {
        for c in extract_run_commands(&text) {
            if c.contains("geosx") {
                run_commands.push(c);
            } else {
                postprocess_commands.push(c);
            }
        }
    }

    let mut expected_outputs: Vec<String> = Vec::new();
    for &(name, idx) in &headers {
        if OUTPUT_SECTION_HINTS.contains(&name.to_lowercase().as_str()) {
            for p in extract_paths(&section_body(idx)) {
                if !expected_outputs.contains(&p) {
                    expected_outputs.push(p);
                }
            }
        }
    }

    // Aux files: every mentioned path that is not an XML deck and was not
    // already claimed as input or output.
    let mut aux_files: Vec<String> = Vec::new();
    for p in extract_paths(&text) {
        let is_xml = Path::new(&p)
            .extension()
            .map(|e| e == "xml")
            .unwrap_or(false);
        if !is_xml
            && !input_files.contains(&p)
            && !expected_outputs.contains(&p)
            && !aux_files.contains(&p)
        {
            aux_files.push(p);
        }
    }

    // Example name comes from the directory right under the category root:
    //   src/docs/sphinx/basicExamples/<name>/Example.rst
    let parts: Vec<String> = rst_path
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    let example_name = ["basicExamples", "advancedExamples"]
        .iter()
        .find_map(|marker| {
            parts
                .iter()
                .position(|p| p == marker)
                .and_then(|i| parts.get(i + 1))
        })
        .cloned()
        .unwrap_or_else(|| "unknown".to_string());

    let rel = rst_path
        .strip_prefix(repo_root)
        .unwrap_or(rst_path)
        .to_string_lossy()
        .replace('\\', "/");

    Ok(ExampleRecord {
        example_id: format!("{}/{}", category, example_name),
        title,
        category: category.to_string(),
        rst_path: rel,
        context,
        objectives,
        description,
        input_files,
        aux_files,
        run_commands,
        postprocess_commands,
        expected_outputs,
    })
}

/// All Example.rst files under the Sphinx tree, as (path, category)
pub fn discover_example_docs(repo_root: &Path) -> Vec<(PathBuf, &'static str)> {
    let mut found = Vec::new();
    for (dir, category) in [("basicExamples", "basic"), ("advancedExamples", "advanced")] {
        let root = repo_root.join("src/docs/sphinx").join(dir);
        if !root.is_dir() {
            continue;
        }
        for entry in WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if entry.file_type().is_file() && entry.file_name() == "Example.rst" {
                found.push((entry.into_path(), category));
            }
        }
    }
    found
}

/// Parse every discovered example, warning and skipping on failure
pub fn load_all_examples(repo_root: &Path) -> Vec<ExampleRecord> {
    let mut records = Vec::new();
    for (path, category) in discover_example_docs(repo_root) {
        match parse_example(&path, category, repo_root) {
            Ok(record) => records.push(record),
            Err(e) => eprintln!("[warn] Failed to parse {}: {}", path.display(), e),
        }
    }
    records
}

/// Mine all examples and write them as a pretty-printed JSON array
pub fn dump_examples_to_json(repo_root: &Path, out_path: &Path) -> Result<()> {
    let records = load_all_examples(repo_root);
    let json = serde_json::to_string_pretty(&records)
        .map_err(|e| AgentError::Other(format!("Failed to serialize examples: {}", e)))?;
    std::fs::write(out_path, json)?;
    Ok(())
}
