use crate::entry::{ContentBlock, LogEntry, ToolResultBlock, ToolUseBlock};
use std::collections::HashMap;

// ===================================================================
// Bookkeeping tools — internal file/todo plumbing, excluded from
// condensed command summaries but still rendered in full transcripts
// ===================================================================

const BOOKKEEPING_TOOLS: &[&str] = &[
    "Read",
    "Write",
    "Edit",
    "MultiEdit",
    "NotebookEdit",
    "TodoWrite",
];

pub fn is_bookkeeping(name: &str) -> bool {
    BOOKKEEPING_TOOLS.contains(&name)
}

// ===================================================================
// Correlation — pairing tool_use blocks with their eventual results
// ===================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolStatus {
    Success,
    Failed,
    /// A tool_use with no matching result anywhere in the transcript.
    Unresolved,
}

impl ToolStatus {
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Success => "✅",
            Self::Failed => "❌",
            Self::Unresolved => "❓",
        }
    }

    pub fn mark(&self) -> &'static str {
        match self {
            Self::Success => "✔",
            Self::Failed => "✗",
            Self::Unresolved => "?",
        }
    }
}

/// Tool invocations across a transcript, in first-seen order, with an
/// id index to each invocation's result if one ever appears.
///
/// The id invariant is not trusted: orphan results (no matching use) and
/// unresolved uses (no matching result) are both tolerated.
pub struct ToolCalls<'a> {
    calls: Vec<&'a ToolUseBlock>,
    results: HashMap<&'a str, &'a ToolResultBlock>,
}

impl<'a> ToolCalls<'a> {
    pub fn correlate(entries: &'a [LogEntry]) -> Self {
        let mut calls = Vec::new();
        let mut results: HashMap<&str, &ToolResultBlock> = HashMap::new();
        for entry in entries {
            let conv = match entry {
                LogEntry::Assistant(conv) | LogEntry::User(conv) => conv,
                _ => continue,
            };
            for block in conv.blocks() {
                match block {
                    ContentBlock::ToolUse(call) => calls.push(call),
                    ContentBlock::ToolResult(result) => {
                        // First result wins on duplicate ids.
                        results.entry(result.tool_use_id.as_str()).or_insert(result);
                    }
                    _ => {}
                }
            }
        }
        Self { calls, results }
    }

    pub fn calls(&self) -> &[&'a ToolUseBlock] {
        &self.calls
    }

    pub fn result_for(&self, id: &str) -> Option<&'a ToolResultBlock> {
        self.results.get(id).copied()
    }

    /// Success unless the result carries an explicit error flag; content
    /// is never consulted to reclassify.
    pub fn status(&self, id: &str) -> ToolStatus {
        match self.result_for(id) {
            None => ToolStatus::Unresolved,
            Some(result) if result.is_error == Some(true) => ToolStatus::Failed,
            Some(_) => ToolStatus::Success,
        }
    }
}

// ===================================================================
// Naming — synthetic MCP identifiers rewritten for display
// ===================================================================

/// `mcp__server__operation` becomes `server::operation`; any other shape
/// passes through unchanged.
pub fn display_name(raw: &str) -> String {
    let mut parts = raw.splitn(3, "__");
    match (parts.next(), parts.next(), parts.next()) {
        (Some("mcp"), Some(server), Some(operation))
            if !server.is_empty() && !operation.is_empty() =>
        {
            format!("{server}::{operation}")
        }
        _ => raw.to_string(),
    }
}

// ===================================================================
// Categorization — fixed closed set, first matching rule wins
// ===================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolCategory {
    Core,
    FileOperations,
    Builtin,
    SafeOutputs,
    SafeInputs,
    GitHub,
    Playwright,
    Serena,
    Mcp,
    CustomAgents,
    Other,
}

impl ToolCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Core => "Core",
            Self::FileOperations => "File Operations",
            Self::Builtin => "Builtin",
            Self::SafeOutputs => "Safe Outputs",
            Self::SafeInputs => "Safe Inputs",
            Self::GitHub => "Git/GitHub",
            Self::Playwright => "Playwright",
            Self::Serena => "Serena",
            Self::Mcp => "MCP (other)",
            Self::CustomAgents => "Custom Agents",
            Self::Other => "Other",
        }
    }
}

const CORE_TOOLS: &[&str] = &["Bash", "BashOutput", "KillShell", "Task"];

const FILE_TOOLS: &[&str] = &[
    "Read",
    "Write",
    "Edit",
    "MultiEdit",
    "NotebookEdit",
    "LS",
    "Glob",
    "Grep",
];

const BUILTIN_TOOLS: &[&str] = &[
    "WebFetch",
    "WebSearch",
    "TodoWrite",
    "ExitPlanMode",
    "AskUserQuestion",
];

/// Prefixes that disqualify a name from the custom-agent heuristic even
/// when it is otherwise lower-kebab-case.
const RESERVED_PREFIXES: &[&str] = &[
    "mcp__",
    "mcp-",
    "safe_outputs",
    "safe-outputs",
    "safe_inputs",
    "safe-inputs",
];

/// Bucket a raw tool name. The rule order is load-bearing: named MCP
/// server families are checked before the generic MCP bucket, and the
/// generic bucket before the custom-agent heuristic.
pub fn categorize(raw: &str) -> ToolCategory {
    if CORE_TOOLS.contains(&raw) {
        return ToolCategory::Core;
    }
    if FILE_TOOLS.contains(&raw) {
        return ToolCategory::FileOperations;
    }
    if BUILTIN_TOOLS.contains(&raw) {
        return ToolCategory::Builtin;
    }
    if let Some(rest) = raw.strip_prefix("mcp__") {
        let server = rest.split("__").next().unwrap_or("");
        return match server {
            "safe_outputs" | "safeoutputs" => ToolCategory::SafeOutputs,
            "safe_inputs" | "safeinputs" => ToolCategory::SafeInputs,
            "github" | "git" => ToolCategory::GitHub,
            "playwright" => ToolCategory::Playwright,
            "serena" => ToolCategory::Serena,
            _ => ToolCategory::Mcp,
        };
    }
    if looks_like_agent_name(raw) {
        return ToolCategory::CustomAgents;
    }
    ToolCategory::Other
}

/// Count tool names per category, emitted in the fixed category order
/// with empty buckets dropped.
pub fn category_counts(names: &[String]) -> Vec<(ToolCategory, usize)> {
    const ORDER: &[ToolCategory] = &[
        ToolCategory::Core,
        ToolCategory::FileOperations,
        ToolCategory::Builtin,
        ToolCategory::SafeOutputs,
        ToolCategory::SafeInputs,
        ToolCategory::GitHub,
        ToolCategory::Playwright,
        ToolCategory::Serena,
        ToolCategory::Mcp,
        ToolCategory::CustomAgents,
        ToolCategory::Other,
    ];
    let mut counts = vec![0usize; ORDER.len()];
    for name in names {
        let category = categorize(name);
        if let Some(idx) = ORDER.iter().position(|c| *c == category) {
            counts[idx] += 1;
        }
    }
    ORDER
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(category, count)| (*category, count))
        .collect()
}

/// Lower-kebab-case with at least two segments, no uppercase, and no
/// reserved prefix. Single-word names never qualify.
fn looks_like_agent_name(name: &str) -> bool {
    if !name.contains('-') || name.starts_with('-') || name.ends_with('-') {
        return false;
    }
    if RESERVED_PREFIXES.iter().any(|p| name.starts_with(p)) {
        return false;
    }
    name.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
