use crate::entry::{ContentBlock, InitEntry, LogEntry, ResultEntry, ToolResultBlock, ToolUseBlock};
use crate::format::{self, content_text, fmt_cost, fmt_duration, format_parameters, truncate_output};
use crate::tools::{ToolCalls, ToolStatus, display_name, is_bookkeeping};

/// Default report byte ceiling (1,000 KiB). Report sinks impose a hard
/// size cap; tripping must stop writes rather than cut mid-element.
pub const DEFAULT_SIZE_LIMIT: usize = 1_024_000;

/// Default line ceiling for the plain/terminal conversation body.
pub const DEFAULT_LINE_LIMIT: usize = 5_000;

const TRUNCATION_MARKER: &str = "\n*... (truncated: report size limit reached)*\n";

// ===================================================================
// RenderBudget — a latched, monotonically growing byte counter
// ===================================================================

/// Byte budget owned by exactly one render pass.
///
/// The first append that would cross the ceiling is rejected and latches
/// the tripped flag; every later call is rejected regardless of size
/// until `reset`. Never reuse one budget across independent renders.
#[derive(Debug)]
pub struct RenderBudget {
    limit: usize,
    used: usize,
    tripped: bool,
}

impl RenderBudget {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_SIZE_LIMIT)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            used: 0,
            tripped: false,
        }
    }

    pub fn try_append(&mut self, len: usize) -> bool {
        if self.tripped {
            return false;
        }
        if self.used + len > self.limit {
            self.tripped = true;
            return false;
        }
        self.used += len;
        true
    }

    pub fn tripped(&self) -> bool {
        self.tripped
    }

    pub fn used(&self) -> usize {
        self.used
    }

    pub fn reset(&mut self) {
        self.used = 0;
        self.tripped = false;
    }
}

impl Default for RenderBudget {
    fn default() -> Self {
        Self::new()
    }
}

// ===================================================================
// EngineFormat — per-engine formatting injected into the traversal
// ===================================================================

/// The two engine-specific rendering decisions, injected so the
/// traversal, correlation, and truncation logic stay singular.
pub trait EngineFormat {
    fn format_init(&self, init: &InitEntry) -> String;

    /// Render one tool invocation together with its resolved result,
    /// or `None` when no result ever appeared.
    fn format_tool_use(&self, call: &ToolUseBlock, result: Option<&ToolResultBlock>) -> String;
}

// ===================================================================
// Conversation renderer — rich markdown plus a command summary
// ===================================================================

#[derive(Debug)]
pub struct RenderedConversation {
    pub markdown: String,
    /// One status line per non-bookkeeping tool call, first-seen order.
    pub command_summary: String,
    pub size_limit_reached: bool,
}

/// Single forward pass over the entries. Every appended chunk is gated
/// by the budget when one is supplied; on trip, rendering stops at a
/// block boundary and a truncation marker is appended, so the partial
/// document contains no unterminated blocks.
pub fn render_conversation(
    entries: &[LogEntry],
    format: &dyn EngineFormat,
    mut budget: Option<&mut RenderBudget>,
) -> RenderedConversation {
    let calls = ToolCalls::correlate(entries);
    let mut markdown = String::new();
    let mut size_limit_reached = false;

    'entries: for entry in entries {
        match entry {
            LogEntry::Init(init) => {
                let block = format.format_init(init);
                if !push_gated(&mut markdown, &block, &mut budget) {
                    size_limit_reached = true;
                    break 'entries;
                }
            }
            LogEntry::Assistant(conv) => {
                for block in conv.blocks() {
                    match block {
                        ContentBlock::Text(text) => {
                            let trimmed = text.text.trim();
                            if trimmed.is_empty() {
                                continue;
                            }
                            let chunk = format!("{trimmed}\n\n");
                            if !push_gated(&mut markdown, &chunk, &mut budget) {
                                size_limit_reached = true;
                                break 'entries;
                            }
                        }
                        ContentBlock::ToolUse(call) => {
                            let result = calls.result_for(&call.id);
                            let rendered = format.format_tool_use(call, result);
                            if !push_gated(&mut markdown, &rendered, &mut budget) {
                                size_limit_reached = true;
                                break 'entries;
                            }
                        }
                        _ => {}
                    }
                }
            }
            // Tool results surface through correlation, not directly.
            LogEntry::User(_) => {}
            LogEntry::Result(res) => {
                let block = result_block(res);
                if !push_gated(&mut markdown, &block, &mut budget) {
                    size_limit_reached = true;
                    break 'entries;
                }
            }
        }
    }

    if size_limit_reached {
        markdown.push_str(TRUNCATION_MARKER);
    }

    // The correlator preserves first-seen order, which is what the
    // condensed listing wants even when the transcript was cut short.
    let mut command_summary = String::new();
    for call in calls.calls() {
        if is_bookkeeping(&call.name) {
            continue;
        }
        command_summary.push_str(&summary_line(call, calls.status(&call.id)));
    }

    RenderedConversation {
        markdown,
        command_summary,
        size_limit_reached,
    }
}

fn push_gated(out: &mut String, chunk: &str, budget: &mut Option<&mut RenderBudget>) -> bool {
    if let Some(budget) = budget {
        if !budget.try_append(chunk.len()) {
            return false;
        }
    }
    out.push_str(chunk);
    true
}

fn summary_line(call: &ToolUseBlock, status: ToolStatus) -> String {
    let name = display_name(&call.name);
    let gist = format_parameters(&call.input, format::DEFAULT_MAX_FIELDS);
    if gist.is_empty() {
        format!("* {} `{name}`\n", status.icon())
    } else {
        format!("* {} `{name}` ({gist})\n", status.icon())
    }
}

fn result_block(res: &ResultEntry) -> String {
    let mut out = String::from("---\n\n");
    if let Some(turns) = res.num_turns {
        out.push_str(&format!("**Turns:** {turns}\n"));
    }
    if let Some(ms) = res.duration_ms {
        out.push_str(&format!("**Duration:** {}\n", fmt_duration(ms)));
    }
    if let Some(cost) = res.total_cost_usd {
        out.push_str(&format!("**Cost:** {}\n", fmt_cost(cost)));
    }
    if let Some(usage) = &res.usage {
        out.push_str(&format!(
            "**Tokens:** {} in / {} out (cache: {} read, {} written)\n",
            usage.input_tokens,
            usage.output_tokens,
            usage.cache_read_input_tokens,
            usage.cache_creation_input_tokens,
        ));
    }
    if let Some(denials) = &res.permission_denials {
        if denials.count() > 0 {
            out.push_str(&format!("**Permission denials:** {}\n", denials.count()));
        }
    }
    let errors = res.error_messages();
    if !errors.is_empty() {
        out.push_str("\n**Errors:**\n");
        for error in &errors {
            out.push_str(&format!("- {error}\n"));
        }
    }
    out.push('\n');
    out
}

// ===================================================================
// Alternate renderers — plain text and terminal-style
// ===================================================================

#[derive(Clone, Copy, PartialEq, Eq)]
enum BodyStyle {
    Plain,
    Console,
}

pub fn render_plain(entries: &[LogEntry], max_lines: usize) -> String {
    let calls = ToolCalls::correlate(entries);
    let mut lines = body_lines(entries, &calls, BodyStyle::Plain);
    cap_lines(&mut lines, max_lines);
    lines.extend(stats_footer(entries));
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Same body as the plain renderer, console-flavored and wrapped in a
/// fixed-width fenced block, with the statistics footer outside it.
pub fn render_terminal(entries: &[LogEntry], max_lines: usize) -> String {
    let calls = ToolCalls::correlate(entries);
    let mut lines = body_lines(entries, &calls, BodyStyle::Console);
    cap_lines(&mut lines, max_lines);

    let mut out = String::from("```text\n");
    out.push_str(&lines.join("\n"));
    out.push_str("\n```\n");
    let footer = stats_footer(entries);
    if !footer.is_empty() {
        out.push('\n');
        out.push_str(&footer.join("\n"));
        out.push('\n');
    }
    out
}

fn cap_lines(lines: &mut Vec<String>, max_lines: usize) {
    if lines.len() > max_lines {
        lines.truncate(max_lines);
        lines.push("... (conversation truncated)".to_string());
    }
}

fn body_lines(entries: &[LogEntry], calls: &ToolCalls<'_>, style: BodyStyle) -> Vec<String> {
    let meta = |text: String| match style {
        BodyStyle::Plain => text,
        BodyStyle::Console => format!("# {text}"),
    };
    let mut lines = Vec::new();

    for entry in entries {
        match entry {
            LogEntry::Init(init) => {
                let session = init.session_id.as_deref().unwrap_or("unknown");
                let model = init.model.as_deref().unwrap_or("unknown");
                lines.push(meta(format!("session {session} (model {model})")));
                if let Some(cwd) = &init.cwd {
                    lines.push(meta(format!("cwd {cwd}")));
                }
                if !init.tools.is_empty() {
                    lines.push(meta(format!("{} tools declared", init.tools.len())));
                }
                for server in &init.mcp_servers {
                    let status = server.status.as_deref().unwrap_or("unknown");
                    lines.push(meta(format!("mcp {}: {status}", server.name)));
                }
            }
            LogEntry::Assistant(conv) => {
                for block in conv.blocks() {
                    match block {
                        ContentBlock::Text(text) => {
                            for line in text.text.trim().lines() {
                                lines.push(line.to_string());
                            }
                        }
                        ContentBlock::ToolUse(call) if !is_bookkeeping(&call.name) => {
                            tool_lines(&mut lines, call, calls, style);
                        }
                        _ => {}
                    }
                }
            }
            LogEntry::User(conv) => {
                if let Some(text) = conv.text() {
                    for line in text.trim().lines() {
                        lines.push(format!("> {line}"));
                    }
                }
            }
            // Rendered in the footer, not the body.
            LogEntry::Result(_) => {}
        }
    }
    lines
}

fn tool_lines(
    lines: &mut Vec<String>,
    call: &ToolUseBlock,
    calls: &ToolCalls<'_>,
    style: BodyStyle,
) {
    let name = display_name(&call.name);
    let gist = format_parameters(&call.input, format::DEFAULT_MAX_FIELDS);
    let status = calls.status(&call.id);
    match style {
        BodyStyle::Plain => {
            if gist.is_empty() {
                lines.push(format!("[tool] {} {name}", status.mark()));
            } else {
                lines.push(format!("[tool] {} {name} ({gist})", status.mark()));
            }
        }
        BodyStyle::Console => {
            if gist.is_empty() {
                lines.push(format!("$ {name}"));
            } else {
                lines.push(format!("$ {name} {gist}"));
            }
            if let Some(result) = calls.result_for(&call.id) {
                let text = content_text(&result.content);
                if !text.is_empty() {
                    let shown = truncate_output(&text, format::DEFAULT_OUTPUT_LIMIT);
                    for line in shown.lines() {
                        lines.push(format!("  {line}"));
                    }
                }
                if status == ToolStatus::Failed {
                    lines.push("  [error]".to_string());
                }
            }
        }
    }
}

fn stats_footer(entries: &[LogEntry]) -> Vec<String> {
    let mut lines = Vec::new();
    for entry in entries {
        let LogEntry::Result(res) = entry else {
            continue;
        };
        lines.push(String::new());
        lines.push("--- Statistics ---".to_string());
        if let Some(turns) = res.num_turns {
            lines.push(format!("turns: {turns}"));
        }
        if let Some(ms) = res.duration_ms {
            lines.push(format!("duration: {}", fmt_duration(ms)));
        }
        if let Some(cost) = res.total_cost_usd {
            lines.push(format!("cost: {}", fmt_cost(cost)));
        }
        if let Some(usage) = &res.usage {
            lines.push(format!(
                "tokens: {} in / {} out (cache: {} read, {} written)",
                usage.input_tokens,
                usage.output_tokens,
                usage.cache_read_input_tokens,
                usage.cache_creation_input_tokens,
            ));
        }
        if let Some(denials) = &res.permission_denials {
            if denials.count() > 0 {
                lines.push(format!("permission denials: {}", denials.count()));
            }
        }
        let errors = res.error_messages();
        if !errors.is_empty() {
            lines.push("errors:".to_string());
            for error in &errors {
                lines.push(format!("  - {error}"));
            }
        }
    }
    lines
}
