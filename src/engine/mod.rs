use crate::entry::{InitEntry, ToolResultBlock, ToolUseBlock, parse_entries};
use crate::format::{self, content_text, fmt_duration, format_parameters, truncate_output};
use crate::render::{EngineFormat, RenderBudget, render_conversation};
use crate::report::{ParsedRun, detect_failures};
use crate::tools::{ToolStatus, category_counts, display_name};
use anyhow::Result;

/// Byte cap for a single fenced tool output in the rich report.
const TOOL_OUTPUT_LIMIT: usize = 1_024;

// ===================================================================
// Claude stream format — the engine-specific rendering decisions
// ===================================================================

pub struct ClaudeFormat {
    output_limit: usize,
}

impl Default for ClaudeFormat {
    fn default() -> Self {
        Self {
            output_limit: TOOL_OUTPUT_LIMIT,
        }
    }
}

impl EngineFormat for ClaudeFormat {
    fn format_init(&self, init: &InitEntry) -> String {
        let mut out = String::from("<details>\n<summary>🚀 Initialization</summary>\n\n");
        if let Some(model) = &init.model {
            out.push_str(&format!("**Model:** `{model}`\n\n"));
        }
        if let Some(session) = &init.session_id {
            out.push_str(&format!("**Session:** `{session}`\n\n"));
        }
        if let Some(cwd) = &init.cwd {
            out.push_str(&format!("**Working directory:** `{cwd}`\n\n"));
        }
        if !init.tools.is_empty() {
            let breakdown: Vec<String> = category_counts(&init.tools)
                .iter()
                .map(|(category, count)| format!("{}: {count}", category.label()))
                .collect();
            out.push_str(&format!(
                "**Tools:** {} available ({})\n\n",
                init.tools.len(),
                breakdown.join(", "),
            ));
        }
        if let Some(commands) = &init.slash_commands {
            if !commands.is_empty() {
                out.push_str(&format!("**Slash commands:** {}\n\n", commands.len()));
            }
        }
        if !init.mcp_servers.is_empty() {
            out.push_str("**MCP servers:**\n");
            for server in &init.mcp_servers {
                let icon = match server.status.as_deref() {
                    Some("connected") => "✅",
                    Some("failed") => "❌",
                    _ => "❓",
                };
                match server.detail() {
                    Some(detail) if server.failed() => {
                        out.push_str(&format!("- {icon} {} ({detail})\n", server.name));
                    }
                    _ => out.push_str(&format!("- {icon} {}\n", server.name)),
                }
            }
            out.push('\n');
        }
        out.push_str("</details>\n\n");
        out
    }

    fn format_tool_use(&self, call: &ToolUseBlock, result: Option<&ToolResultBlock>) -> String {
        let status = match result {
            None => ToolStatus::Unresolved,
            Some(r) if r.is_error == Some(true) => ToolStatus::Failed,
            Some(_) => ToolStatus::Success,
        };
        let name = display_name(&call.name);
        let gist = format_parameters(&call.input, format::DEFAULT_MAX_FIELDS);

        let mut out = format!("<details>\n<summary>{} <code>{name}</code>", status.icon());
        if !gist.is_empty() {
            out.push_str(&format!(" {gist}"));
        }
        out.push_str("</summary>\n\n");

        match result {
            Some(result) => {
                let text = content_text(&result.content);
                if !text.is_empty() {
                    out.push_str("```\n");
                    out.push_str(&truncate_output(&text, self.output_limit));
                    out.push_str("\n```\n");
                }
                if let Some(ms) = result.duration_ms {
                    out.push_str(&format!("\n*{}*\n", fmt_duration(ms)));
                }
            }
            None => out.push_str("*No result recorded.*\n"),
        }

        out.push_str("\n</details>\n\n");
        out
    }
}

// ===================================================================
// End-to-end parse for the Claude engine
// ===================================================================

#[derive(Debug, Clone)]
pub struct ParseOptions {
    pub turn_budget: Option<u64>,
    pub size_limit: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            turn_budget: None,
            size_limit: crate::render::DEFAULT_SIZE_LIMIT,
        }
    }
}

/// Parse a Claude run log into the uniform report shape.
///
/// Unrecognizable input is not an error: it yields a placeholder report
/// with no entries, keeping the distinction between "nothing could be
/// parsed" and a genuine engine failure.
pub fn parse_claude_log(raw: &str, opts: &ParseOptions) -> Result<ParsedRun> {
    let Some(entries) = parse_entries(raw) else {
        return Ok(ParsedRun {
            markdown: "*Log format not recognized.*\n".to_string(),
            command_summary: String::new(),
            mcp_failures: Vec::new(),
            max_turns_hit: false,
            size_limit_reached: false,
            errors: Vec::new(),
            entries: Vec::new(),
        });
    };

    let mut budget = RenderBudget::with_limit(opts.size_limit);
    let rendered = render_conversation(&entries, &ClaudeFormat::default(), Some(&mut budget));
    let diagnostics = detect_failures(&entries, opts.turn_budget);

    Ok(ParsedRun {
        markdown: rendered.markdown,
        command_summary: rendered.command_summary,
        mcp_failures: diagnostics.mcp_failures,
        max_turns_hit: diagnostics.max_turns_hit,
        size_limit_reached: rendered.size_limit_reached,
        errors: diagnostics.errors,
        entries,
    })
}
