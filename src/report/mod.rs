use crate::entry::LogEntry;

// ===================================================================
// Failure & limit detection — upstream failures are data, not errors
// ===================================================================

#[derive(Debug, Default, PartialEq)]
pub struct RunDiagnostics {
    /// Names of MCP servers that failed to initialize, declared order.
    pub mcp_failures: Vec<String>,
    pub max_turns_hit: bool,
    /// The result entry's error list, verbatim.
    pub errors: Vec<String>,
}

pub fn detect_failures(entries: &[LogEntry], turn_budget: Option<u64>) -> RunDiagnostics {
    let mut diagnostics = RunDiagnostics::default();
    for entry in entries {
        match entry {
            LogEntry::Init(init) => {
                for server in &init.mcp_servers {
                    if server.failed() {
                        diagnostics.mcp_failures.push(server.name.clone());
                    }
                }
            }
            LogEntry::Result(res) => {
                if let (Some(budget), Some(turns)) = (turn_budget, res.num_turns) {
                    // Hitting the budget exactly counts as exhaustion.
                    if turns >= budget {
                        diagnostics.max_turns_hit = true;
                    }
                }
                diagnostics.errors.extend(res.error_messages());
            }
            _ => {}
        }
    }
    diagnostics
}

// ===================================================================
// Engine parser wrapper — one external contract per agent engine
// ===================================================================

/// The uniform result of parsing one engine's run log.
#[derive(Debug)]
pub struct ParsedRun {
    pub markdown: String,
    pub command_summary: String,
    pub mcp_failures: Vec<String>,
    pub max_turns_hit: bool,
    pub size_limit_reached: bool,
    pub errors: Vec<String>,
    pub entries: Vec<LogEntry>,
}

impl ParsedRun {
    /// Fixed-shape result for a failed engine parse: a labeled error
    /// block in the markdown and empty flags.
    fn parse_error(label: &str, err: &anyhow::Error) -> Self {
        Self {
            markdown: format!("**Error parsing {label} log:** {err:#}\n"),
            command_summary: String::new(),
            mcp_failures: Vec::new(),
            max_turns_hit: false,
            size_limit_reached: false,
            errors: Vec::new(),
            entries: Vec::new(),
        }
    }
}

/// Run one engine's parse function under the shared contract.
///
/// Success passes through unchanged. Any failure becomes a displayable
/// error block instead of propagating, so one engine's parsing bug
/// cannot abort the whole reporting step.
pub fn parse_run<F>(engine: F, label: &str, raw: &str) -> ParsedRun
where
    F: FnOnce(&str) -> anyhow::Result<ParsedRun>,
{
    match engine(raw) {
        Ok(run) => run,
        Err(err) => ParsedRun::parse_error(label, &err),
    }
}

#[cfg(test)]
mod tests;
