use super::*;
use crate::entry::parse_entries;
use anyhow::anyhow;
use serde_json::json;

fn entries_from(lines: &[serde_json::Value]) -> Vec<LogEntry> {
    let raw = lines
        .iter()
        .map(|v| serde_json::to_string(v).unwrap())
        .collect::<Vec<_>>()
        .join("\n");
    parse_entries(&raw).unwrap()
}

// ---------------------------------------------------------------
// detect_failures
// ---------------------------------------------------------------

#[test]
fn mcp_failures_in_declared_order() {
    let entries = entries_from(&[json!({
        "type": "init",
        "mcp_servers": [
            { "name": "a", "status": "connected" },
            { "name": "b", "status": "failed" },
            { "name": "c", "status": "failed" }
        ]
    })]);
    let diag = detect_failures(&entries, None);
    assert_eq!(diag.mcp_failures, vec!["b", "c"]);
}

#[test]
fn turn_budget_comparison() {
    let entries = entries_from(&[
        json!({ "type": "init", "tools": ["Bash"] }),
        json!({ "type": "result", "turns": 5 }),
    ]);
    // Reaching the budget exactly is a hit.
    assert!(detect_failures(&entries, Some(5)).max_turns_hit);
    assert!(detect_failures(&entries, Some(3)).max_turns_hit);
    assert!(!detect_failures(&entries, Some(10)).max_turns_hit);
    // No budget supplied: never a hit.
    assert!(!detect_failures(&entries, None).max_turns_hit);
}

#[test]
fn result_without_turn_count_never_hits() {
    let entries = entries_from(&[json!({ "type": "result" })]);
    assert!(!detect_failures(&entries, Some(1)).max_turns_hit);
}

#[test]
fn errors_are_collected_verbatim() {
    let entries = entries_from(&[json!({
        "type": "result",
        "errors": ["first failure", "second failure"]
    })]);
    let diag = detect_failures(&entries, None);
    assert_eq!(diag.errors, vec!["first failure", "second failure"]);
}

#[test]
fn empty_entries_yield_default_diagnostics() {
    let diag = detect_failures(&[], Some(5));
    assert_eq!(diag, RunDiagnostics::default());
}

// ---------------------------------------------------------------
// parse_run
// ---------------------------------------------------------------

#[test]
fn success_passes_through_unchanged() {
    let run = parse_run(
        |_raw| {
            Ok(ParsedRun {
                markdown: "report body".to_string(),
                command_summary: "* ✅ `Bash`\n".to_string(),
                mcp_failures: vec!["b".to_string()],
                max_turns_hit: true,
                size_limit_reached: false,
                errors: Vec::new(),
                entries: Vec::new(),
            })
        },
        "claude",
        "raw",
    );
    assert_eq!(run.markdown, "report body");
    assert_eq!(run.mcp_failures, vec!["b"]);
    assert!(run.max_turns_hit);
}

#[test]
fn engine_failure_becomes_error_block() {
    let run = parse_run(|_raw| Err(anyhow!("boom")), "claude", "raw");
    assert!(run.markdown.contains("Error parsing claude log:"));
    assert!(run.markdown.contains("boom"));
    assert!(run.mcp_failures.is_empty());
    assert!(!run.max_turns_hit);
    assert!(run.entries.is_empty());
    assert!(run.command_summary.is_empty());
}

#[test]
fn error_context_chain_is_displayed() {
    let run = parse_run(
        |_raw| Err(anyhow!("bad byte").context("decoding header")),
        "codex",
        "raw",
    );
    assert!(run.markdown.contains("Error parsing codex log:"));
    assert!(run.markdown.contains("decoding header"));
    assert!(run.markdown.contains("bad byte"));
}
