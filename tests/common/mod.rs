use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

pub fn run_cli(args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_runrecap"))
        .args(args)
        .output()
        .expect("failed to spawn binary");
    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

/// Write a representative run log into `dir` and return its path.
/// The log mixes structured lines with free-text diagnostic noise.
pub fn write_fixture_log(dir: &Path) -> PathBuf {
    let session_id = uuid::Uuid::new_v4().to_string();
    let tool_id = format!("toolu_{}", uuid::Uuid::new_v4().simple());
    let lines = [
        json!({
            "type": "system",
            "subtype": "init",
            "session_id": session_id,
            "model": "claude-opus-4-5",
            "cwd": "/work",
            "tools": ["Bash", "Read"],
            "mcp_servers": [
                { "name": "github", "status": "connected" },
                { "name": "deepwiki", "status": "failed", "error": "connection refused" }
            ]
        }),
        json!({ "type": "assistant", "message": { "content": [
            { "type": "text", "text": "Listing the workspace." },
            { "type": "tool_use", "id": tool_id, "name": "Bash",
              "input": { "command": "ls" } }
        ]}}),
        json!({ "type": "user", "message": { "content": [
            { "type": "tool_result", "tool_use_id": tool_id, "content": "src\ntests" }
        ]}}),
        json!({ "type": "result", "num_turns": 5, "duration_ms": 12000,
                "total_cost_usd": 0.03,
                "usage": { "input_tokens": 100, "output_tokens": 40 } }),
    ];
    let mut contents = String::from("[debug] launching agent\n");
    for line in &lines {
        contents.push_str(&serde_json::to_string(line).unwrap());
        contents.push('\n');
    }
    let path = dir.join("agent.log");
    fs::write(&path, contents).unwrap();
    path
}

/// Write a newline-delimited safe-output records file with `n` entries.
pub fn write_safe_outputs(dir: &Path, n: usize) -> PathBuf {
    let mut contents = String::new();
    for i in 0..n {
        let record = json!({
            "type": "create-issue",
            "title": format!("Found problem {i}"),
            "body": format!("Details for problem {i}")
        });
        contents.push_str(&serde_json::to_string(&record).unwrap());
        contents.push('\n');
    }
    let path = dir.join("safe_outputs.jsonl");
    fs::write(&path, contents).unwrap();
    path
}
