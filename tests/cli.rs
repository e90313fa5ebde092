mod common;

use common::{run_cli, write_fixture_log, write_safe_outputs};
use std::fs;

#[test]
fn markdown_report_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_fixture_log(dir.path());

    let (code, stdout, stderr) = run_cli(&[log.to_str().unwrap()]);
    assert_eq!(code, 0, "stderr: {stderr}");
    assert!(stdout.starts_with("# Agent run report (claude)"), "stdout: {stdout}");
    assert!(stdout.contains("🚀 Initialization"));
    assert!(stdout.contains("Listing the workspace."));
    assert!(stdout.contains("## Commands"));
    assert!(stdout.contains("✅ `Bash`"));
    assert!(stderr.contains("MCP server failed: deepwiki"));
}

#[test]
fn missing_log_exits_nonzero() {
    let (code, _, stderr) = run_cli(&["/no/such/file.log"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("reading log"));
}

#[test]
fn turn_budget_controls_the_limit_notice() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_fixture_log(dir.path());

    let (code, _, stderr) = run_cli(&[log.to_str().unwrap(), "--turn-budget", "5"]);
    assert_eq!(code, 0);
    assert!(stderr.contains("turn limit reached"));

    let (code, _, stderr) = run_cli(&[log.to_str().unwrap(), "--turn-budget", "10"]);
    assert_eq!(code, 0);
    assert!(!stderr.contains("turn limit reached"));
}

#[test]
fn unrecognized_log_renders_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("noise.log");
    fs::write(&log, "free text only\nmore noise\n").unwrap();

    let (code, stdout, _) = run_cli(&[log.to_str().unwrap()]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Log format not recognized."));
}

#[test]
fn title_template_from_adjacent_config() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_fixture_log(dir.path());
    fs::write(
        dir.path().join("runrecap.toml"),
        "[title_template]\ninline = \"Recap of {{ engine }} ({{ model }})\"\n",
    )
    .unwrap();

    let (code, stdout, _) = run_cli(&[log.to_str().unwrap()]);
    assert_eq!(code, 0);
    assert!(stdout.starts_with("# Recap of claude (claude-opus-4-5)"), "stdout: {stdout}");
}

#[test]
fn explicit_config_path_wins() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_fixture_log(dir.path());
    let config = dir.path().join("custom.toml");
    fs::write(&config, "[title_template]\ninline = \"Custom title\"\n").unwrap();

    let (code, stdout, _) = run_cli(&[
        log.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ]);
    assert_eq!(code, 0);
    assert!(stdout.starts_with("# Custom title"));
}

#[test]
fn broken_config_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_fixture_log(dir.path());
    fs::write(dir.path().join("runrecap.toml"), "not = [valid").unwrap();

    let (code, _, stderr) = run_cli(&[log.to_str().unwrap()]);
    assert_eq!(code, 2);
    assert!(stderr.contains("parsing"));
}

#[test]
fn safe_outputs_preview_is_appended() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_fixture_log(dir.path());
    let outputs = write_safe_outputs(dir.path(), 3);

    let (code, stdout, _) = run_cli(&[
        log.to_str().unwrap(),
        "--safe-outputs",
        outputs.to_str().unwrap(),
    ]);
    assert_eq!(code, 0);
    assert!(stdout.contains("## Pending safe outputs"));
    assert!(stdout.contains("**3 total entries**"));
    assert!(stdout.contains("**create-issue**: Found problem 0"));
}
