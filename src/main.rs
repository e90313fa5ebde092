mod engine;
mod entry;
mod format;
mod preferences;
mod preview;
mod render;
mod report;
mod tools;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use engine::ParseOptions;
use entry::LogEntry;
use preferences::Preferences;
use preview::PreviewOptions;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Engine {
    Claude,
}

impl Engine {
    fn label(&self) -> &'static str {
        match self {
            Self::Claude => "claude",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Markdown,
    Plain,
    Terminal,
}

#[derive(Parser)]
#[command(
    name = "runrecap",
    about = "Summarize an AI coding-agent run log into a bounded report"
)]
struct Cli {
    /// Path to the agent run log.
    log: PathBuf,

    /// Agent engine that produced the log.
    #[arg(long, value_enum, default_value = "claude")]
    engine: Engine,

    /// Output flavor.
    #[arg(long, value_enum, default_value = "markdown")]
    format: ReportFormat,

    /// Turn budget for the turn-limit check.
    #[arg(long)]
    turn_budget: Option<u64>,

    /// Newline-delimited safe-output records to preview after the report.
    #[arg(long)]
    safe_outputs: Option<PathBuf>,

    /// Preferences file (defaults to runrecap.toml next to the log).
    #[arg(long)]
    config: Option<PathBuf>,
}

fn first_init(entries: &[LogEntry]) -> Option<&entry::InitEntry> {
    entries.iter().find_map(|e| match e {
        LogEntry::Init(init) => Some(init),
        _ => None,
    })
}

fn run(cli: &Cli) -> Result<()> {
    let raw = fs::read_to_string(&cli.log)
        .with_context(|| format!("reading log {}", cli.log.display()))?;
    let dir = cli.log.parent().unwrap_or(Path::new("."));
    let prefs = match &cli.config {
        Some(path) => Preferences::load_file(path)?,
        None => Preferences::load(dir)?,
    };

    let opts = ParseOptions {
        turn_budget: cli.turn_budget,
        size_limit: prefs.size_limit,
    };
    let label = cli.engine.label();
    let parsed = report::parse_run(|raw| engine::parse_claude_log(raw, &opts), label, &raw);

    match cli.format {
        ReportFormat::Markdown => {
            let init = first_init(&parsed.entries);
            let title = prefs.render_title(
                dir,
                label,
                init.and_then(|i| i.model.as_deref()),
                init.and_then(|i| i.session_id.as_deref()),
            )?;
            println!("# {title}\n");
            println!("{}", parsed.markdown);
            if !parsed.command_summary.is_empty() {
                println!("## Commands\n\n{}", parsed.command_summary);
            }
        }
        ReportFormat::Plain if parsed.entries.is_empty() => println!("{}", parsed.markdown),
        ReportFormat::Terminal if parsed.entries.is_empty() => println!("{}", parsed.markdown),
        ReportFormat::Plain => {
            println!("{}", render::render_plain(&parsed.entries, prefs.max_output_lines));
        }
        ReportFormat::Terminal => {
            println!("{}", render::render_terminal(&parsed.entries, prefs.max_output_lines));
        }
    }

    if let Some(path) = &cli.safe_outputs {
        let records = fs::read_to_string(path)
            .with_context(|| format!("reading safe outputs {}", path.display()))?;
        let preview = preview::format_preview(
            &records,
            &PreviewOptions {
                max_entries: prefs.max_preview_entries,
                plain: cli.format != ReportFormat::Markdown,
            },
        );
        if !preview.is_empty() {
            if cli.format == ReportFormat::Markdown {
                println!("## Pending safe outputs\n\n{preview}");
            } else {
                println!("--- Pending safe outputs ---\n{preview}");
            }
        }
    }

    for name in &parsed.mcp_failures {
        eprintln!("runrecap: MCP server failed: {name}");
    }
    if parsed.max_turns_hit {
        eprintln!("runrecap: turn limit reached");
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("runrecap: {err:#}");
        process::exit(2);
    }
}
