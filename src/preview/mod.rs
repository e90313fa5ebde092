use crate::format::ellipsize;
use serde::Deserialize;
use serde_json::{Map, Value};

// Display caps per mode, in chars.
const PLAIN_TITLE_CAP: usize = 60;
const PLAIN_BODY_CAP: usize = 80;
const RICH_TITLE_CAP: usize = 128;
const RICH_BODY_CAP: usize = 256;

/// One pending downstream action record, independent of the transcript
/// format: a `type` discriminator plus whatever fields the producer set.
#[derive(Debug, Deserialize)]
pub struct PreviewEntry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone)]
pub struct PreviewOptions {
    pub max_entries: usize,
    pub plain: bool,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            max_entries: 10,
            plain: false,
        }
    }
}

/// Format a bounded preview of newline-delimited action records.
///
/// Malformed lines are skipped silently, matching the transcript
/// tolerance policy. The total count reflects all decodable records,
/// counted before truncation. Empty input yields an empty string.
pub fn format_preview(raw: &str, opts: &PreviewOptions) -> String {
    let entries: Vec<PreviewEntry> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect();
    if entries.is_empty() {
        return String::new();
    }

    let total = entries.len();
    let (title_cap, body_cap) = if opts.plain {
        (PLAIN_TITLE_CAP, PLAIN_BODY_CAP)
    } else {
        (RICH_TITLE_CAP, RICH_BODY_CAP)
    };

    let mut out = if opts.plain {
        format!("{total} total entries\n")
    } else {
        format!("**{total} total entries**\n\n")
    };

    for (i, entry) in entries.iter().take(opts.max_entries).enumerate() {
        let kind = if opts.plain {
            entry.kind.clone()
        } else {
            format!("**{}**", entry.kind)
        };
        match &entry.title {
            Some(title) => {
                out.push_str(&format!("{}. {kind}: {}\n", i + 1, ellipsize(title, title_cap)));
            }
            None => out.push_str(&format!("{}. {kind}\n", i + 1)),
        }
        if let Some(body) = &entry.body {
            let flat = body.replace('\n', " ");
            let trimmed = flat.trim();
            if !trimmed.is_empty() {
                out.push_str(&format!("   {}\n", ellipsize(trimmed, body_cap)));
            }
        }
    }

    if total > opts.max_entries {
        out.push_str(&format!("... and {} more entries\n", total - opts.max_entries));
    }
    out
}
