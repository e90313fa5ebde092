use serde_json::Value;

pub const DEFAULT_MAX_FIELDS: usize = 4;
pub const DEFAULT_OUTPUT_LIMIT: usize = 256;

/// Longest rendered value inside a parameter gist, in chars.
const VALUE_CAP: usize = 80;

/// Inline array rendering switches to a count past this many elements.
const INLINE_ARRAY_MAX: usize = 3;

// ===================================================================
// Parameter gists — compact single-line rendering of tool inputs
// ===================================================================

/// Render a tool input as a compact `key: value, key: value` line.
///
/// At most `max_fields` pairs are emitted in insertion order, with a
/// trailing `...` when more exist. Non-object inputs render as a single
/// capped value; null renders as nothing.
pub fn format_parameters(input: &Value, max_fields: usize) -> String {
    let map = match input {
        Value::Null => return String::new(),
        Value::Object(map) => map,
        other => return ellipsize(&scalar_text(other), VALUE_CAP),
    };
    let mut parts: Vec<String> = map
        .iter()
        .take(max_fields)
        .map(|(key, value)| format!("{key}: {}", ellipsize(&render_value(value), VALUE_CAP)))
        .collect();
    if map.len() > max_fields {
        parts.push("...".to_string());
    }
    parts.join(", ")
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => {
            let shown: Vec<String> = items
                .iter()
                .take(INLINE_ARRAY_MAX)
                .map(scalar_text)
                .collect();
            if items.len() <= INLINE_ARRAY_MAX {
                format!("[{}]", shown.join(", "))
            } else {
                format!("[{}, ...{} more]", shown.join(", "), items.len() - INLINE_ARRAY_MAX)
            }
        }
        Value::Object(_) => value.to_string(),
        other => scalar_text(other),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        // Display on Value emits compact JSON for every other shape.
        other => other.to_string(),
    }
}

// ===================================================================
// Truncation
// ===================================================================

/// Cap a string at `max` chars, appending `...` when cut.
pub fn ellipsize(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((byte_idx, _)) => format!("{}...", &s[..byte_idx]),
    }
}

/// Byte-exact output truncation: content longer than `max_len` is cut at
/// the nearest char boundary at or below `max_len` and marked; content at
/// or under the limit is returned untouched.
pub fn truncate_output(content: &str, max_len: usize) -> String {
    if content.len() <= max_len {
        return content.to_string();
    }
    let mut cut = max_len;
    while cut > 0 && !content.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}... (truncated)", &content[..cut])
}

// ===================================================================
// Result payload flattening
// ===================================================================

/// Flatten a tool result payload to displayable text. Payloads arrive as
/// plain strings, as arrays of text blocks, or as arbitrary values.
pub fn content_text(content: &Value) -> String {
    match content {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Object(obj) => obj
                    .get("text")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| item.to_string()),
                other => scalar_text(other),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        other => other.to_string(),
    }
}

// ===================================================================
// Small display helpers shared by the renderers
// ===================================================================

pub fn fmt_duration(ms: u64) -> String {
    if ms < 1000 {
        format!("{ms}ms")
    } else {
        format!("{:.1}s", ms as f64 / 1000.0)
    }
}

pub fn fmt_cost(usd: f64) -> String {
    format!("${usd:.4}")
}

#[cfg(test)]
mod tests;
