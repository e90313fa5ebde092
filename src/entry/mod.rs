use serde::Deserialize;
use serde_json::Value;

// ===================================================================
// Log entries — one per structured event in an agent run transcript
// ===================================================================

/// A single structured event in an agent run log.
///
/// Discriminated by the `type` field. Raw inputs may carry `kind`
/// instead, or wrap initialization as `{"type":"system","subtype":"init"}`;
/// both shapes are normalized before typed decoding (see `parse_entries`).
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum LogEntry {
    #[serde(rename = "init")]
    Init(InitEntry),
    #[serde(rename = "assistant")]
    Assistant(ConversationEntry),
    #[serde(rename = "user")]
    User(ConversationEntry),
    #[serde(rename = "result")]
    Result(ResultEntry),
}

/// Session initialization: what the agent was started with.
///
/// Every field is defaulted; real-world init events vary widely and an
/// entry with nothing but the discriminator is still usable.
#[derive(Debug, Default, Deserialize)]
pub struct InitEntry {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub cwd: Option<String>,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub mcp_servers: Vec<McpServerStatus>,
    #[serde(default)]
    pub slash_commands: Option<Vec<String>>,
}

/// Declared status of one MCP server at session start.
#[derive(Debug, Deserialize)]
pub struct McpServerStatus {
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub stderr: Option<String>,
    #[serde(default)]
    pub exit_code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl McpServerStatus {
    pub fn failed(&self) -> bool {
        self.status.as_deref() == Some("failed")
    }

    /// Most specific failure detail available, if any.
    pub fn detail(&self) -> Option<String> {
        if let Some(text) = self
            .error
            .as_deref()
            .or(self.message.as_deref())
            .or(self.reason.as_deref())
            .or(self.stderr.as_deref())
        {
            return Some(text.to_string());
        }
        self.exit_code.map(|code| format!("exit code {code}"))
    }
}

// ===================================================================
// Conversation entries (assistant + user share the same shape)
// ===================================================================

#[derive(Debug, Default, Deserialize)]
pub struct ConversationEntry {
    /// Stream-format entries nest the payload under `message`.
    #[serde(default)]
    pub message: Option<Message>,
    /// Flat entries carry `content` at the top level.
    #[serde(default)]
    pub content: Option<MessageContent>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub content: Option<MessageContent>,
}

/// Content is either a plain string (user prompts) or an ordered list of
/// content blocks (assistant responses, tool results).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

impl ConversationEntry {
    fn payload(&self) -> Option<&MessageContent> {
        self.message
            .as_ref()
            .and_then(|m| m.content.as_ref())
            .or(self.content.as_ref())
    }

    /// The ordered content blocks, empty when the content is plain text.
    pub fn blocks(&self) -> &[ContentBlock] {
        match self.payload() {
            Some(MessageContent::Blocks(blocks)) => blocks,
            _ => &[],
        }
    }

    /// Plain text content, `None` when the content is a block list.
    pub fn text(&self) -> Option<&str> {
        match self.payload() {
            Some(MessageContent::Text(text)) => Some(text),
            _ => None,
        }
    }
}

// ===================================================================
// Content blocks inside conversation entries
// ===================================================================

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    #[serde(rename = "text")]
    Text(TextBlock),
    /// Present in real transcripts; carried but never rendered.
    #[serde(rename = "thinking")]
    Thinking,
    #[serde(rename = "tool_use")]
    ToolUse(ToolUseBlock),
    #[serde(rename = "tool_result")]
    ToolResult(ToolResultBlock),
    /// Unrecognized block types must not sink the sibling blocks.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
pub struct TextBlock {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ToolUseBlock {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub input: Value,
}

#[derive(Debug, Deserialize)]
pub struct ToolResultBlock {
    #[serde(default)]
    pub tool_use_id: String,
    #[serde(default)]
    pub content: Value,
    #[serde(default)]
    pub is_error: Option<bool>,
    #[serde(default)]
    pub duration_ms: Option<u64>,
}

// ===================================================================
// Final result entry (turn count, usage, errors)
// ===================================================================

#[derive(Debug, Default, Deserialize)]
pub struct ResultEntry {
    #[serde(default, alias = "turns")]
    pub num_turns: Option<u64>,
    #[serde(default)]
    pub duration_ms: Option<u64>,
    #[serde(default, alias = "cost_usd")]
    pub total_cost_usd: Option<f64>,
    #[serde(default)]
    pub usage: Option<Usage>,
    #[serde(default)]
    pub errors: Option<Vec<Value>>,
    #[serde(default)]
    pub permission_denials: Option<PermissionDenials>,
}

impl ResultEntry {
    /// Error list as displayable strings, in declared order.
    pub fn error_messages(&self) -> Vec<String> {
        self.errors
            .iter()
            .flatten()
            .map(|e| match e {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
    #[serde(default)]
    pub cache_read_input_tokens: u64,
    #[serde(default)]
    pub cache_creation_input_tokens: u64,
}

/// Permission denials appear either as a bare count or as a list of
/// denial records; only the count matters here.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PermissionDenials {
    Count(u64),
    List(Vec<Value>),
}

impl PermissionDenials {
    pub fn count(&self) -> u64 {
        match self {
            Self::Count(n) => *n,
            Self::List(items) => items.len() as u64,
        }
    }
}

// ===================================================================
// Tolerant parsing
// ===================================================================

/// Parse raw transcript text into ordered entries.
///
/// Ordered attempt list:
/// 1. The whole text is one JSON array: convert each element, skipping
///    unconvertible ones. An empty array is valid structure with zero
///    entries and still returns `Some`.
/// 2. Line-oriented: each non-blank line decodes independently; a line
///    whose first byte is `[` decodes as a batch array spliced in
///    sequence. Undecodable lines (interleaved free-text diagnostics)
///    are skipped silently.
///
/// Returns `None` only when the line pass recovers nothing at all.
pub fn parse_entries(raw: &str) -> Option<Vec<LogEntry>> {
    if let Some(entries) = parse_array(raw) {
        return Some(entries);
    }
    parse_lines(raw)
}

fn parse_array(raw: &str) -> Option<Vec<LogEntry>> {
    let value: Value = serde_json::from_str(raw).ok()?;
    let Value::Array(items) = value else {
        return None;
    };
    Some(items.into_iter().filter_map(entry_from_value).collect())
}

fn parse_lines(raw: &str) -> Option<Vec<LogEntry>> {
    let mut entries = Vec::new();
    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with('[') {
            let Ok(Value::Array(items)) = serde_json::from_str(line) else {
                continue;
            };
            entries.extend(items.into_iter().filter_map(entry_from_value));
        } else {
            let Ok(value) = serde_json::from_str::<Value>(line) else {
                continue;
            };
            if let Some(entry) = entry_from_value(value) {
                entries.push(entry);
            }
        }
    }
    if entries.is_empty() { None } else { Some(entries) }
}

/// Convert one decoded JSON value into a typed entry, normalizing the
/// discriminator first. Values that do not map to a known entry yield
/// `None` and are treated as noise by the callers.
fn entry_from_value(mut value: Value) -> Option<LogEntry> {
    let obj = value.as_object_mut()?;

    // `kind` is accepted as an alias for `type`.
    if !obj.contains_key("type") {
        let kind = obj.remove("kind")?;
        obj.insert("type".to_string(), kind);
    }

    // The stream format wraps initialization as a system event.
    if obj.get("type").and_then(Value::as_str) == Some("system") {
        if obj.get("subtype").and_then(Value::as_str) != Some("init") {
            return None;
        }
        obj.insert("type".to_string(), Value::String("init".to_string()));
    }

    serde_json::from_value(value).ok()
}
