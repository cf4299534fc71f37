use serde::Serialize;

use crate::counts::CollectionCount;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// One finished command, as reported to the user.
#[derive(Clone, Debug, Serialize)]
pub struct OutcomeRecord {
    pub command: String,
    pub target: String,
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<CollectionCount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl OutcomeRecord {
    pub fn new(command: &str, target: impl Into<String>, outcome: &str) -> Self {
        Self {
            command: command.to_string(),
            target: target.into(),
            outcome: outcome.to_string(),
            detail: None,
            count: None,
            data: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_count(mut self, count: CollectionCount) -> Self {
        self.count = Some(count);
        self
    }

    /// Attaches a JSON payload. Null and unserializable values are dropped.
    pub fn with_data(mut self, data: &impl Serialize) -> Self {
        self.data = serde_json::to_value(data).ok().filter(|v| !v.is_null());
        self
    }
}

pub fn render_text(records: &[OutcomeRecord]) -> Vec<u8> {
    let mut out = String::new();
    for r in records {
        out.push_str(&format!("{} {} {}", r.command, r.target, r.outcome));
        if let Some(count) = r.count {
            out.push_str(&format!(
                " owned={} swap={} total={}",
                count.owned,
                count.swap,
                count.total()
            ));
        }
        if let Some(detail) = r.detail.as_deref() {
            out.push_str(&format!(" ({detail})"));
        }
        out.push('\n');
        if let Some(data) = r.data.as_ref() {
            out.push_str(&serde_json::to_string_pretty(data).unwrap_or_default());
            out.push('\n');
        }
    }
    out.into_bytes()
}

pub fn render_json(records: &[OutcomeRecord]) -> Vec<u8> {
    let mut out = serde_json::to_vec_pretty(records).unwrap_or_else(|_| b"[]".to_vec());
    out.push(b'\n');
    out
}

pub fn render(format: OutputFormat, records: &[OutcomeRecord]) -> Vec<u8> {
    match format {
        OutputFormat::Text => render_text(records),
        OutputFormat::Json => render_json(records),
    }
}
