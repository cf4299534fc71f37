use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

/// One selectable version of a collectible: id plus three display fields
/// (typically year, mint mark and remark).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "(Value, Value, Value, Value)")]
pub struct VersionRow {
    pub id: u32,
    pub fields: [String; 3],
}

impl VersionRow {
    pub fn new(id: u32, a: &str, b: &str, c: &str) -> Self {
        Self {
            id,
            fields: [a.to_string(), b.to_string(), c.to_string()],
        }
    }

    pub fn label(&self) -> String {
        format!("{} {} {}", self.fields[0], self.fields[1], self.fields[2])
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl TryFrom<(Value, Value, Value, Value)> for VersionRow {
    type Error = String;

    fn try_from(raw: (Value, Value, Value, Value)) -> Result<Self, Self::Error> {
        let id = match &raw.0 {
            Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
        .ok_or_else(|| format!("invalid version id {}", raw.0))?;
        Ok(Self {
            id,
            fields: [value_text(&raw.1), value_text(&raw.2), value_text(&raw.3)],
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct CollectibleVersions {
    #[serde(default)]
    pub versions: Vec<VersionRow>,
}

/// Read-only map from collectible id to its known versions. Keys in the
/// JSON form are `c<id>`, as published in the page data.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VersionCatalog {
    entries: HashMap<u32, CollectibleVersions>,
}

impl VersionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, collectible: u32, versions: Vec<VersionRow>) {
        self.entries
            .insert(collectible, CollectibleVersions { versions });
    }

    pub fn versions(&self, collectible: u32) -> Option<&[VersionRow]> {
        self.entries
            .get(&collectible)
            .map(|e| e.versions.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn from_json(raw: &str) -> Result<Self, String> {
        let parsed: HashMap<String, CollectibleVersions> =
            serde_json::from_str(raw).map_err(|e| format!("invalid version catalog: {e}"))?;
        let mut entries = HashMap::new();
        for (key, versions) in parsed {
            let id = key
                .strip_prefix('c')
                .unwrap_or(&key)
                .parse::<u32>()
                .map_err(|_| format!("invalid collectible key '{key}'"))?;
            entries.insert(id, versions);
        }
        Ok(Self { entries })
    }

    pub fn load(path: &Path) -> Result<Self, String> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read version catalog '{}': {e}", path.display()))?;
        Self::from_json(&raw)
    }
}
