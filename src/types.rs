use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// One of the three fixed evaluation axes. Serialized with the short codes
/// (`Rec`, `Mag`, `Imp`) used as report keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DimensionKey {
    #[serde(rename = "Rec")]
    Reach,
    #[serde(rename = "Mag")]
    Magnitude,
    #[serde(rename = "Imp")]
    Impact,
}

impl DimensionKey {
    pub const ALL: [DimensionKey; 3] = [DimensionKey::Reach, DimensionKey::Magnitude, DimensionKey::Impact];

    pub fn code(self) -> &'static str {
        match self {
            DimensionKey::Reach => "Rec",
            DimensionKey::Magnitude => "Mag",
            DimensionKey::Impact => "Imp",
        }
    }

    /// Human-facing label used by the presentation surfaces.
    pub fn label(self) -> &'static str {
        match self {
            DimensionKey::Reach => "Reach",
            DimensionKey::Magnitude => "Magnitude",
            DimensionKey::Impact => "Impact",
        }
    }
}

impl fmt::Display for DimensionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DimensionKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rec" | "reach" => Ok(DimensionKey::Reach),
            "mag" | "magnitude" => Ok(DimensionKey::Magnitude),
            "imp" | "impact" => Ok(DimensionKey::Impact),
            other => Err(format!("unknown dimension {other:?} (expected rec, mag or imp)")),
        }
    }
}

/// Open-ended extraction output. Always a JSON object; the shape inside is
/// whatever the model returned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategorizedRecord(pub Map<String, Value>);

impl CategorizedRecord {
    /// Record produced when the extraction response was not a JSON object.
    pub fn degraded(raw: &str) -> Self {
        let mut map = Map::new();
        map.insert("error".to_string(), Value::String(raw.to_string()));
        Self(map)
    }

    pub fn error(&self) -> Option<&str> {
        self.0.get("error").and_then(Value::as_str)
    }

    pub fn is_degraded(&self) -> bool {
        self.0.len() == 1 && self.error().is_some()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

impl From<Map<String, Value>> for CategorizedRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// 1..=3, or null when the response could not be interpreted.
    pub score: Option<u8>,
    #[serde(default)]
    pub reason: String,
    /// Any additional keys the scorer returned.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ScoreResult {
    pub fn unscored(reason: impl Into<String>) -> Self {
        Self { score: None, reason: reason.into(), extra: Map::new() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionResult {
    pub categorized: CategorizedRecord,
    pub score: ScoreResult,
}

/// Outcome of one evaluation run: one entry per dimension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvaluationReport {
    pub results: BTreeMap<DimensionKey, DimensionResult>,
}

impl EvaluationReport {
    pub fn get(&self, key: DimensionKey) -> Option<&DimensionResult> {
        self.results.get(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DimensionKey, &DimensionResult)> {
        self.results.iter()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
