use anyhow::Result;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::literal::parse_literal;
use crate::llm::{ChatRequest, Llm};
use crate::prompts::PromptSpec;
use crate::types::{CategorizedRecord, DimensionKey, ScoreResult};

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 3;

/// Holds a score value the oracle sent that is not a whole number in range.
pub const RAW_SCORE_KEY: &str = "raw_score";

/// Judges a [`CategorizedRecord`] against a rubric held in its [`PromptSpec`].
#[derive(Clone)]
pub struct Scorer {
    dimension: DimensionKey,
    llm: Arc<dyn Llm>,
    spec: PromptSpec,
}

impl Scorer {
    pub fn new(dimension: DimensionKey, llm: Arc<dyn Llm>, spec: PromptSpec) -> Self {
        Self { dimension, llm, spec }
    }

    pub fn spec(&self) -> &PromptSpec {
        &self.spec
    }

    pub async fn run(&self, record: &CategorizedRecord) -> Result<ScoreResult> {
        let user = serde_json::to_string(record)?;
        tracing::debug!(dimension = %self.dimension, model = %self.spec.model, "scoring");
        let raw = self.llm.chat(ChatRequest::new(&self.spec, user)).await?;
        let result = parse_score_response(&raw);
        if result.score.is_none() {
            tracing::warn!(dimension = %self.dimension, "score response yielded no usable score");
        }
        Ok(result)
    }
}

type ParseTier = fn(&str) -> Option<Map<String, Value>>;

/// Tried in order; the first tier returning an object wins.
const PARSE_CHAIN: [(&str, ParseTier); 2] =
    [("embedded_json", embedded_json_object), ("literal", literal_object)];

/// Total: always yields a result, falling back to the trimmed text as reason.
pub fn parse_score_response(raw: &str) -> ScoreResult {
    for (tier, parse) in PARSE_CHAIN {
        if let Some(obj) = parse(raw) {
            tracing::trace!(tier, "score response parsed");
            return score_from_object(obj);
        }
    }
    ScoreResult::unscored(raw.trim())
}

/// The JSON object opening at the first `{` in `raw`, read with a streaming
/// deserializer so trailing prose and nested braces are fine. Later braces
/// are not tried; a failure here hands the whole text to the literal tier.
pub(crate) fn embedded_json_object(raw: &str) -> Option<Map<String, Value>> {
    let start = raw.find('{')?;
    let mut values = serde_json::Deserializer::from_str(&raw[start..]).into_iter::<Value>();
    match values.next() {
        Some(Ok(Value::Object(obj))) => Some(obj),
        _ => None,
    }
}

pub(crate) fn literal_object(raw: &str) -> Option<Map<String, Value>> {
    match parse_literal(raw.trim()) {
        Ok(Value::Object(obj)) => Some(obj),
        _ => None,
    }
}

fn score_from_object(mut obj: Map<String, Value>) -> ScoreResult {
    let score = match obj.remove("score") {
        Some(v) => {
            let score = coerce_score(&v);
            if score.is_none() && !v.is_null() {
                obj.insert(RAW_SCORE_KEY.to_string(), v);
            }
            score
        }
        None => None,
    };
    let reason = match obj.remove("reason") {
        Some(Value::String(s)) => s,
        None | Some(Value::Null) => String::new(),
        Some(other) => other.to_string(),
    };
    ScoreResult { score, reason, extra: obj }
}

fn coerce_score(v: &Value) -> Option<u8> {
    let n = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Null => return None,
        _ => {
            tracing::warn!(value = %v, "non-numeric score");
            return None;
        }
    };
    if n.fract() != 0.0 || n < f64::from(MIN_SCORE) || n > f64::from(MAX_SCORE) {
        tracing::warn!(value = %v, "score outside 1..=3");
        return None;
    }
    Some(n as u8)
}
