//! Fixed instruction texts for the extraction and scoring agents.

use serde::{Deserialize, Serialize};

use crate::types::DimensionKey;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Instruction, model and temperature for one agent. Fixed once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptSpec {
    pub system: String,
    pub model: String,
    pub temperature: f32,
}

impl PromptSpec {
    pub fn new(system: impl Into<String>) -> Self {
        Self { system: system.into(), model: DEFAULT_MODEL.to_string(), temperature: DEFAULT_TEMPERATURE }
    }

    pub fn with_model(self, model: impl Into<String>) -> Self {
        Self { model: model.into(), ..self }
    }

    pub fn with_temperature(self, temperature: f32) -> Self {
        Self { temperature, ..self }
    }
}

/// The pair of specs driving one dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionPrompts {
    pub extract: PromptSpec,
    pub score: PromptSpec,
}

impl DimensionPrompts {
    pub fn for_dimension(key: DimensionKey) -> Self {
        let (extract, score) = match key {
            DimensionKey::Reach => (REACH_EXTRACT_PROMPT, REACH_SCORE_PROMPT),
            DimensionKey::Magnitude => (MAGNITUDE_EXTRACT_PROMPT, MAGNITUDE_SCORE_PROMPT),
            DimensionKey::Impact => (IMPACT_EXTRACT_PROMPT, IMPACT_SCORE_PROMPT),
        };
        Self { extract: PromptSpec::new(extract), score: PromptSpec::new(score) }
    }

    /// Apply model/temperature overrides to both specs.
    pub fn overridden(self, model: Option<&str>, temperature: Option<f32>) -> Self {
        let apply = |spec: PromptSpec| {
            let spec = match model {
                Some(m) => spec.with_model(m),
                None => spec,
            };
            match temperature {
                Some(t) => spec.with_temperature(t),
                None => spec,
            }
        };
        Self { extract: apply(self.extract), score: apply(self.score) }
    }
}

pub const REACH_EXTRACT_PROMPT: &str = r#"You are a Reach Agent. Return: {"Reach": {"level": "national/state/district", "languages": ["Hindi", "English"], "Designations" : ["Lecturer", "Principal", "Professor", "Chairman"], "Styles, Mediums, Variety" : ["..."]}}"#;

pub const REACH_SCORE_PROMPT: &str = r#"Score Reach from the given dictionary. Rules: district=1, state=2, national=3. 1 lang=1, 2 langs=2, >=3 langs=3. Return: {"score": X, "reason": "..."}"#;

pub const MAGNITUDE_EXTRACT_PROMPT: &str = r#"You are a Magnitude Agent. Return: {"Magnitude": {"Work Done": "in points format quantified aspect of work with specific names and numbers", "description": [...]}}"#;

pub const MAGNITUDE_SCORE_PROMPT: &str = r#"Score Magnitude: small=1, medium=2, large=3. Base it on the 'quantity' field. Return: {"score": X, "reason": "..."}"#;

pub const IMPACT_EXTRACT_PROMPT: &str = r#"You are an Impact Agent. Return:  {"Impact": {"achievements": [in points format...], "influence": "..."}}"#;

pub const IMPACT_SCORE_PROMPT: &str = r#"Score Impact on a scale of 1-3 based on how significant and far-reaching the achievements and influence are. Return: {"score": X, "reason": "..."}"#;
