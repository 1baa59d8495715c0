use anyhow::Result;
use serde_json::Value;
use std::sync::Arc;

use crate::llm::{ChatRequest, Llm};
use crate::prompts::PromptSpec;
use crate::types::{CategorizedRecord, DimensionKey};

/// Turns free-text profiles into a [`CategorizedRecord`] for one dimension.
#[derive(Clone)]
pub struct Extractor {
    dimension: DimensionKey,
    llm: Arc<dyn Llm>,
    spec: PromptSpec,
}

impl Extractor {
    pub fn new(dimension: DimensionKey, llm: Arc<dyn Llm>, spec: PromptSpec) -> Self {
        Self { dimension, llm, spec }
    }

    pub fn spec(&self) -> &PromptSpec {
        &self.spec
    }

    /// One oracle call. Only transport failures are returned as errors; an
    /// unusable response degrades to `{"error": <raw>}`.
    pub async fn run(&self, profile: &str) -> Result<CategorizedRecord> {
        tracing::debug!(dimension = %self.dimension, model = %self.spec.model, "extracting");
        let raw = self.llm.chat(ChatRequest::new(&self.spec, profile.trim())).await?;
        let record = parse_extraction_response(&raw);
        if record.is_degraded() {
            tracing::warn!(dimension = %self.dimension, "extraction response was not a JSON object");
        }
        Ok(record)
    }
}

pub fn parse_extraction_response(raw: &str) -> CategorizedRecord {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => CategorizedRecord::from(map),
        _ => CategorizedRecord::degraded(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    struct Recording {
        reply: &'static str,
        seen: Mutex<Vec<ChatRequest>>,
    }

    #[async_trait::async_trait]
    impl Llm for Recording {
        async fn chat(&self, req: ChatRequest) -> Result<String> {
            self.seen.lock().unwrap().push(req);
            Ok(self.reply.to_string())
        }
    }

    fn recording(reply: &'static str) -> Arc<Recording> {
        Arc::new(Recording { reply, seen: Mutex::new(vec![]) })
    }

    #[test]
    fn object_responses_parse_as_is() {
        let rec = parse_extraction_response(r#"{"Reach": {"level": "state", "languages": ["Hindi"]}}"#);
        assert_eq!(rec.get("Reach").unwrap()["level"], "state");
        assert!(!rec.is_degraded());
    }

    #[test]
    fn non_json_degrades_to_error_record() {
        let rec = parse_extraction_response("not json at all");
        assert_eq!(serde_json::to_value(&rec).unwrap(), json!({"error": "not json at all"}));
    }

    #[test]
    fn arrays_and_scalars_also_degrade() {
        for raw in [r#"["a", "b"]"#, "42", r#""text""#, "null", ""] {
            let rec = parse_extraction_response(raw);
            assert_eq!(rec.error(), Some(raw), "input {raw:?}");
            assert_eq!(rec.0.len(), 1);
        }
    }

    #[test]
    fn degraded_text_is_kept_verbatim() {
        let raw = "  Sorry, I cannot help.\n";
        assert_eq!(parse_extraction_response(raw).error(), Some(raw));
    }

    #[tokio::test]
    async fn run_sends_trimmed_profile_with_spec() {
        let llm = recording(r#"{"Impact": {"influence": "regional"}}"#);
        let spec = PromptSpec::new("You are an Impact Agent.").with_temperature(0.2);
        let ex = Extractor::new(DimensionKey::Impact, llm.clone(), spec);

        let rec = ex.run("   Sang in 4 languages.\n\n").await.unwrap();
        assert_eq!(rec.get("Impact").unwrap()["influence"], "regional");

        let seen = llm.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].user, "Sang in 4 languages.");
        assert_eq!(seen[0].system, "You are an Impact Agent.");
        assert_eq!(seen[0].temperature, 0.2);
        assert_eq!(seen[0].model, "gpt-4o-mini");
    }

    #[tokio::test]
    async fn run_never_fails_on_bad_output() {
        let ex = Extractor::new(DimensionKey::Reach, recording("```json\n{}\n```"), PromptSpec::new("s"));
        let rec = ex.run("profile").await.unwrap();
        assert!(rec.is_degraded());
    }
}
