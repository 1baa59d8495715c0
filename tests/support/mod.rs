#![allow(dead_code)]

use anyhow::Result;
use artiscore_rs::llm::{ChatRequest, Llm};
use artiscore_rs::prompts::{
    IMPACT_EXTRACT_PROMPT, IMPACT_SCORE_PROMPT, MAGNITUDE_EXTRACT_PROMPT, MAGNITUDE_SCORE_PROMPT, REACH_EXTRACT_PROMPT,
    REACH_SCORE_PROMPT,
};
use async_trait::async_trait;
use std::sync::Mutex;

pub struct FakeLlm {
    // maps each request to the raw completion text
    pub handler: Box<dyn Fn(&ChatRequest) -> Result<String> + Send + Sync>,
    pub delay_ms: u64,
    pub calls: Mutex<Vec<ChatRequest>>,
}

impl FakeLlm {
    pub fn new(handler: impl Fn(&ChatRequest) -> Result<String> + Send + Sync + 'static) -> Self {
        Self { handler: Box::new(handler), delay_ms: 0, calls: Mutex::new(vec![]) }
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn calls(&self) -> Vec<ChatRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Llm for FakeLlm {
    async fn chat(&self, req: ChatRequest) -> Result<String> {
        use tokio::time::{sleep, Duration};
        if self.delay_ms > 0 { sleep(Duration::from_millis(self.delay_ms)).await; }
        self.calls.lock().unwrap().push(req.clone());
        (self.handler)(&req)
    }
}

/// Canned well-behaved answers keyed on which default prompt is in use.
pub fn scripted(req: &ChatRequest) -> Result<String> {
    let out = match req.system.as_str() {
        REACH_EXTRACT_PROMPT => r#"{"Reach": {"level": "state", "languages": ["Hindi", "English"]}}"#,
        MAGNITUDE_EXTRACT_PROMPT => r#"{"Magnitude": {"Work Done": "120 concerts", "description": ["tours"]}}"#,
        IMPACT_EXTRACT_PROMPT => r#"{"Impact": {"achievements": ["state award"], "influence": "regional"}}"#,
        REACH_SCORE_PROMPT => r#"{"score": 2, "reason": "state level"}"#,
        MAGNITUDE_SCORE_PROMPT => r#"Here you go: {"score": 3, "reason": "large body of work"} Thanks."#,
        IMPACT_SCORE_PROMPT => "{'score': 1, 'reason': 'limited influence'}",
        other => anyhow::bail!("unexpected system prompt: {other}"),
    };
    Ok(out.to_string())
}

pub const PROFILE: &str =
    "  Classical vocalist from Pune. Performed 120 concerts in Hindi and English. State award 2019.  ";
