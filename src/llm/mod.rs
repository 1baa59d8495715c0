pub mod openai;

use anyhow::Result;

use crate::prompts::PromptSpec;

/// A single two-turn completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub temperature: f32,
    pub system: String,
    pub user: String,
}

impl ChatRequest {
    pub fn new(spec: &PromptSpec, user: impl Into<String>) -> Self {
        Self {
            model: spec.model.clone(),
            temperature: spec.temperature,
            system: spec.system.clone(),
            user: user.into(),
        }
    }
}

/// Text-completion oracle. Errors are transport/auth failures only.
#[async_trait::async_trait]
pub trait Llm: Send + Sync {
    async fn chat(&self, req: ChatRequest) -> Result<String>;
}
