use anyhow::{Context, Result};
use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use std::time::Duration;

use super::{ChatRequest, Llm};

/// Connection settings for the OpenAI-compatible endpoint. Unset fields fall
/// back to the `async-openai` defaults (`OPENAI_API_KEY`, api.openai.com).
#[derive(Debug, Clone, Default)]
pub struct LlmSettings {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Clone)]
pub struct LlmClient {
    client: Client<OpenAIConfig>,
}

impl LlmClient {
    pub fn new(settings: LlmSettings) -> Result<Self> {
        let mut cfg = OpenAIConfig::default();
        if let Some(url) = settings.base_url { cfg = cfg.with_api_base(url); }
        if let Some(key) = settings.api_key { cfg = cfg.with_api_key(key); }
        let mut client = Client::with_config(cfg);
        if let Some(secs) = settings.timeout_secs {
            let http = reqwest::Client::builder()
                .timeout(Duration::from_secs(secs))
                .build()
                .context("building http client")?;
            client = client.with_http_client(http);
        }
        Ok(Self { client })
    }

    fn messages(req: &ChatRequest) -> Result<Vec<ChatCompletionRequestMessage>> {
        let system = ChatCompletionRequestSystemMessageArgs::default()
            .content(req.system.as_str())
            .build()?
            .into();
        let user = ChatCompletionRequestUserMessageArgs::default()
            .content(req.user.as_str())
            .build()?
            .into();
        Ok(vec![system, user])
    }
}

#[async_trait::async_trait]
impl Llm for LlmClient {
    async fn chat(&self, req: ChatRequest) -> Result<String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(req.model.as_str())
            .messages(Self::messages(&req)?)
            .temperature(req.temperature)
            .build()?;
        tracing::trace!(model = %req.model, "sending chat completion");
        let resp = self
            .client
            .chat()
            .create(request)
            .await
            .with_context(|| format!("chat completion with model {} failed", req.model))?;
        let choice = resp
            .choices
            .into_iter()
            .next()
            .context("chat completion returned no choices")?;
        Ok(choice.message.content.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::PromptSpec;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> LlmClient {
        LlmClient::new(LlmSettings {
            api_key: Some("test-key".into()),
            base_url: Some(server.uri()),
            timeout_secs: Some(5),
        })
        .unwrap()
    }

    fn completion(content: &str) -> serde_json::Value {
        json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 1_700_000_000u32,
            "model": "gpt-4o-mini",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        })
    }

    #[tokio::test]
    async fn chat_returns_first_choice_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(json!({"model": "gpt-4o-mini"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(r#"{"Reach": {"level": "state"}}"#)))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let spec = PromptSpec::new("You are a Reach Agent.");
        let text = client.chat(ChatRequest::new(&spec, "profile")).await.unwrap();
        assert_eq!(text, r#"{"Reach": {"level": "state"}}"#);
    }

    #[tokio::test]
    async fn auth_failure_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {
                    "message": "Incorrect API key provided",
                    "type": "invalid_request_error",
                    "param": null,
                    "code": "invalid_api_key"
                }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .chat(ChatRequest::new(&PromptSpec::new("sys"), "profile"))
            .await
            .expect_err("401 must surface as an error");
        assert!(format!("{err:#}").contains("gpt-4o-mini"));
    }

    #[tokio::test]
    async fn empty_choices_is_an_error() {
        let server = MockServer::start().await;
        let mut body = completion("");
        body["choices"] = json!([]);
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .chat(ChatRequest::new(&PromptSpec::new("sys"), "profile"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no choices"));
    }
}
