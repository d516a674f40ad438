use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::http_client::HttpClientTrait;
use crate::domain::{ChatModel, DomainError, Message, MessageRole};

/// Chat model backed by an OpenAI-compatible chat completions endpoint
#[derive(Debug)]
pub struct OpenAiChatModel<C: HttpClientTrait> {
    client: C,
    model: String,
    name: String,
    auth_header: String,
    base_url: String,
    temperature: Option<f32>,
}

impl<C: HttpClientTrait> OpenAiChatModel<C> {
    pub fn new(
        client: C,
        model: impl Into<String>,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let model = model.into();
        let name = format!("openai:{}", model);
        let auth_header = format!("Bearer {}", api_key.into());
        let base_url: String = base_url.into();
        let base_url = base_url.trim_end_matches('/');
        // both `https://host` and `https://host/v1` are accepted
        let base_url = base_url.strip_suffix("/v1").unwrap_or(base_url).to_string();

        Self {
            client,
            model,
            name,
            auth_header,
            base_url,
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn build_request(&self, history: &[Message]) -> serde_json::Value {
        let messages: Vec<OpenAiMessage> = history.iter().map(OpenAiMessage::from_domain).collect();

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "stream": false,
        });

        if let Some(temperature) = self.temperature {
            body["temperature"] = serde_json::json!(temperature);
        }

        body
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<Message, DomainError> {
        let response: OpenAiResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::model_unavailable(&self.name, format!("malformed response: {}", e))
        })?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| DomainError::model_unavailable(&self.name, "no content in response"))?;

        Ok(Message::assistant(content))
    }
}

#[async_trait]
impl<C: HttpClientTrait> ChatModel for OpenAiChatModel<C> {
    async fn generate(&self, history: &[Message]) -> Result<Message, DomainError> {
        let url = self.chat_completions_url();
        let body = self.build_request(history);

        debug!(model = %self.model, messages = history.len(), "Calling chat completions");

        let response = self
            .client
            .post_json(&url, self.headers(), &body)
            .await
            .map_err(|e| DomainError::model_unavailable(&self.name, e.to_string()))?;

        self.parse_response(response)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Serialize)]
struct OpenAiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> OpenAiMessage<'a> {
    fn from_domain(message: &'a Message) -> Self {
        let role = match message.role() {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        };

        Self {
            role,
            content: message.content(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}
