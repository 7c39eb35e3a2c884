use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::http_client::HttpClientTrait;
use crate::domain::{DomainError, LlmProvider, LlmRequest, LlmResponse, Message, Usage};

pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";

/// Local Ollama server provider (`/api/chat`, non-streaming)
#[derive(Debug)]
pub struct OllamaProvider<C: HttpClientTrait> {
    client: C,
    base_url: String,
}

impl<C: HttpClientTrait> OllamaProvider<C> {
    pub fn new(client: C) -> Self {
        Self::with_base_url(client, DEFAULT_OLLAMA_HOST)
    }

    pub fn with_base_url(client: C, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }

    fn build_request(&self, model: &str, request: &LlmRequest) -> serde_json::Value {
        let messages: Vec<OllamaMessage> =
            request.messages.iter().map(OllamaMessage::from_domain).collect();

        let mut body = serde_json::json!({
            "model": model,
            "messages": messages,
            "stream": false,
        });

        let mut options = serde_json::Map::new();
        if let Some(temp) = request.temperature {
            options.insert("temperature".to_string(), serde_json::json!(temp));
        }
        if let Some(max_tokens) = request.max_tokens {
            options.insert("num_predict".to_string(), serde_json::json!(max_tokens));
        }
        if !options.is_empty() {
            body["options"] = serde_json::Value::Object(options);
        }

        body
    }

    fn parse_response(&self, model: &str, json: serde_json::Value) -> Result<LlmResponse, DomainError> {
        let response: OllamaResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("ollama", format!("Failed to parse response: {}", e))
        })?;

        let model = response.model.unwrap_or_else(|| model.to_string());
        let id = response.created_at.unwrap_or_default();
        let mut llm_response =
            LlmResponse::new(id, model, Message::assistant(response.message.content));

        if let (Some(prompt), Some(completion)) = (response.prompt_eval_count, response.eval_count) {
            llm_response = llm_response.with_usage(Usage::new(prompt, completion));
        }

        Ok(llm_response)
    }
}

#[async_trait]
impl<C: HttpClientTrait> LlmProvider for OllamaProvider<C> {
    async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError> {
        let url = self.chat_url();
        let body = self.build_request(model, &request);
        let response = self
            .client
            .post_json(&url, vec![("Content-Type", "application/json")], &body)
            .await?;

        self.parse_response(model, response)
    }

    fn provider_name(&self) -> &'static str {
        "ollama"
    }
}

// Ollama API types

#[derive(Debug, Serialize)]
struct OllamaMessage {
    role: &'static str,
    content: String,
}

impl OllamaMessage {
    fn from_domain(message: &Message) -> Self {
        Self {
            role: message.role.as_str(),
            content: message.text().to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    model: Option<String>,
    created_at: Option<String>,
    message: OllamaResponseMessage,
    prompt_eval_count: Option<u32>,
    eval_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OllamaResponseMessage {
    #[serde(default)]
    content: String,
}
