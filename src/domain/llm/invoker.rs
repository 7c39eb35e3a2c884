use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{LlmResponse, ModelIdentifier, Usage};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Text and token counts returned by a single model call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    pub text: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl Completion {
    pub fn new(text: impl Into<String>, input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            text: text.into(),
            input_tokens,
            output_tokens,
        }
    }

    /// Build from a provider response, estimating usage when the provider omitted it
    pub fn from_response(prompt: &str, response: LlmResponse) -> Self {
        let text = response.content().to_string();
        let usage = response
            .usage
            .unwrap_or_else(|| Usage::estimate(prompt, &text));

        Self {
            text,
            input_tokens: usage.prompt_tokens,
            output_tokens: usage.completion_tokens,
        }
    }
}

/// Capability: given a model identifier and a prompt, return the model's answer
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    async fn invoke(&self, model: &ModelIdentifier, prompt: &str)
        -> Result<Completion, DomainError>;
}
