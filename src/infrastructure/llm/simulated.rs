use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{DomainError, LlmProvider, LlmRequest, LlmResponse, Message, Usage};

/// Offline provider that answers every request with a fixed, deterministic text
#[derive(Debug, Default, Clone)]
pub struct SimulatedProvider;

impl SimulatedProvider {
    pub fn new() -> Self {
        Self
    }

    fn answer(model: &str) -> String {
        format!("Simulated response from {}.", model)
    }
}

#[async_trait]
impl LlmProvider for SimulatedProvider {
    async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError> {
        let text = Self::answer(model);
        let usage = Usage::estimate(&request.user_text(), &text);

        Ok(LlmResponse::new(
            format!("sim-{}", Uuid::new_v4()),
            model.to_string(),
            Message::assistant(text),
        )
        .with_usage(usage))
    }

    fn provider_name(&self) -> &'static str {
        "simulated"
    }
}
