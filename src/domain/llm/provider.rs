use async_trait::async_trait;
use std::fmt::Debug;

use super::{LlmRequest, LlmResponse};
use crate::domain::DomainError;

/// Trait for LLM providers (OpenAI, Anthropic, etc.)
#[async_trait]
pub trait LlmProvider: Send + Sync + Debug {
    /// Send a chat completion request
    async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    pub struct MockLlmProvider {
        name: &'static str,
        response: Option<LlmResponse>,
        error: Option<String>,
        failures_before_success: usize,
        calls: AtomicUsize,
    }

    impl MockLlmProvider {
        pub fn new(name: &'static str) -> Self {
            Self {
                name,
                response: None,
                error: None,
                failures_before_success: 0,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn with_response(mut self, response: LlmResponse) -> Self {
            self.response = Some(response);
            self
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }

        /// Fail the first `count` calls with a provider error, then answer normally
        pub fn failing_first(mut self, count: usize) -> Self {
            self.failures_before_success = count;
            self
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LlmProvider for MockLlmProvider {
        async fn chat(
            &self,
            _model: &str,
            _request: LlmRequest,
        ) -> Result<LlmResponse, DomainError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);

            if call < self.failures_before_success {
                return Err(DomainError::provider(self.name, "transient failure"));
            }

            if let Some(ref error) = self.error {
                return Err(DomainError::provider(self.name, error));
            }

            self.response
                .clone()
                .ok_or_else(|| DomainError::provider(self.name, "No mock response configured"))
        }

        fn provider_name(&self) -> &'static str {
            self.name
        }
    }
}
