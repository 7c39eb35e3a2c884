//! Provider-backed implementation of the model invocation capability

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tokio::time::timeout;
use tracing::{debug, warn};

use super::{HttpClient, LlmProviderFactory};
use crate::domain::{
    Completion, CredentialProvider, DomainError, LlmProvider, LlmRequest, ModelIdentifier,
    ModelInvoker, ProviderKind, RetryPolicy,
};
use crate::infrastructure::observability::{record_llm_request, LlmRequestMetricParams};

/// Generation and resilience settings applied to every call
#[derive(Debug, Clone)]
pub struct InvocationSettings {
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for InvocationSettings {
    fn default() -> Self {
        Self {
            max_tokens: 2000,
            temperature: 0.7,
            timeout: Duration::from_secs(60),
            retry: RetryPolicy::default(),
        }
    }
}

/// Resolves providers lazily per backend and calls them with retry and timeout
#[derive(Debug)]
pub struct ProviderInvoker {
    credentials: Arc<dyn CredentialProvider>,
    http_client: HttpClient,
    providers: RwLock<HashMap<ProviderKind, Arc<dyn LlmProvider>>>,
    settings: InvocationSettings,
}

impl ProviderInvoker {
    pub fn new(credentials: Arc<dyn CredentialProvider>, settings: InvocationSettings) -> Self {
        Self {
            credentials,
            http_client: HttpClient::new(),
            providers: RwLock::new(HashMap::new()),
            settings,
        }
    }

    /// Register a ready-made provider for a backend, bypassing credential lookup
    #[cfg(test)]
    pub async fn register(&self, kind: ProviderKind, provider: Arc<dyn LlmProvider>) {
        self.providers.write().await.insert(kind, provider);
    }

    pub fn settings(&self) -> &InvocationSettings {
        &self.settings
    }

    async fn resolve(&self, kind: ProviderKind) -> Result<Arc<dyn LlmProvider>, DomainError> {
        {
            let providers = self.providers.read().await;
            if let Some(provider) = providers.get(&kind) {
                return Ok(provider.clone());
            }
        }

        let credential = self.credentials.get_credential(kind).await?;
        let provider = LlmProviderFactory::create(&credential, self.http_client.clone())?;

        let mut providers = self.providers.write().await;
        let provider = providers.entry(kind).or_insert(provider).clone();
        debug!(provider = %kind, "Resolved LLM provider");

        Ok(provider)
    }

    fn build_request(&self, prompt: &str) -> LlmRequest {
        LlmRequest::builder()
            .user(prompt)
            .max_tokens(self.settings.max_tokens)
            .temperature(self.settings.temperature)
            .build()
    }

    /// One attempt, bounded by the per-call timeout
    async fn try_call(
        &self,
        provider: &dyn LlmProvider,
        model: &ModelIdentifier,
        request: &LlmRequest,
    ) -> Result<Completion, DomainError> {
        let start = Instant::now();
        let future = provider.chat(model.model(), request.clone());

        let result = match timeout(self.settings.timeout, future).await {
            Ok(result) => result,
            Err(_) => Err(DomainError::timeout(format!(
                "{} did not answer within {}s",
                model,
                self.settings.timeout.as_secs_f64()
            ))),
        };

        let result = result.map(|response| Completion::from_response(&request.user_text(), response));

        record_llm_request(LlmRequestMetricParams {
            provider: provider.provider_name(),
            model: model.model(),
            duration: start.elapsed(),
            success: result.is_ok(),
            input_tokens: result.as_ref().ok().map(|c| u64::from(c.input_tokens)),
            output_tokens: result.as_ref().ok().map(|c| u64::from(c.output_tokens)),
        });

        result
    }
}

#[async_trait]
impl ModelInvoker for ProviderInvoker {
    async fn invoke(&self, model: &ModelIdentifier, prompt: &str) -> Result<Completion, DomainError> {
        let provider = self.resolve(model.provider()).await?;
        let request = self.build_request(prompt);

        let retry = &self.settings.retry;
        let max_attempts = retry.attempts();
        let mut attempt = 0;

        loop {
            match self.try_call(provider.as_ref(), model, &request).await {
                Ok(completion) => return Ok(completion),
                Err(e) if e.is_transient() && attempt + 1 < max_attempts => {
                    let delay = retry.delay_for_retry(attempt);
                    warn!(
                        model = %model,
                        attempt = attempt + 1,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Model call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
