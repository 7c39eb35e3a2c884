use std::sync::Arc;

use super::http_client::HttpClient;
use super::{AnthropicProvider, GeminiProvider, OllamaProvider, OpenAiProvider, SimulatedProvider};
use crate::domain::{Credential, DomainError, LlmProvider, ProviderKind};

/// Credential parameter that overrides a provider's default endpoint
pub const BASE_URL_PARAM: &str = "base_url";

/// Factory for creating LLM providers
#[derive(Debug)]
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    /// Create the provider for a credential's backend
    pub fn create(
        credential: &Credential,
        http_client: HttpClient,
    ) -> Result<Arc<dyn LlmProvider>, DomainError> {
        let base_url = credential.get_param(BASE_URL_PARAM);

        match credential.provider() {
            ProviderKind::OpenAi => {
                let api_key = Self::require_api_key(credential)?;
                Ok(match base_url {
                    Some(url) => Arc::new(OpenAiProvider::with_base_url(http_client, api_key, url)),
                    None => Arc::new(OpenAiProvider::new(http_client, api_key)),
                })
            }

            ProviderKind::Anthropic => {
                let api_key = Self::require_api_key(credential)?;
                Ok(match base_url {
                    Some(url) => {
                        Arc::new(AnthropicProvider::with_base_url(http_client, api_key, url))
                    }
                    None => Arc::new(AnthropicProvider::new(http_client, api_key)),
                })
            }

            ProviderKind::Gemini => {
                let api_key = Self::require_api_key(credential)?;
                Ok(match base_url {
                    Some(url) => Arc::new(GeminiProvider::with_base_url(http_client, api_key, url)),
                    None => Arc::new(GeminiProvider::new(http_client, api_key)),
                })
            }

            ProviderKind::Ollama => Ok(match base_url {
                Some(url) => Arc::new(OllamaProvider::with_base_url(http_client, url)),
                None => Arc::new(OllamaProvider::new(http_client)),
            }),

            ProviderKind::Simulated => Ok(Arc::new(SimulatedProvider::new())),
        }
    }

    fn require_api_key(credential: &Credential) -> Result<&str, DomainError> {
        let api_key = credential.api_key();
        if api_key.trim().is_empty() {
            return Err(DomainError::credential(format!(
                "API key missing for provider: {}",
                credential.provider()
            )));
        }
        Ok(api_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_openai_provider() {
        let credential = Credential::new(ProviderKind::OpenAi, "sk-test");
        let provider = LlmProviderFactory::create(&credential, HttpClient::new()).unwrap();
        assert_eq!(provider.provider_name(), "openai");
    }

    #[test]
    fn test_create_each_provider() {
        let cases = [
            (Credential::new(ProviderKind::Anthropic, "k"), "anthropic"),
            (Credential::new(ProviderKind::Gemini, "k"), "gemini"),
            (
                Credential::anonymous(ProviderKind::Ollama).with_param(BASE_URL_PARAM, "http://h:1"),
                "ollama",
            ),
            (Credential::anonymous(ProviderKind::Simulated), "simulated"),
        ];

        for (credential, expected) in cases {
            let provider = LlmProviderFactory::create(&credential, HttpClient::new()).unwrap();
            assert_eq!(provider.provider_name(), expected);
        }
    }

    #[test]
    fn test_missing_api_key_is_credential_error() {
        let credential = Credential::anonymous(ProviderKind::Anthropic);
        let err = LlmProviderFactory::create(&credential, HttpClient::new()).unwrap_err();
        assert!(matches!(err, DomainError::Credential { .. }));
    }
}
