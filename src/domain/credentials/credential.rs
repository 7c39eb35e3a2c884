use std::collections::HashMap;

use crate::domain::llm::ProviderKind;

/// Secrets and connection parameters needed to talk to one provider
#[derive(Debug, Clone)]
pub struct Credential {
    provider: ProviderKind,
    api_key: String,
    additional_params: HashMap<String, String>,
}

impl Credential {
    pub fn new(provider: ProviderKind, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            api_key: api_key.into(),
            additional_params: HashMap::new(),
        }
    }

    /// Credential for providers that need no secret (local or simulated backends)
    pub fn anonymous(provider: ProviderKind) -> Self {
        Self::new(provider, String::new())
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.additional_params.insert(key.into(), value.into());
        self
    }

    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn get_param(&self, key: &str) -> Option<&str> {
        self.additional_params.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_creation() {
        let cred = Credential::new(ProviderKind::OpenAi, "sk-test-key");

        assert_eq!(cred.provider(), ProviderKind::OpenAi);
        assert_eq!(cred.api_key(), "sk-test-key");
    }

    #[test]
    fn test_credential_with_params() {
        let cred = Credential::anonymous(ProviderKind::Ollama)
            .with_param("base_url", "http://gpu-box:11434");

        assert_eq!(cred.api_key(), "");
        assert_eq!(cred.get_param("base_url"), Some("http://gpu-box:11434"));
        assert_eq!(cred.get_param("missing"), None);
    }
}
