use async_trait::async_trait;
use std::collections::HashMap;
use std::env;

use crate::domain::{Credential, CredentialProvider, DomainError, ProviderKind};
use crate::infrastructure::llm::DEFAULT_OLLAMA_HOST;

/// Environment variable mappings for one provider
#[derive(Debug, Clone, Default)]
pub struct EnvMapping {
    /// Variable holding the API key; `None` for providers that need no secret
    pub api_key_var: Option<String>,
    /// Parameter name -> (variable, fallback value)
    pub additional_vars: HashMap<String, (String, String)>,
}

impl EnvMapping {
    pub fn new(api_key_var: impl Into<String>) -> Self {
        Self {
            api_key_var: Some(api_key_var.into()),
            additional_vars: HashMap::new(),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_var_or(
        mut self,
        param_name: impl Into<String>,
        env_var: impl Into<String>,
        fallback: impl Into<String>,
    ) -> Self {
        self.additional_vars
            .insert(param_name.into(), (env_var.into(), fallback.into()));
        self
    }
}

/// Credential provider that reads from environment variables
#[derive(Debug)]
pub struct EnvCredentialProvider {
    mappings: HashMap<ProviderKind, EnvMapping>,
}

impl EnvCredentialProvider {
    pub fn new() -> Self {
        Self {
            mappings: HashMap::new(),
        }
    }

    pub fn with_mapping(mut self, provider: ProviderKind, mapping: EnvMapping) -> Self {
        self.mappings.insert(provider, mapping);
        self
    }

    pub fn with_defaults(self) -> Self {
        self.with_mapping(ProviderKind::OpenAi, EnvMapping::new("OPENAI_API_KEY"))
            .with_mapping(ProviderKind::Anthropic, EnvMapping::new("ANTHROPIC_API_KEY"))
            .with_mapping(ProviderKind::Gemini, EnvMapping::new("GOOGLE_API_KEY"))
            .with_mapping(
                ProviderKind::Ollama,
                EnvMapping::anonymous().with_var_or("base_url", "OLLAMA_HOST", DEFAULT_OLLAMA_HOST),
            )
            .with_mapping(ProviderKind::Simulated, EnvMapping::anonymous())
    }

    fn read_credential(&self, provider: ProviderKind) -> Result<Credential, DomainError> {
        let mapping = self.mappings.get(&provider).ok_or_else(|| {
            DomainError::credential(format!(
                "No environment mapping configured for provider: {}",
                provider
            ))
        })?;

        let mut credential = match &mapping.api_key_var {
            Some(var) => {
                let api_key = env::var(var)
                    .ok()
                    .filter(|value| !value.trim().is_empty())
                    .ok_or_else(|| {
                        DomainError::credential(format!(
                            "Environment variable '{}' not set for provider: {}",
                            var, provider
                        ))
                    })?;
                Credential::new(provider, api_key)
            }
            None => Credential::anonymous(provider),
        };

        for (param_name, (env_var, fallback)) in &mapping.additional_vars {
            let value = env::var(env_var)
                .ok()
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| fallback.clone());

            credential = credential.with_param(param_name, value);
        }

        Ok(credential)
    }
}

impl Default for EnvCredentialProvider {
    fn default() -> Self {
        Self::new().with_defaults()
    }
}

#[async_trait]
impl CredentialProvider for EnvCredentialProvider {
    async fn get_credential(&self, provider: ProviderKind) -> Result<Credential, DomainError> {
        self.read_credential(provider)
    }

    fn provider_name(&self) -> &'static str {
        "env"
    }
}
