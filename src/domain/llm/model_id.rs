use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Backend family selected by the tag in a model identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    Gemini,
    Ollama,
    Simulated,
}

impl ProviderKind {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Gemini => "gemini",
            Self::Ollama => "ollama",
            Self::Simulated => "simulated",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "openai" => Some(Self::OpenAi),
            "anthropic" => Some(Self::Anthropic),
            "gemini" => Some(Self::Gemini),
            "ollama" => Some(Self::Ollama),
            "simulated" => Some(Self::Simulated),
            _ => None,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A provider-qualified model name, written `provider:model`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelIdentifier {
    provider: ProviderKind,
    model: String,
}

impl ModelIdentifier {
    pub fn new(provider: ProviderKind, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    /// Model name as the provider knows it (the part after the tag)
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn is_simulated(&self) -> bool {
        self.provider == ProviderKind::Simulated
    }
}

impl FromStr for ModelIdentifier {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tag, model) = s.trim().split_once(':').ok_or_else(|| {
            DomainError::configuration(format!(
                "Invalid model identifier '{}': expected 'provider:model'",
                s
            ))
        })?;

        let provider = ProviderKind::from_tag(tag)
            .ok_or_else(|| DomainError::configuration(format!("Unknown model provider: {}", tag)))?;

        if model.is_empty() {
            return Err(DomainError::configuration(format!(
                "Invalid model identifier '{}': model name is empty",
                s
            )));
        }

        Ok(Self::new(provider, model))
    }
}

impl fmt::Display for ModelIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.provider, self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_providers() {
        let id: ModelIdentifier = "openai:gpt-4o".parse().unwrap();
        assert_eq!(id.provider(), ProviderKind::OpenAi);
        assert_eq!(id.model(), "gpt-4o");

        let id: ModelIdentifier = "ollama:llama3:8b".parse().unwrap();
        assert_eq!(id.provider(), ProviderKind::Ollama);
        assert_eq!(id.model(), "llama3:8b");

        let id: ModelIdentifier = "simulated:default".parse().unwrap();
        assert!(id.is_simulated());
    }

    #[test]
    fn test_unknown_provider_is_configuration_error() {
        let err = "mistral:large".parse::<ModelIdentifier>().unwrap_err();
        assert!(matches!(err, DomainError::Configuration { .. }));
        assert!(err.to_string().contains("Unknown model provider: mistral"));
    }

    #[test]
    fn test_missing_separator() {
        let err = "gpt-4o".parse::<ModelIdentifier>().unwrap_err();
        assert!(err.to_string().contains("expected 'provider:model'"));
    }

    #[test]
    fn test_empty_model_name() {
        assert!("anthropic:".parse::<ModelIdentifier>().is_err());
    }

    #[test]
    fn test_display_round_trip() {
        let id = ModelIdentifier::new(ProviderKind::Gemini, "gemini-1.5-pro");
        assert_eq!(id.to_string(), "gemini:gemini-1.5-pro");
    }
}
