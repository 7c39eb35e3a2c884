use async_trait::async_trait;
use std::fmt::Debug;

use super::Credential;
use crate::domain::llm::ProviderKind;
use crate::domain::DomainError;

/// Trait for credential sources (environment, static tables)
#[async_trait]
pub trait CredentialProvider: Send + Sync + Debug {
    /// Get the credential for a provider
    async fn get_credential(&self, provider: ProviderKind) -> Result<Credential, DomainError>;

    /// Get source name for logging/debugging
    fn provider_name(&self) -> &'static str;
}
