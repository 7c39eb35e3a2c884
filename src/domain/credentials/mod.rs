//! Provider credentials

mod credential;
mod provider;

pub use credential::Credential;
pub use provider::CredentialProvider;

#[cfg(test)]
pub use provider::mock;
